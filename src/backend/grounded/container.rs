//! Container and attribute capabilities.

use super::{bad_operand, type_mismatch, values_equal, ExecError, Value};

/// Resolve a possibly negative index against a length
fn normalize_index(index: i64, len: usize) -> Result<usize, ExecError> {
    let resolved = if index < 0 { index + len as i64 } else { index };
    if resolved < 0 || resolved as usize >= len {
        return Err(ExecError::Index { index, len });
    }
    Ok(resolved as usize)
}

pub(super) fn get_item(container: &Value, key: &Value) -> Result<Value, ExecError> {
    match (container, key) {
        (Value::List(items), Value::Long(index)) => {
            Ok(items[normalize_index(*index, items.len())?].clone())
        }
        (Value::String(s), Value::Long(index)) => {
            let chars: Vec<char> = s.chars().collect();
            let at = normalize_index(*index, chars.len())?;
            Ok(Value::String(chars[at].to_string()))
        }
        (Value::Record(record), Value::String(name)) => record
            .field(name)
            .cloned()
            .ok_or_else(|| ExecError::Key(name.clone())),
        _ => Err(type_mismatch("[]", container, key)),
    }
}

pub(super) fn get_attr(target: &Value, name: &Value) -> Result<Value, ExecError> {
    let name = name.as_str()?;
    match target {
        Value::Record(record) => record
            .field(name)
            .cloned()
            .ok_or_else(|| ExecError::Attribute {
                type_name: record.name.clone(),
                attribute: name.to_string(),
            }),
        other => Err(ExecError::Attribute {
            type_name: other.type_name().to_string(),
            attribute: name.to_string(),
        }),
    }
}

pub(super) fn len(value: &Value) -> Result<Value, ExecError> {
    let n = match value {
        Value::List(items) => items.len(),
        Value::String(s) => s.chars().count(),
        Value::Record(record) => record.fields.len(),
        other => return Err(bad_operand("len()", other)),
    };
    Ok(Value::from(n))
}

pub(super) fn contains(container: &Value, item: &Value) -> Result<Value, ExecError> {
    let found = match (container, item) {
        (Value::List(items), _) => items.iter().any(|candidate| values_equal(candidate, item)),
        (Value::String(haystack), Value::String(needle)) => haystack.contains(needle.as_str()),
        (Value::Record(record), Value::String(name)) => record.fields.contains_key(name),
        _ => return Err(type_mismatch("in", container, item)),
    };
    Ok(Value::Bool(found))
}

pub(super) fn iterate(value: &Value) -> Result<Value, ExecError> {
    match value {
        Value::List(_) => Ok(value.clone()),
        Value::String(s) => Ok(Value::List(
            s.chars().map(|c| Value::String(c.to_string())).collect(),
        )),
        Value::Record(record) => Ok(Value::List(
            record.fields.keys().map(|k| Value::String(k.clone())).collect(),
        )),
        other => Err(bad_operand("iter()", other)),
    }
}

pub(super) fn reversed(value: &Value) -> Result<Value, ExecError> {
    match value {
        Value::List(items) => Ok(Value::List(items.iter().rev().cloned().collect())),
        Value::String(s) => Ok(Value::String(s.chars().rev().collect())),
        other => Err(bad_operand("reversed()", other)),
    }
}

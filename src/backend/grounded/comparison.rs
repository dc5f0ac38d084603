//! Comparison capabilities.
//!
//! Provides ordering (`lt`, `le`, `gt`, `ge`) over numbers, strings and
//! lists, and structural equality that treats `1` and `1.0` as equal.

use std::cmp::Ordering;

use super::{type_mismatch, Capability, ExecError, Value};

/// Structural equality with numeric widening
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Long(x), Value::Float(y)) | (Value::Float(y), Value::Long(x)) => (*x as f64) == *y,
        (Value::List(x), Value::List(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| values_equal(a, b))
        }
        (Value::Record(x), Value::Record(y)) => {
            x.name == y.name
                && x.fields.len() == y.fields.len()
                && x
                    .fields
                    .iter()
                    .zip(&y.fields)
                    .all(|((ka, va), (kb, vb))| ka == kb && values_equal(va, vb))
        }
        _ => a == b,
    }
}

/// Ordering between two values, `Err` when the types are not comparable.
/// `Ok(None)` covers NaN.
fn ordering(op: &'static str, a: &Value, b: &Value) -> Result<Option<Ordering>, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => Ok(Some(x.cmp(y))),
        (Value::Long(x), Value::Float(y)) => Ok((*x as f64).partial_cmp(y)),
        (Value::Float(x), Value::Long(y)) => Ok(x.partial_cmp(&(*y as f64))),
        (Value::Float(x), Value::Float(y)) => Ok(x.partial_cmp(y)),
        (Value::String(x), Value::String(y)) => Ok(Some(x.cmp(y))),
        (Value::List(x), Value::List(y)) => {
            for (a, b) in x.iter().zip(y) {
                if values_equal(a, b) {
                    continue;
                }
                return ordering(op, a, b);
            }
            Ok(Some(x.len().cmp(&y.len())))
        }
        _ => Err(type_mismatch(op, a, b)),
    }
}

pub(super) fn compare(capability: Capability, a: &Value, b: &Value) -> Result<Value, ExecError> {
    let (op, accept): (&'static str, fn(Ordering) -> bool) = match capability {
        Capability::Lt => ("<", Ordering::is_lt),
        Capability::Le => ("<=", Ordering::is_le),
        Capability::Gt => (">", Ordering::is_gt),
        Capability::Ge => (">=", Ordering::is_ge),
        other => {
            return Err(ExecError::IncorrectArgument(format!(
                "{} is not an ordering comparison",
                other
            )))
        }
    };
    Ok(Value::Bool(ordering(op, a, b)?.map_or(false, accept)))
}

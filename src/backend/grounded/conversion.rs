//! Conversion capabilities.

use super::{bad_operand, ExecError, Value};

pub(super) fn to_bool(value: &Value) -> Result<Value, ExecError> {
    Ok(Value::Bool(value.truthy()?))
}

pub(super) fn to_long(value: &Value) -> Result<Value, ExecError> {
    match value {
        Value::Long(_) => Ok(value.clone()),
        Value::Bool(b) => Ok(Value::Long(i64::from(*b))),
        Value::Float(x) => {
            if !x.is_finite() || *x >= i64::MAX as f64 || *x < i64::MIN as f64 {
                return Err(ExecError::Arithmetic(format!(
                    "cannot convert float {} to integer",
                    x
                )));
            }
            Ok(Value::Long(x.trunc() as i64))
        }
        Value::String(s) => s.trim().parse::<i64>().map(Value::Long).map_err(|_| {
            ExecError::IncorrectArgument(format!("invalid literal for integer: {:?}", s))
        }),
        other => Err(bad_operand("long()", other)),
    }
}

pub(super) fn to_float(value: &Value) -> Result<Value, ExecError> {
    match value {
        Value::Float(_) => Ok(value.clone()),
        Value::Long(n) => Ok(Value::Float(*n as f64)),
        Value::Bool(b) => Ok(Value::Float(if *b { 1.0 } else { 0.0 })),
        Value::String(s) => s.trim().parse::<f64>().map(Value::Float).map_err(|_| {
            ExecError::IncorrectArgument(format!("could not convert string to float: {:?}", s))
        }),
        other => Err(bad_operand("float()", other)),
    }
}

//! Bitwise and logical capabilities.
//!
//! On integers `and`/`or`/`xor`/`invert` are bitwise; on booleans they are
//! the logical operators. `not` always works on truthiness.

use super::{bad_operand, type_mismatch, ExecError, Value};

pub(super) fn bit_and(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => Ok(Value::Long(x & y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(*x && *y)),
        _ => Err(type_mismatch("&", a, b)),
    }
}

pub(super) fn bit_or(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => Ok(Value::Long(x | y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(*x || *y)),
        _ => Err(type_mismatch("|", a, b)),
    }
}

pub(super) fn bit_xor(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => Ok(Value::Long(x ^ y)),
        (Value::Bool(x), Value::Bool(y)) => Ok(Value::Bool(x ^ y)),
        _ => Err(type_mismatch("^", a, b)),
    }
}

fn shift_count(a: &Value, b: &Value, op: &'static str) -> Result<(i64, u32), ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => {
            if *y < 0 {
                return Err(ExecError::Arithmetic("negative shift count".to_string()));
            }
            Ok((*x, u32::try_from(*y).unwrap_or(u32::MAX)))
        }
        _ => Err(type_mismatch(op, a, b)),
    }
}

pub(super) fn shl(a: &Value, b: &Value) -> Result<Value, ExecError> {
    let (x, count) = shift_count(a, b, "<<")?;
    if x == 0 {
        return Ok(Value::Long(0));
    }
    // Any bit shifted out (or into the sign) is an overflow
    if count >= 63 || (x << count) >> count != x {
        return Err(ExecError::Arithmetic(format!(
            "Integer overflow: {} << {}",
            x, count
        )));
    }
    Ok(Value::Long(x << count))
}

pub(super) fn shr(a: &Value, b: &Value) -> Result<Value, ExecError> {
    let (x, count) = shift_count(a, b, ">>")?;
    Ok(Value::Long(x >> count.min(63)))
}

pub(super) fn invert(value: &Value) -> Result<Value, ExecError> {
    match value {
        Value::Long(n) => Ok(Value::Long(!n)),
        Value::Bool(b) => Ok(Value::Bool(!b)),
        other => Err(bad_operand("unary ~", other)),
    }
}

pub(super) fn not(value: &Value) -> Result<Value, ExecError> {
    Ok(Value::Bool(!value.truthy()?))
}

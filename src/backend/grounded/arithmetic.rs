//! Arithmetic capabilities.
//!
//! Integer arithmetic is checked: overflow is an `ExecError::Arithmetic`
//! rather than a wrap. Mixed integer/float operands widen to float.

use super::{bad_operand, type_mismatch, ExecError, Value};

fn overflow(a: i64, op: &str, b: i64) -> ExecError {
    ExecError::Arithmetic(format!("Integer overflow: {} {} {}", a, op, b))
}

/// Both operands numeric, at least one a float
fn float_pair(a: &Value, b: &Value) -> Option<(f64, f64)> {
    match (a, b) {
        (Value::Float(x), Value::Float(y)) => Some((*x, *y)),
        (Value::Long(x), Value::Float(y)) => Some((*x as f64, *y)),
        (Value::Float(x), Value::Long(y)) => Some((*x, *y as f64)),
        _ => None,
    }
}

/// Upper bound on the element (or byte) count a repetition may produce.
const MAX_REPEAT_LEN: usize = 1 << 30;

/// How many copies `sequence * n` builds; zero for an empty sequence or
/// `n <= 0`.
fn repetitions(len: usize, n: i64) -> Result<usize, ExecError> {
    if len == 0 || n <= 0 {
        return Ok(0);
    }
    usize::try_from(n)
        .ok()
        .and_then(|times| len.checked_mul(times).map(|total| (times, total)))
        .filter(|(_, total)| *total <= MAX_REPEAT_LEN)
        .map(|(times, _)| times)
        .ok_or_else(|| {
            ExecError::Arithmetic(format!(
                "sequence repetition overflow: {} items * {}",
                len, n
            ))
        })
}

pub(super) fn add(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => x
            .checked_add(*y)
            .map(Value::Long)
            .ok_or_else(|| overflow(*x, "+", *y)),
        (Value::String(x), Value::String(y)) => Ok(Value::String(format!("{}{}", x, y))),
        (Value::List(x), Value::List(y)) => {
            let mut items = Vec::with_capacity(x.len() + y.len());
            items.extend(x.iter().cloned());
            items.extend(y.iter().cloned());
            Ok(Value::List(items))
        }
        _ => match float_pair(a, b) {
            Some((x, y)) => Ok(Value::Float(x + y)),
            None => Err(type_mismatch("+", a, b)),
        },
    }
}

pub(super) fn sub(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => x
            .checked_sub(*y)
            .map(Value::Long)
            .ok_or_else(|| overflow(*x, "-", *y)),
        _ => match float_pair(a, b) {
            Some((x, y)) => Ok(Value::Float(x - y)),
            None => Err(type_mismatch("-", a, b)),
        },
    }
}

pub(super) fn mul(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => x
            .checked_mul(*y)
            .map(Value::Long)
            .ok_or_else(|| overflow(*x, "*", *y)),
        (Value::List(items), Value::Long(n)) | (Value::Long(n), Value::List(items)) => {
            let times = repetitions(items.len(), *n)?;
            let mut repeated = Vec::with_capacity(items.len() * times);
            for _ in 0..times {
                repeated.extend(items.iter().cloned());
            }
            Ok(Value::List(repeated))
        }
        (Value::String(s), Value::Long(n)) | (Value::Long(n), Value::String(s)) => {
            Ok(Value::String(s.repeat(repetitions(s.len(), *n)?)))
        }
        _ => match float_pair(a, b) {
            Some((x, y)) => Ok(Value::Float(x * y)),
            None => Err(type_mismatch("*", a, b)),
        },
    }
}

pub(super) fn div(a: &Value, b: &Value) -> Result<Value, ExecError> {
    let (x, y) = match (a, b) {
        (Value::Long(x), Value::Long(y)) => {
            if *y == 0 {
                return Err(ExecError::Arithmetic("division by zero".to_string()));
            }
            // Exact quotients round once; others go through f64 and may lose
            // precision above 2^53
            if x.checked_rem(*y) == Some(0) {
                if let Some(q) = x.checked_div(*y) {
                    return Ok(Value::Float(q as f64));
                }
            }
            (*x as f64, *y as f64)
        }
        _ => float_pair(a, b).ok_or_else(|| type_mismatch("/", a, b))?,
    };
    if y == 0.0 {
        return Err(ExecError::Arithmetic("division by zero".to_string()));
    }
    Ok(Value::Float(x / y))
}

pub(super) fn floor_div(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => {
            if *y == 0 {
                return Err(ExecError::Arithmetic("integer division by zero".to_string()));
            }
            let q = x.checked_div(*y).ok_or_else(|| overflow(*x, "//", *y))?;
            // Truncation rounds toward zero; step down when signs differ
            if x % y != 0 && ((*x < 0) != (*y < 0)) {
                Ok(Value::Long(q - 1))
            } else {
                Ok(Value::Long(q))
            }
        }
        _ => {
            let (x, y) = float_pair(a, b).ok_or_else(|| type_mismatch("//", a, b))?;
            if y == 0.0 {
                return Err(ExecError::Arithmetic("float floor division by zero".to_string()));
            }
            Ok(Value::Float((x / y).floor()))
        }
    }
}

pub(super) fn rem(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) => {
            if *y == 0 {
                return Err(ExecError::Arithmetic("integer modulo by zero".to_string()));
            }
            let r = x.checked_rem(*y).ok_or_else(|| overflow(*x, "%", *y))?;
            if r != 0 && ((r < 0) != (*y < 0)) {
                Ok(Value::Long(r + y))
            } else {
                Ok(Value::Long(r))
            }
        }
        _ => {
            let (x, y) = float_pair(a, b).ok_or_else(|| type_mismatch("%", a, b))?;
            if y == 0.0 {
                return Err(ExecError::Arithmetic("float modulo by zero".to_string()));
            }
            Ok(Value::Float(x - y * (x / y).floor()))
        }
    }
}

pub(super) fn pow(a: &Value, b: &Value) -> Result<Value, ExecError> {
    match (a, b) {
        (Value::Long(x), Value::Long(y)) if *y >= 0 => {
            let exp = u32::try_from(*y).map_err(|_| overflow(*x, "**", *y))?;
            x.checked_pow(exp)
                .map(Value::Long)
                .ok_or_else(|| overflow(*x, "**", *y))
        }
        (Value::Long(x), Value::Long(y)) => {
            if *x == 0 {
                return Err(ExecError::Arithmetic(
                    "0 cannot be raised to a negative power".to_string(),
                ));
            }
            Ok(Value::Float((*x as f64).powf(*y as f64)))
        }
        _ => match float_pair(a, b) {
            Some((x, y)) => Ok(Value::Float(x.powf(y))),
            None => Err(type_mismatch("**", a, b)),
        },
    }
}

pub(super) fn neg(value: &Value) -> Result<Value, ExecError> {
    match value {
        Value::Long(n) => n
            .checked_neg()
            .map(Value::Long)
            .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: -({})", n))),
        Value::Float(x) => Ok(Value::Float(-x)),
        other => Err(bad_operand("unary -", other)),
    }
}

pub(super) fn pos(value: &Value) -> Result<Value, ExecError> {
    match value {
        Value::Long(_) | Value::Float(_) => Ok(value.clone()),
        other => Err(bad_operand("unary +", other)),
    }
}

pub(super) fn abs(value: &Value) -> Result<Value, ExecError> {
    match value {
        Value::Long(n) => n
            .checked_abs()
            .map(Value::Long)
            .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: abs({})", n))),
        Value::Float(x) => Ok(Value::Float(x.abs())),
        other => Err(bad_operand("abs()", other)),
    }
}

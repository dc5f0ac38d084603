use std::fmt;

use indexmap::IndexMap;
use itertools::Itertools;

use super::DeferredCall;
use crate::backend::errors::ExecError;

/// A value flowing through the engine.
///
/// Everything except `Deferred` is concrete. A `Deferred` value stands in for
/// the eventual result of a suspended invocation; the trampoline replaces it
/// before a target ever sees it (unless nested resolution is disabled).
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Nil/empty
    Nil,
    /// A boolean
    Bool(bool),
    /// A 64-bit integer
    Long(i64),
    /// A floating point number
    Float(f64),
    /// A string
    String(String),
    /// An ordered list of values
    List(Vec<Value>),
    /// A named record with ordered fields
    Record(Record),
    /// A suspended invocation
    Deferred(DeferredCall),
}

/// A named record, the engine's stand-in for a small struct.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub name: String,
    pub fields: IndexMap<String, Value>,
}

impl Record {
    pub fn new(name: impl Into<String>) -> Self {
        Record {
            name: name.into(),
            fields: IndexMap::new(),
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

impl Value {
    /// Whether this value still has to be resolved by the trampoline
    #[inline]
    pub fn is_deferred(&self) -> bool {
        matches!(self, Value::Deferred(_))
    }

    /// Friendly type name for error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Nil => "Nil",
            Value::Bool(_) => "Bool",
            Value::Long(_) => "Number (integer)",
            Value::Float(_) => "Number (float)",
            Value::String(_) => "String",
            Value::List(_) => "List",
            Value::Record(_) => "Record",
            Value::Deferred(_) => "unresolved deferred call",
        }
    }

    pub fn as_long(&self) -> Result<i64, ExecError> {
        match self {
            Value::Long(n) => Ok(*n),
            other => Err(expected("Number (integer)", other)),
        }
    }

    /// Numeric view; integers widen to float
    pub fn as_float(&self) -> Result<f64, ExecError> {
        match self {
            Value::Float(x) => Ok(*x),
            Value::Long(n) => Ok(*n as f64),
            other => Err(expected("Number", other)),
        }
    }

    pub fn as_bool(&self) -> Result<bool, ExecError> {
        match self {
            Value::Bool(b) => Ok(*b),
            other => Err(expected("Bool", other)),
        }
    }

    pub fn as_str(&self) -> Result<&str, ExecError> {
        match self {
            Value::String(s) => Ok(s),
            other => Err(expected("String", other)),
        }
    }

    pub fn as_list(&self) -> Result<&[Value], ExecError> {
        match self {
            Value::List(items) => Ok(items),
            other => Err(expected("List", other)),
        }
    }

    pub fn as_record(&self) -> Result<&Record, ExecError> {
        match self {
            Value::Record(record) => Ok(record),
            other => Err(expected("Record", other)),
        }
    }

    /// Truthiness: empty and zero values are false.
    ///
    /// An unresolved call has no truth value yet, so asking is an error.
    pub fn truthy(&self) -> Result<bool, ExecError> {
        Ok(match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Long(n) => *n != 0,
            Value::Float(x) => *x != 0.0,
            Value::String(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Record(_) => true,
            Value::Deferred(_) => return Err(expected("concrete value", self)),
        })
    }
}

fn expected(what: &str, got: &Value) -> ExecError {
    ExecError::IncorrectArgument(format!("expected {}, got {}", what, got.type_name()))
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "Nil"),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Long(n) => write!(f, "{}", n),
            Value::Float(x) => write!(f, "{:?}", x),
            Value::String(s) => write!(f, "{:?}", s),
            Value::List(items) => write!(f, "[{}]", items.iter().join(", ")),
            Value::Record(record) => write!(
                f,
                "{}({})",
                record.name,
                record
                    .fields
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .join(", ")
            ),
            // Rendering a pending call never evaluates it
            Value::Deferred(call) => f.write_str(&call.describe()),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Long(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Long(n as i64)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        Value::Long(n as i64)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::Nil
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Record(record)
    }
}

impl From<DeferredCall> for Value {
    fn from(call: DeferredCall) -> Self {
        Value::Deferred(call)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truthiness() {
        assert!(!Value::Nil.truthy().unwrap());
        assert!(!Value::Long(0).truthy().unwrap());
        assert!(Value::Long(-3).truthy().unwrap());
        assert!(!Value::String(String::new()).truthy().unwrap());
        assert!(Value::from(vec![1]).truthy().unwrap());
        assert!(!Value::List(vec![]).truthy().unwrap());
    }

    #[test]
    fn test_accessor_type_errors() {
        let err = Value::from("x").as_long().unwrap_err();
        assert_eq!(
            err,
            ExecError::IncorrectArgument("expected Number (integer), got String".to_string())
        );
        assert_eq!(Value::Long(2).as_float().unwrap(), 2.0);
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::from(vec![1, 2, 3]).to_string(), "[1, 2, 3]");
        assert_eq!(Value::Float(1.0).to_string(), "1.0");
        assert_eq!(Value::from("hi").to_string(), "\"hi\"");
        let record = Record::new("Point").with_field("x", 1).with_field("y", 2);
        assert_eq!(Value::from(record).to_string(), "Point(x=1, y=2)");
    }
}

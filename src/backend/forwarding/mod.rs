//! Operator-forwarding wrapper.
//!
//! `Deferred` stands in for the not-yet-computed result of a deferred call.
//! Operations performed on it do not force evaluation; each one records a new
//! deferred call whose target is the intercepted capability and whose first
//! argument is the wrapped call. Once the function body returns, the
//! trampoline resolves the whole expression bottom-up.
//!
//! ```
//! use tailrec::{args, FeatureSet, TailRecursive, Value};
//!
//! let factorial = TailRecursive::builder("factorial")
//!     .param("n")
//!     .feature_set(FeatureSet::Full)
//!     .build(|ctx| {
//!         let n = ctx.long("n")?;
//!         if n <= 1 {
//!             return Ok(Value::Long(1));
//!         }
//!         Ok((n * ctx.recurse(args![n - 1])).into())
//!     });
//!
//! assert_eq!(factorial.invoke(args![5]).unwrap(), Value::Long(120));
//! ```
//!
//! The capability set is closed (see `Capability`). Lifecycle hooks are
//! rejected by `forward`, assignment always fails, and metadata is served from
//! the wrapper's own `Metadata` without touching the pending value.

mod metadata;
mod operators;

use std::sync::Arc;

use indexmap::IndexMap;

pub use metadata::{CodeInfo, Metadata};

use super::errors::{ExecError, TailError};
use super::grounded::Capability;
use super::models::{Args, DeferredCall, Operation, Value};

/// Forwarding wrapper around an unresolved call.
#[derive(Debug, Clone)]
pub struct Deferred {
    call: DeferredCall,
    metadata: Arc<Metadata>,
}

impl Deferred {
    pub(crate) fn new(call: DeferredCall, metadata: Arc<Metadata>) -> Self {
        Deferred { call, metadata }
    }

    #[inline]
    pub fn call(&self) -> &DeferredCall {
        &self.call
    }

    pub fn into_call(self) -> DeferredCall {
        self.call
    }

    /// Render the pending call without evaluating it.
    ///
    /// Wrappers have no `Display` impl; this is their only textual form.
    pub fn describe(&self) -> String {
        self.call.describe()
    }

    // Metadata accessors: answered from static data, never forwarded.

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn name(&self) -> &str {
        &self.metadata.name
    }

    pub fn qualified_name(&self) -> &str {
        &self.metadata.qualified_name
    }

    pub fn module(&self) -> &str {
        &self.metadata.module
    }

    pub fn doc(&self) -> Option<&str> {
        self.metadata.doc.as_deref()
    }

    pub fn defaults(&self) -> &[Value] {
        &self.metadata.defaults
    }

    pub fn keyword_defaults(&self) -> &IndexMap<String, Value> {
        &self.metadata.keyword_defaults
    }

    pub fn annotations(&self) -> &IndexMap<String, String> {
        &self.metadata.annotations
    }

    pub fn code(&self) -> &CodeInfo {
        &self.metadata.code
    }

    pub fn captures(&self) -> &[String] {
        &self.metadata.captures
    }

    /// Intercept `capability` on the pending value.
    ///
    /// `operands` are the capability's arguments after the intercepted value,
    /// in natural order. Lifecycle hooks fail with `UnsupportedCapability`
    /// before any call is built.
    pub fn forward<I>(self, capability: Capability, operands: I) -> Result<Deferred, TailError>
    where
        I: IntoIterator<Item = Value>,
    {
        let Some(arity) = capability.arity() else {
            return Err(TailError::UnsupportedCapability { capability });
        };
        let operands: Vec<Value> = operands.into_iter().collect();
        if operands.len() + 1 != arity {
            return Err(ExecError::IncorrectArgument(format!(
                "{} takes {} operand(s) besides the pending value, got {}",
                capability,
                arity - 1,
                operands.len()
            ))
            .into());
        }
        Ok(self.forward_with(capability, operands))
    }

    /// Build the capability call; callers guarantee forwardability and arity
    fn forward_with(self, capability: Capability, operands: Vec<Value>) -> Deferred {
        debug_assert_eq!(capability.arity(), Some(operands.len() + 1));
        let mut positional = Vec::with_capacity(operands.len() + 1);
        positional.push(Value::Deferred(self.call));
        positional.extend(operands);
        Deferred::new(
            DeferredCall::new(
                Operation::Capability(capability),
                Args::from_positional(positional),
            ),
            Arc::new(capability.metadata()),
        )
    }

    /// Assignment has no concrete target yet and always fails.
    pub fn set_attr(&self, attribute: &str, _value: impl Into<Value>) -> Result<(), TailError> {
        Err(TailError::AttributeNotSettable {
            attribute: attribute.to_string(),
        })
    }

    /// Attribute deletion is an identity hook and is never forwarded.
    pub fn del_attr(&self, _attribute: &str) -> Result<(), TailError> {
        Err(TailError::UnsupportedCapability {
            capability: Capability::AttributeDelete,
        })
    }

    pub fn less_than(self, other: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::Lt, vec![other.into()])
    }

    pub fn less_equal(self, other: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::Le, vec![other.into()])
    }

    pub fn greater_than(self, other: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::Gt, vec![other.into()])
    }

    pub fn greater_equal(self, other: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::Ge, vec![other.into()])
    }

    pub fn equals(self, other: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::Eq, vec![other.into()])
    }

    pub fn not_equals(self, other: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::Ne, vec![other.into()])
    }

    pub fn floor_div(self, other: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::FloorDiv, vec![other.into()])
    }

    pub fn pow(self, exponent: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::Pow, vec![exponent.into()])
    }

    pub fn abs(self) -> Deferred {
        self.forward_with(Capability::Abs, vec![])
    }

    pub fn logical_not(self) -> Deferred {
        self.forward_with(Capability::Not, vec![])
    }

    pub fn get_item(self, key: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::GetItem, vec![key.into()])
    }

    /// Read a field of the eventual record
    pub fn attr(self, name: &str) -> Deferred {
        self.forward_with(Capability::GetAttr, vec![Value::from(name)])
    }

    pub fn len(self) -> Deferred {
        self.forward_with(Capability::Len, vec![])
    }

    pub fn contains(self, item: impl Into<Value>) -> Deferred {
        self.forward_with(Capability::Contains, vec![item.into()])
    }

    /// Materialise the eventual value's elements as a list
    pub fn iterate(self) -> Deferred {
        self.forward_with(Capability::Iterate, vec![])
    }

    pub fn reversed(self) -> Deferred {
        self.forward_with(Capability::Reversed, vec![])
    }

    pub fn to_bool(self) -> Deferred {
        self.forward_with(Capability::ToBool, vec![])
    }

    pub fn to_long(self) -> Deferred {
        self.forward_with(Capability::ToLong, vec![])
    }

    pub fn to_float(self) -> Deferred {
        self.forward_with(Capability::ToFloat, vec![])
    }
}

impl From<Deferred> for Value {
    fn from(deferred: Deferred) -> Self {
        Value::Deferred(deferred.call)
    }
}

impl From<Deferred> for DeferredCall {
    fn from(deferred: Deferred) -> Self {
        deferred.call
    }
}

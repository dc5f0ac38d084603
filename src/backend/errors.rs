//! Error types for the deferred-call engine.
//!
//! Two layers:
//! - `ExecError` - raised by target operations (registered function bodies and
//!   synthetic capability operations) while they run on finalized arguments
//! - `TailError` - everything `invoke` can return; target errors pass through
//!   it unchanged so a deferred computation fails exactly like a direct one

use thiserror::Error;

use super::feature_set::FeatureSet;
use super::grounded::Capability;
use super::models::ArgumentLocation;

/// Error raised by a target operation during finalization.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecError {
    /// Runtime error during execution
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Arithmetic failure (division by zero, overflow)
    #[error("Arithmetic error: {0}")]
    Arithmetic(String),

    /// Incorrect argument type or arity
    #[error("Incorrect argument: {0}")]
    IncorrectArgument(String),

    /// Operand types not supported by an operation
    #[error("Cannot perform '{op}': unsupported operand types {left} and {right}")]
    TypeMismatch {
        op: &'static str,
        left: &'static str,
        right: &'static str,
    },

    /// Required parameter was neither passed nor defaulted
    #[error("{function}() missing required argument '{param}'")]
    MissingArgument { function: String, param: String },

    /// Record has no such field
    #[error("'{type_name}' value has no attribute '{attribute}'")]
    Attribute {
        type_name: String,
        attribute: String,
    },

    /// Sequence index out of range
    #[error("index {index} out of range for length {len}")]
    Index { index: i64, len: usize },

    /// Record key lookup failed
    #[error("key '{0}' not found")]
    Key(String),
}

/// Error returned from `invoke`, `run` and the forwarding wrapper.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TailError {
    /// A target operation failed; carried through untouched
    #[error(transparent)]
    Target(#[from] ExecError),

    /// A nested deferred call reached a target without being resolved
    #[error("'{operation}' received an unresolved deferred call at {location}; nested call resolution is disabled")]
    UnresolvedArgument {
        operation: String,
        location: ArgumentLocation,
    },

    /// Lifecycle or identity hook invoked on a forwarding wrapper
    #[error("capability '{capability}' cannot be forwarded to an unresolved call")]
    UnsupportedCapability { capability: Capability },

    /// Assignment through a forwarding wrapper
    #[error("cannot set attribute '{attribute}' on an unresolved call")]
    AttributeNotSettable { attribute: String },

    /// A forwarded capability reached a run below the Full feature set
    #[error("capability '{capability}' requires the full feature set, run uses '{feature_set}'")]
    ForwardingDisabled {
        capability: Capability,
        feature_set: FeatureSet,
    },

    /// Explicit stack grew past the configured bound
    #[error("deferred call stack exceeded limit of {limit} frames")]
    StackLimitExceeded { limit: usize },
}

impl TailError {
    /// The target-side error, if this is one.
    pub fn as_exec(&self) -> Option<&ExecError> {
        match self {
            TailError::Target(e) => Some(e),
            _ => None,
        }
    }
}

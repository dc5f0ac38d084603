//! Suspended invocations.
//!
//! A `DeferredCall` records a target operation and the arguments it will be
//! invoked with. It is built once (by `defer` or by the forwarding wrapper)
//! and handed to the trampoline, which owns it until it is finalized into a
//! concrete value.

use std::fmt;

use itertools::Itertools;

use super::{Args, Value};
use crate::backend::errors::TailError;
use crate::backend::function::{CallContext, TailRecursive};
use crate::backend::grounded::{self, Capability};

/// What a deferred call invokes.
#[derive(Clone)]
pub enum Operation {
    /// A registered function
    Function(TailRecursive),
    /// A synthetic operation produced by operator forwarding; the first
    /// argument is the value whose capability was intercepted
    Capability(Capability),
}

impl Operation {
    pub fn name(&self) -> &str {
        match self {
            Operation::Function(function) => function.name(),
            Operation::Capability(capability) => capability.name(),
        }
    }

    /// Run the operation on finalized arguments.
    ///
    /// A registered function may return another `Value::Deferred`; capability
    /// operations always return a concrete value.
    pub fn invoke(&self, args: &Args) -> Result<Value, TailError> {
        match self {
            Operation::Function(function) => function.call_body(&CallContext::new(function, args)),
            Operation::Capability(capability) => Ok(grounded::apply(*capability, args)?),
        }
    }
}

impl PartialEq for Operation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Operation::Function(a), Operation::Function(b)) => a.same_function(b),
            (Operation::Capability(a), Operation::Capability(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Debug for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Function(function) => write!(f, "Function({})", function.name()),
            Operation::Capability(capability) => write!(f, "Capability({:?})", capability),
        }
    }
}

/// A recorded-but-not-yet-executed invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DeferredCall {
    target: Operation,
    args: Args,
}

impl DeferredCall {
    pub fn new(target: Operation, args: Args) -> Self {
        DeferredCall { target, args }
    }

    #[inline]
    pub fn target(&self) -> &Operation {
        &self.target
    }

    #[inline]
    pub fn args(&self) -> &Args {
        &self.args
    }

    pub(crate) fn args_mut(&mut self) -> &mut Args {
        &mut self.args
    }

    pub fn into_parts(self) -> (Operation, Args) {
        (self.target, self.args)
    }

    /// Render the call shape without evaluating anything,
    /// e.g. `mul.defer(5, factorial.defer(4))`.
    pub fn describe(&self) -> String {
        let rendered = self
            .args
            .positional()
            .iter()
            .map(|value| value.to_string())
            .chain(
                self.args
                    .keywords()
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value)),
            )
            .join(", ");
        format!("{}.defer({})", self.target.name(), rendered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_capability_call() {
        let inner = DeferredCall::new(
            Operation::Capability(Capability::Len),
            Args::from_positional(vec![Value::from("abc")]),
        );
        let outer = DeferredCall::new(
            Operation::Capability(Capability::Add),
            Args::from_positional(vec![Value::Deferred(inner), Value::Long(1)])
                .with_keyword("note", "x"),
        );
        assert_eq!(outer.describe(), "add.defer(len.defer(\"abc\"), 1, note=\"x\")");
    }

    #[test]
    fn test_capability_target_invokes_grounded_op() {
        let call = DeferredCall::new(
            Operation::Capability(Capability::Mul),
            Args::from_positional(vec![Value::Long(6), Value::Long(7)]),
        );
        assert_eq!(call.target().invoke(call.args()), Ok(Value::Long(42)));
    }
}

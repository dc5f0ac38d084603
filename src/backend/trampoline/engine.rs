//! Trampoline Engine
//!
//! Drives a deferred call to a concrete value without native recursion.
//!
//! Under `Base` a minimal loop invokes the call's target and follows returned
//! deferred calls until a concrete value comes back. Under `NestedCalls` and
//! `Full` every call becomes a `Frame` on an explicit LIFO stack: nested
//! deferred arguments are resolved first (left to right, positional before
//! keyword), then the target runs on the finalized arguments and a deferred
//! result replaces the frame it came from.

use tracing::{debug, trace};

use super::types::{Frame, Limits, RunStats};
use crate::backend::errors::{ExecError, TailError};
use crate::backend::feature_set::FeatureSet;
use crate::backend::models::{DeferredCall, Operation, Value};

const TARGET: &str = "tailrec::backend::trampoline";

/// Resolve `call` to a concrete value.
///
/// The returned value is never `Value::Deferred`. Any error raised by a
/// target operation aborts the run and is returned unchanged.
pub fn run(call: DeferredCall, feature_set: FeatureSet, limits: Limits) -> Result<Value, TailError> {
    run_with_stats(call, feature_set, limits).map(|(value, _)| value)
}

/// Like `run`, also returning what the run did.
pub fn run_with_stats(
    call: DeferredCall,
    feature_set: FeatureSet,
    limits: Limits,
) -> Result<(Value, RunStats), TailError> {
    debug!(target: TARGET, operation = call.target().name(), %feature_set, "run");
    let mut stats = RunStats::default();
    let value = if feature_set.resolves_nested_calls() {
        resolve(call, feature_set, limits, &mut stats)?
    } else {
        run_minimal(call, feature_set, &mut stats)?
    };
    debug!(target: TARGET, ?stats, "run complete");
    Ok((value, stats))
}

/// Capability calls only exist through operator forwarding.
fn ensure_forwarding(call: &DeferredCall, feature_set: FeatureSet) -> Result<(), TailError> {
    match call.target() {
        Operation::Capability(capability) if !feature_set.forwards_operators() => {
            Err(TailError::ForwardingDisabled {
                capability: *capability,
                feature_set,
            })
        }
        _ => Ok(()),
    }
}

/// `Base`: invoke, and keep invoking while the result is deferred.
fn run_minimal(
    mut call: DeferredCall,
    feature_set: FeatureSet,
    stats: &mut RunStats,
) -> Result<Value, TailError> {
    stats.max_stack_depth = 1;
    loop {
        ensure_forwarding(&call, feature_set)?;
        if let Some((location, _)) = call.args().iter().find(|(_, value)| value.is_deferred()) {
            return Err(TailError::UnresolvedArgument {
                operation: call.target().name().to_string(),
                location,
            });
        }

        trace!(target: TARGET, operation = call.target().name(), "invoke");
        stats.invocations += 1;
        match call.target().invoke(call.args())? {
            Value::Deferred(next) => {
                stats.tail_continuations += 1;
                call = next;
            }
            value => return Ok(value),
        }
    }
}

fn push_frame(
    stack: &mut Vec<Frame>,
    call: DeferredCall,
    feature_set: FeatureSet,
    limits: Limits,
    stats: &mut RunStats,
) -> Result<(), TailError> {
    ensure_forwarding(&call, feature_set)?;
    stack.push(Frame::new(call));
    stats.max_stack_depth = stats.max_stack_depth.max(stack.len());
    match limits.max_stack_depth {
        Some(limit) if stack.len() > limit => Err(TailError::StackLimitExceeded { limit }),
        _ => Ok(()),
    }
}

/// `NestedCalls` and `Full`: explicit-stack resolution.
fn resolve(
    call: DeferredCall,
    feature_set: FeatureSet,
    limits: Limits,
    stats: &mut RunStats,
) -> Result<Value, TailError> {
    let mut stack: Vec<Frame> = Vec::new();
    push_frame(&mut stack, call, feature_set, limits, stats)?;

    while let Some(mut frame) = stack.pop() {
        if let Some(nested) = frame.take_next_nested()? {
            trace!(
                target: TARGET,
                parent = frame.call().target().name(),
                operation = nested.target().name(),
                depth = stack.len() + 1,
                "resolve nested argument"
            );
            stats.nested_resolutions += 1;
            stack.push(frame);
            push_frame(&mut stack, nested, feature_set, limits, stats)?;
            continue;
        }

        let call = frame.finalize();
        trace!(target: TARGET, operation = call.target().name(), depth = stack.len() + 1, "invoke");
        stats.invocations += 1;
        match call.target().invoke(call.args())? {
            Value::Deferred(next) => {
                // Tail position: the continuation takes the finished frame's place
                stats.tail_continuations += 1;
                push_frame(&mut stack, next, feature_set, limits, stats)?;
            }
            value => match stack.last_mut() {
                Some(parent) => parent.deliver(value)?,
                None => return Ok(value),
            },
        }
    }

    Err(ExecError::Runtime("trampoline stack emptied without a result".to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::grounded::Capability;
    use crate::backend::models::Args;

    fn cap(capability: Capability, positional: Vec<Value>) -> DeferredCall {
        DeferredCall::new(Operation::Capability(capability), Args::from_positional(positional))
    }

    #[test]
    fn test_resolves_nested_capabilities() {
        // (len("abc") + 4) * -(2)
        let sum = cap(Capability::Add, vec![cap(Capability::Len, vec!["abc".into()]).into(), 4.into()]);
        let neg = cap(Capability::Neg, vec![2.into()]);
        let product = cap(Capability::Mul, vec![sum.into(), neg.into()]);

        let (value, stats) = run_with_stats(product, FeatureSet::Full, Limits::default()).unwrap();
        assert_eq!(value, Value::Long(-14));
        assert_eq!(stats.invocations, 4);
        assert_eq!(stats.nested_resolutions, 3);
        assert_eq!(stats.tail_continuations, 0);
        assert_eq!(stats.max_stack_depth, 3);
    }

    #[test]
    fn test_capability_targets_need_full() {
        for feature_set in [FeatureSet::Base, FeatureSet::NestedCalls] {
            let err = run(cap(Capability::Abs, vec![(-3).into()]), feature_set, Limits::default()).unwrap_err();
            assert_eq!(
                err,
                TailError::ForwardingDisabled {
                    capability: Capability::Abs,
                    feature_set,
                }
            );
        }
    }

    #[test]
    fn test_stack_limit() {
        let inner = cap(Capability::Neg, vec![cap(Capability::Neg, vec![1.into()]).into()]);
        let outer = cap(Capability::Neg, vec![inner.into()]);

        let err = run(outer.clone(), FeatureSet::Full, Limits::with_max_stack_depth(2)).unwrap_err();
        assert_eq!(err, TailError::StackLimitExceeded { limit: 2 });
        assert_eq!(
            run(outer, FeatureSet::Full, Limits::with_max_stack_depth(3)).unwrap(),
            Value::Long(-1)
        );
    }

    #[test]
    fn test_error_abandons_stack() {
        let div = cap(Capability::Div, vec![1.into(), 0.into()]);
        let outer = cap(Capability::Add, vec![1.into(), div.into()]);
        let err = run(outer, FeatureSet::Full, Limits::default()).unwrap_err();
        assert!(matches!(err, TailError::Target(ExecError::Arithmetic(_))));
    }
}

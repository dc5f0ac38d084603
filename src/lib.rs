//! tailrec - Deferred-Call Trampoline Engine
//!
//! This library runs recursive functions written in tail form without growing
//! the native call stack. A registered function's body returns either a
//! concrete value or a *deferred call*; the trampoline keeps invoking deferred
//! calls on an explicit, heap-allocated stack until a concrete value remains.
//!
//! # Architecture
//!
//! 1. **Registration** (`backend::function`)
//!    - `TailRecursive::builder` declares parameters, defaults, metadata and
//!      the feature set
//!    - `invoke` is the entry point; `defer` / `CallContext::recurse` build
//!      deferred calls
//!
//! 2. **Resolution** (`backend::trampoline`)
//!    - The scanner finds deferred calls embedded in arguments
//!    - The engine resolves them left to right, positional before keyword,
//!      then invokes the target on the finalized arguments
//!
//! 3. **Forwarding** (`backend::forwarding`, `backend::grounded`)
//!    - Operators on an unresolved result (`n * f.defer(..)`) record a new
//!      deferred call on a fixed set of capabilities
//!
//! # Example
//!
//! ```rust
//! use tailrec::{args, FeatureSet, TailRecursive, Value};
//!
//! let countdown = TailRecursive::builder("countdown")
//!     .param("n")
//!     .feature_set(FeatureSet::Base)
//!     .build(|ctx| {
//!         let n = ctx.long("n")?;
//!         if n == 0 {
//!             return Ok(Value::from("done"));
//!         }
//!         Ok(ctx.recurse(args![n - 1]).into())
//!     });
//!
//! // One million tail calls, constant native stack
//! assert_eq!(countdown.invoke(args![1_000_000]).unwrap(), Value::from("done"));
//! ```
//!
//! # Feature Sets
//!
//! - **Base**: follow returned deferred calls only
//! - **NestedCalls**: also resolve deferred calls passed as arguments
//! - **Full**: also allow operators on unresolved results
//!
//! The feature set of the function whose `invoke` starts a run governs the
//! whole run.

pub mod backend;
pub mod config;
pub mod demos;

pub use backend::{
    errors::{ExecError, TailError},
    feature_set::FeatureSet,
    forwarding::{Deferred, Metadata},
    function::{CallContext, TailRecursive},
    grounded::Capability,
    models::{ArgumentLocation, Args, DeferredCall, Operation, Record, Value},
    trampoline::{run, run_with_stats, Limits, RunStats},
};
pub use config::EngineConfig;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invoke_without_deferral() {
        let square = TailRecursive::builder("square")
            .param("x")
            .build(|ctx| {
                let x = ctx.long("x")?;
                Ok(Value::Long(x * x))
            });
        assert_eq!(square.invoke(args![7]).unwrap(), Value::Long(49));
    }

    #[test]
    fn test_run_hand_built_call() {
        let call = DeferredCall::new(
            Operation::Capability(Capability::Add),
            Args::from_positional(vec![Value::Long(2), Value::Long(3)]),
        );
        assert_eq!(run(call, FeatureSet::Full, Limits::default()).unwrap(), Value::Long(5));
    }

    #[test]
    fn test_run_never_returns_deferred() {
        let f = demos::countdown(FeatureSet::Full);
        let (value, stats) = run_with_stats(f.deferred_call(args![3]), FeatureSet::Full, Limits::default()).unwrap();
        assert!(!value.is_deferred());
        assert_eq!(stats.invocations, 4);
        assert_eq!(stats.tail_continuations, 3);
    }

    #[test]
    fn test_config_applies_at_registration() {
        let config = EngineConfig::parse_toml(r#"feature_set = "base""#).unwrap();
        let f = TailRecursive::builder("f").config(&config).build(|_| Ok(Value::Nil));
        assert_eq!(f.feature_set(), FeatureSet::Base);
    }

    #[test]
    fn test_target_error_passes_through() {
        let fail = TailRecursive::builder("fail")
            .build(|_| Err(ExecError::Runtime("boom".to_string()).into()));
        assert_eq!(
            fail.invoke(args![]).unwrap_err(),
            TailError::Target(ExecError::Runtime("boom".to_string()))
        );
    }
}

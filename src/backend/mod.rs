// Backend module for deferred-call resolution
//
// - `models`: values, argument lists and the `DeferredCall` record
// - `function`: registration of tail-recursive functions (`TailRecursive`)
// - `trampoline`: explicit-stack resolver and nested-argument scanner
// - `forwarding`: operator-forwarding wrapper around unresolved calls
// - `grounded`: concrete semantics of the forwardable capabilities
// - `feature_set`: Base < NestedCalls < Full capability tiers

pub mod errors;
pub mod feature_set;
pub mod forwarding;
pub mod function;
pub mod grounded;
pub mod models;
pub mod trampoline;

pub use errors::{ExecError, TailError};
pub use feature_set::{FeatureSet, ParseFeatureSetError};
pub use forwarding::{CodeInfo, Deferred, Metadata};
pub use function::{CallContext, Param, Signature, TailRecursive, TailRecursiveBuilder, WeakTailRecursive};
pub use grounded::Capability;
pub use models::*;
pub use trampoline::{Limits, RunStats};

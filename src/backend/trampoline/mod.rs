//! Trampoline-based Deferred Call Resolution
//!
//! This module provides the frame types, nested-argument scanner and engine
//! that drive a `DeferredCall` to a concrete value using an explicit stack
//! instead of native recursion.

mod engine;
mod scanner;
mod types;

pub use engine::{run, run_with_stats};
pub use scanner::scan;
pub use types::{Frame, Limits, RunStats};

pub mod args;
pub mod deferred;
pub mod value;

pub use args::{ArgumentLocation, Args};
pub use deferred::{DeferredCall, Operation};
pub use value::{Record, Value};

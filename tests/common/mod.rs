//! Shared fixtures for integration tests
//!
//! - Reference (non-deferred) implementations to compare against
//! - A call log for observing resolution order
//! - Small registered helpers (`tuple_factory`, `logged`)

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use tailrec::{FeatureSet, TailRecursive, Value};

pub use tailrec::demos;

pub fn reference_factorial(n: i64) -> i64 {
    (1..=n).product()
}

pub fn reference_fibonacci(n: i64) -> i64 {
    let (mut a, mut b) = (0i64, 1i64);
    for _ in 0..n {
        let next = a + b;
        a = b;
        b = next;
    }
    a
}

/// Labels in the order their calls ran
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn new() -> Self {
        CallLog::default()
    }

    pub fn push(&self, label: &str) {
        self.0.lock().unwrap().push(label.to_string());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

/// Registered function that records its `label` argument and returns it
pub fn logged(log: &CallLog, feature_set: FeatureSet) -> TailRecursive {
    let log = log.clone();
    TailRecursive::builder("logged")
        .param("label")
        .capture("log")
        .feature_set(feature_set)
        .build(move |ctx| {
            let label = ctx.string("label")?;
            log.push(label);
            Ok(Value::from(label))
        })
}

/// Registered function returning all of its positional arguments as a list
pub fn tuple_factory(feature_set: FeatureSet) -> TailRecursive {
    TailRecursive::builder("tuple_factory")
        .variadic()
        .feature_set(feature_set)
        .build(|ctx| Ok(Value::List(ctx.positional().to_vec())))
}

/// Every feature set at or above `minimum`
pub fn feature_sets_from(minimum: FeatureSet) -> impl Iterator<Item = FeatureSet> {
    FeatureSet::ALL.into_iter().filter(move |fs| *fs >= minimum)
}

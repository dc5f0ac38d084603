//! Trampoline Types
//!
//! Frames live on an explicit, heap-allocated stack owned by one `run`. Stack
//! depth tracks how many deferred calls are waiting on a nested argument, not
//! how many tail calls have been performed.

use std::collections::VecDeque;
use std::mem;

use super::scanner::scan;
use crate::backend::errors::{ExecError, TailError};
use crate::backend::models::{ArgumentLocation, DeferredCall, Value};

/// A deferred call under resolution
#[derive(Debug)]
pub struct Frame {
    call: DeferredCall,
    /// Nested-call slots still to resolve, in scan order
    unresolved: VecDeque<ArgumentLocation>,
    /// Concrete values produced for resolved slots
    resolved: Vec<(ArgumentLocation, Value)>,
    /// Slot whose nested call is currently above this frame
    resolving: Option<ArgumentLocation>,
}

impl Frame {
    /// Build a frame and scan its arguments
    pub fn new(call: DeferredCall) -> Self {
        let unresolved = scan(&call).into_iter().map(|(location, _)| location).collect();
        Frame {
            call,
            unresolved,
            resolved: Vec::new(),
            resolving: None,
        }
    }

    pub fn call(&self) -> &DeferredCall {
        &self.call
    }

    pub fn is_ready(&self) -> bool {
        self.unresolved.is_empty()
    }

    /// Move the next nested call out of its slot and mark the slot as the
    /// one being resolved.
    pub(crate) fn take_next_nested(&mut self) -> Result<Option<DeferredCall>, TailError> {
        let Some(location) = self.unresolved.pop_front() else {
            return Ok(None);
        };
        let slot = self.call.args_mut().slot_mut(&location).ok_or_else(|| {
            ExecError::Runtime(format!("argument slot {} vanished during resolution", location))
        })?;
        match mem::replace(slot, Value::Nil) {
            Value::Deferred(nested) => {
                self.resolving = Some(location);
                Ok(Some(nested))
            }
            other => {
                *slot = other;
                Err(ExecError::Runtime(format!(
                    "argument slot {} no longer holds a deferred call",
                    location
                ))
                .into())
            }
        }
    }

    /// Record the concrete value of the slot being resolved
    pub(crate) fn deliver(&mut self, value: Value) -> Result<(), TailError> {
        let location = self.resolving.take().ok_or_else(|| {
            ExecError::Runtime(format!(
                "'{}' received a value while not resolving any argument",
                self.call.target().name()
            ))
        })?;
        self.resolved.push((location, value));
        Ok(())
    }

    /// Substitute resolved values into their slots
    pub(crate) fn finalize(self) -> DeferredCall {
        let Frame {
            mut call, resolved, ..
        } = self;
        for (location, value) in resolved {
            if let Some(slot) = call.args_mut().slot_mut(&location) {
                *slot = value;
            }
        }
        call
    }
}

/// Counters collected over one `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    /// Target operations invoked (function bodies and capabilities)
    pub invocations: usize,
    /// Nested deferred arguments moved onto the stack
    pub nested_resolutions: usize,
    /// Results that were themselves deferred calls
    pub tail_continuations: usize,
    /// Deepest the explicit stack got
    pub max_stack_depth: usize,
}

/// Resource bounds for one `run`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    /// Fail with `StackLimitExceeded` once more frames than this are live
    pub max_stack_depth: Option<usize>,
}

impl Limits {
    pub fn unbounded() -> Self {
        Limits::default()
    }

    pub fn with_max_stack_depth(limit: usize) -> Self {
        Limits {
            max_stack_depth: Some(limit),
        }
    }
}

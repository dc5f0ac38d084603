//! Registered tail-recursive functions.
//!
//! `TailRecursive` is the explicit registration value: it owns the body, its
//! signature and metadata, and the feature set chosen at registration. The
//! body is an ordinary closure; instead of calling itself it returns a
//! deferred call (`ctx.recurse(...)` or `other.defer(...)`), and `invoke`
//! hands that to the trampoline.
//!
//! ```
//! use tailrec::{args, FeatureSet, TailRecursive, Value};
//!
//! let factorial = TailRecursive::builder("factorial")
//!     .param("n")
//!     .param_default("accumulator", 1)
//!     .feature_set(FeatureSet::Base)
//!     .build(|ctx| {
//!         let n = ctx.long("n")?;
//!         let acc = ctx.long("accumulator")?;
//!         if n <= 1 {
//!             return Ok(Value::Long(acc));
//!         }
//!         Ok(ctx.recurse(args![n - 1, n * acc]).into())
//!     });
//!
//! assert_eq!(factorial.invoke(args![20]).unwrap(), Value::Long(2432902008176640000));
//! ```

use std::fmt;
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use tracing::debug;

use super::errors::{ExecError, TailError};
use super::feature_set::FeatureSet;
use super::forwarding::{Deferred, Metadata};
use super::models::{Args, DeferredCall, Operation, Value};
use super::trampoline::{self, Limits, RunStats};
use crate::config::EngineConfig;

/// Function body: runs once per invocation and returns a concrete value or a
/// `Value::Deferred` continuation.
pub type Body = dyn Fn(&CallContext<'_>) -> Result<Value, TailError> + Send + Sync;

/// One declared parameter
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub name: String,
    pub default: Option<Value>,
    /// Only bindable by keyword
    pub keyword_only: bool,
}

/// Declared parameters of a registered function.
///
/// An empty, variadic signature accepts anything and binds nothing by name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Signature {
    pub params: Vec<Param>,
    pub variadic: bool,
}

impl Signature {
    fn positional_params(&self) -> impl Iterator<Item = &Param> {
        self.params.iter().filter(|p| !p.keyword_only)
    }

    /// Bind `name`: by position, then by keyword, then by default.
    pub fn lookup<'a>(&'a self, args: &'a Args, name: &str) -> Option<&'a Value> {
        if let Some(index) = self.positional_params().position(|p| p.name == name) {
            if let Some(value) = args.positional().get(index) {
                return Some(value);
            }
        }
        if let Some(value) = args.keywords().get(name) {
            return Some(value);
        }
        self.params
            .iter()
            .find(|p| p.name == name)
            .and_then(|p| p.default.as_ref())
    }

    /// Reject arguments the declared parameters cannot absorb.
    fn check(&self, function: &str, args: &Args) -> Result<(), ExecError> {
        // A parameter bound by position cannot also arrive by keyword
        for param in self.positional_params().take(args.positional().len()) {
            if args.keywords().contains_key(&param.name) {
                return Err(ExecError::IncorrectArgument(format!(
                    "{}() got multiple values for argument '{}'",
                    function, param.name
                )));
            }
        }
        if self.variadic || self.params.is_empty() {
            return Ok(());
        }
        let accepted = self.positional_params().count();
        if args.positional().len() > accepted {
            return Err(ExecError::IncorrectArgument(format!(
                "{}() takes {} positional argument{} but {} were given",
                function,
                accepted,
                if accepted == 1 { "" } else { "s" },
                args.positional().len()
            )));
        }
        for name in args.keywords().keys() {
            if !self.params.iter().any(|p| &p.name == name) {
                return Err(ExecError::IncorrectArgument(format!(
                    "{}() got an unexpected keyword argument '{}'",
                    function, name
                )));
            }
        }
        Ok(())
    }
}

struct FunctionInner {
    metadata: Arc<Metadata>,
    signature: Signature,
    feature_set: FeatureSet,
    limits: Limits,
    body: Box<Body>,
}

/// A function registered for trampolined execution.
///
/// Cheap to clone; clones share the same registration.
#[derive(Clone)]
pub struct TailRecursive {
    inner: Arc<FunctionInner>,
}

impl TailRecursive {
    pub fn builder(name: impl Into<String>) -> TailRecursiveBuilder {
        TailRecursiveBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.inner.metadata.name
    }

    pub fn feature_set(&self) -> FeatureSet {
        self.inner.feature_set
    }

    pub fn limits(&self) -> Limits {
        self.inner.limits
    }

    pub fn metadata(&self) -> &Metadata {
        &self.inner.metadata
    }

    pub fn signature(&self) -> &Signature {
        &self.inner.signature
    }

    /// Entry point: run the function to a concrete value.
    ///
    /// Equivalent to calling the body directly, except that any deferred
    /// call it returns is driven by the trampoline under this function's
    /// feature set.
    pub fn invoke(&self, args: Args) -> Result<Value, TailError> {
        self.invoke_with_stats(args).map(|(value, _)| value)
    }

    /// Like `invoke`, also reporting what the trampoline did.
    pub fn invoke_with_stats(&self, args: Args) -> Result<(Value, RunStats), TailError> {
        debug!(target: "tailrec::backend::function", function = self.name(), feature_set = %self.inner.feature_set, "invoke");
        trampoline::run_with_stats(self.deferred_call(args), self.inner.feature_set, self.inner.limits)
    }

    /// Record a call to this function without running it.
    pub fn defer(&self, args: Args) -> Deferred {
        Deferred::new(self.deferred_call(args), Arc::clone(&self.inner.metadata))
    }

    /// The bare record behind `defer`
    pub fn deferred_call(&self, args: Args) -> DeferredCall {
        DeferredCall::new(Operation::Function(self.clone()), args)
    }

    pub(crate) fn call_body(&self, ctx: &CallContext<'_>) -> Result<Value, TailError> {
        self.inner.signature.check(self.name(), ctx.args)?;
        (self.inner.body)(ctx)
    }

    pub(crate) fn same_function(&self, other: &TailRecursive) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// A handle that does not keep the registration alive.
    pub fn downgrade(&self) -> WeakTailRecursive {
        WeakTailRecursive {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// Non-owning reference to a `TailRecursive`, for registrations that refer
/// back to each other.
#[derive(Clone)]
pub struct WeakTailRecursive {
    inner: Weak<FunctionInner>,
}

impl WeakTailRecursive {
    /// `None` once every owning handle has been dropped
    pub fn upgrade(&self) -> Option<TailRecursive> {
        self.inner.upgrade().map(|inner| TailRecursive { inner })
    }
}

impl fmt::Debug for WeakTailRecursive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.upgrade() {
            Some(function) => write!(f, "weak({:?})", function),
            None => f.write_str("weak(<dropped>)"),
        }
    }
}

impl fmt::Debug for TailRecursive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tail_recursive(func={}, feature_set={})",
            self.name(),
            self.inner.feature_set
        )
    }
}

/// Builder for `TailRecursive`.
pub struct TailRecursiveBuilder {
    metadata: Metadata,
    signature: Signature,
    feature_set: FeatureSet,
    limits: Limits,
}

impl TailRecursiveBuilder {
    fn new(name: impl Into<String>) -> Self {
        TailRecursiveBuilder {
            metadata: Metadata::new(name),
            signature: Signature::default(),
            feature_set: FeatureSet::default(),
            limits: Limits::default(),
        }
    }

    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.metadata.doc = Some(doc.into());
        self
    }

    pub fn module(mut self, module: impl Into<String>) -> Self {
        self.metadata.module = module.into();
        self
    }

    pub fn qualified_name(mut self, qualified_name: impl Into<String>) -> Self {
        self.metadata.qualified_name = qualified_name.into();
        self
    }

    /// Required parameter, bindable by position or keyword
    pub fn param(mut self, name: impl Into<String>) -> Self {
        self.signature.params.push(Param {
            name: name.into(),
            default: None,
            keyword_only: false,
        });
        self
    }

    /// Optional parameter, bindable by position or keyword
    pub fn param_default(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.signature.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
            keyword_only: false,
        });
        self
    }

    /// Optional parameter only bindable by keyword
    pub fn keyword_param(mut self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.signature.params.push(Param {
            name: name.into(),
            default: Some(default.into()),
            keyword_only: true,
        });
        self
    }

    /// Accept any extra positional or keyword arguments
    pub fn variadic(mut self) -> Self {
        self.signature.variadic = true;
        self
    }

    pub fn annotate(mut self, param: impl Into<String>, annotation: impl Into<String>) -> Self {
        self.metadata
            .annotations
            .insert(param.into(), annotation.into());
        self
    }

    /// Record a name the body captures from its environment
    pub fn capture(mut self, name: impl Into<String>) -> Self {
        self.metadata.captures.push(name.into());
        self
    }

    pub fn feature_set(mut self, feature_set: FeatureSet) -> Self {
        self.feature_set = feature_set;
        self
    }

    pub fn max_stack_depth(mut self, limit: usize) -> Self {
        self.limits.max_stack_depth = Some(limit);
        self
    }

    /// Apply an engine configuration (feature set and limits)
    pub fn config(mut self, config: &EngineConfig) -> Self {
        self.feature_set = config.feature_set;
        self.limits = config.limits();
        self
    }

    pub fn build<F>(self, body: F) -> TailRecursive
    where
        F: Fn(&CallContext<'_>) -> Result<Value, TailError> + Send + Sync + 'static,
    {
        let TailRecursiveBuilder {
            mut metadata,
            signature,
            feature_set,
            limits,
        } = self;

        metadata.defaults = signature
            .params
            .iter()
            .filter(|p| !p.keyword_only)
            .filter_map(|p| p.default.clone())
            .collect();
        metadata.keyword_defaults = signature
            .params
            .iter()
            .filter(|p| p.keyword_only)
            .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
            .collect::<IndexMap<_, _>>();
        metadata.code.params = signature.params.iter().map(|p| p.name.clone()).collect();
        metadata.code.variadic = signature.variadic;

        TailRecursive {
            inner: Arc::new(FunctionInner {
                metadata: Arc::new(metadata),
                signature,
                feature_set,
                limits,
                body: Box::new(body),
            }),
        }
    }
}

/// What a body sees while it runs: its finalized arguments and its own
/// registration (for self-deferral).
pub struct CallContext<'a> {
    function: &'a TailRecursive,
    args: &'a Args,
}

impl<'a> CallContext<'a> {
    pub(crate) fn new(function: &'a TailRecursive, args: &'a Args) -> Self {
        CallContext { function, args }
    }

    pub fn function(&self) -> &TailRecursive {
        self.function
    }

    pub fn args(&self) -> &Args {
        self.args
    }

    pub fn positional(&self) -> &[Value] {
        self.args.positional()
    }

    pub fn keywords(&self) -> &IndexMap<String, Value> {
        self.args.keywords()
    }

    /// Raw positional argument
    pub fn arg(&self, index: usize) -> Result<&Value, TailError> {
        self.args.positional().get(index).ok_or_else(|| {
            ExecError::IncorrectArgument(format!(
                "{}() has no positional argument {}",
                self.function.name(),
                index
            ))
            .into()
        })
    }

    /// Positional arguments from `from` on (empty when out of range)
    pub fn rest(&self, from: usize) -> &[Value] {
        self.args.positional().get(from..).unwrap_or(&[])
    }

    pub fn keyword(&self, name: &str) -> Option<&Value> {
        self.args.keywords().get(name)
    }

    /// Parameter bound through the signature
    pub fn get(&self, name: &str) -> Result<&Value, TailError> {
        self.function
            .signature()
            .lookup(self.args, name)
            .ok_or_else(|| {
                ExecError::MissingArgument {
                    function: self.function.name().to_string(),
                    param: name.to_string(),
                }
                .into()
            })
    }

    pub fn long(&self, name: &str) -> Result<i64, TailError> {
        Ok(self.get(name)?.as_long()?)
    }

    pub fn float(&self, name: &str) -> Result<f64, TailError> {
        Ok(self.get(name)?.as_float()?)
    }

    pub fn boolean(&self, name: &str) -> Result<bool, TailError> {
        Ok(self.get(name)?.as_bool()?)
    }

    pub fn list(&self, name: &str) -> Result<&[Value], TailError> {
        Ok(self.get(name)?.as_list()?)
    }

    pub fn string(&self, name: &str) -> Result<&str, TailError> {
        Ok(self.get(name)?.as_str()?)
    }

    /// Defer a call to the running function
    pub fn recurse(&self, args: Args) -> Deferred {
        self.function.defer(args)
    }
}

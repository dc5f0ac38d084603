//! Reference programs.
//!
//! Small tail-recursive functions used by the `tailrec` binary, the
//! integration tests and the benchmarks. Each constructor registers a fresh
//! function under the given feature set.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, OnceLock};

use crate::args;
use crate::backend::errors::{ExecError, TailError};
use crate::backend::feature_set::FeatureSet;
use crate::backend::function::{TailRecursive, WeakTailRecursive};
use crate::backend::models::{Args, Value};

/// Counts `n` down to zero one tail call at a time. Works under every
/// feature set.
pub fn countdown(feature_set: FeatureSet) -> TailRecursive {
    TailRecursive::builder("countdown")
        .param("n")
        .feature_set(feature_set)
        .doc("Count down to zero")
        .build(|ctx| {
            let n = ctx.long("n")?;
            if n <= 0 {
                return Ok(Value::Long(0));
            }
            Ok(ctx.recurse(args![n - 1]).into())
        })
}

/// Accumulator-passing factorial. Works under every feature set.
pub fn factorial(feature_set: FeatureSet) -> TailRecursive {
    TailRecursive::builder("factorial")
        .param("n")
        .param_default("accumulator", 1)
        .annotate("n", "int")
        .feature_set(feature_set)
        .doc("n! with an accumulator")
        .build(|ctx| {
            let n = ctx.long("n")?;
            let accumulator = ctx.long("accumulator")?;
            if n <= 1 {
                return Ok(Value::Long(accumulator));
            }
            let next = n
                .checked_mul(accumulator)
                .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: {} * {}", n, accumulator)))?;
            Ok(ctx.recurse(args![n - 1, next]).into())
        })
}

/// `n * factorial(n - 1)` written directly on the deferred result. Needs
/// `Full`.
pub fn factorial_forwarding(feature_set: FeatureSet) -> TailRecursive {
    TailRecursive::builder("factorial")
        .param("n")
        .feature_set(feature_set)
        .build(|ctx| {
            let n = ctx.long("n")?;
            if n <= 1 {
                return Ok(Value::Long(1));
            }
            Ok((n * ctx.recurse(args![n - 1])).into())
        })
}

/// Tail-form Fibonacci carrying the last two terms. Works under every
/// feature set.
pub fn fibonacci(feature_set: FeatureSet) -> TailRecursive {
    TailRecursive::builder("fibonacci")
        .param("n")
        .param_default("a", 0)
        .param_default("b", 1)
        .feature_set(feature_set)
        .build(|ctx| {
            let n = ctx.long("n")?;
            let a = ctx.long("a")?;
            let b = ctx.long("b")?;
            if n == 0 {
                return Ok(Value::Long(a));
            }
            let next = a
                .checked_add(b)
                .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: {} + {}", a, b)))?;
            Ok(ctx.recurse(args![n - 1, b, next]).into())
        })
}

/// Two-argument addition as a registered function, for composing deferred
/// calls as arguments.
pub fn add(feature_set: FeatureSet) -> TailRecursive {
    TailRecursive::builder("add")
        .param("a")
        .param("b")
        .feature_set(feature_set)
        .build(|ctx| {
            let a = ctx.long("a")?;
            let b = ctx.long("b")?;
            a.checked_add(b)
                .map(Value::Long)
                .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: {} + {}", a, b)).into())
        })
}

/// Two-argument multiplication as a registered function.
pub fn mul(feature_set: FeatureSet) -> TailRecursive {
    TailRecursive::builder("mul")
        .param("a")
        .param("b")
        .feature_set(feature_set)
        .build(|ctx| {
            let a = ctx.long("a")?;
            let b = ctx.long("b")?;
            a.checked_mul(b)
                .map(Value::Long)
                .ok_or_else(|| ExecError::Arithmetic(format!("Integer overflow: {} * {}", a, b)).into())
        })
}

/// `add(fib(n - 1), fib(n - 2))`: both recursive calls are deferred
/// arguments of another deferred call. Needs `NestedCalls`. Exponential in
/// `n`.
pub fn nested_fibonacci(feature_set: FeatureSet) -> TailRecursive {
    let add = add(feature_set);
    TailRecursive::builder("fibonacci")
        .param("n")
        .capture("add")
        .feature_set(feature_set)
        .build(move |ctx| {
            let n = ctx.long("n")?;
            if n <= 1 {
                return Ok(Value::Long(n));
            }
            Ok(add
                .defer(args![ctx.recurse(args![n - 1]), ctx.recurse(args![n - 2])])
                .into())
        })
}

/// `mul(n, factorial(n - 1))` with the recursive call as a deferred argument.
/// Needs `NestedCalls`.
pub fn nested_factorial(feature_set: FeatureSet) -> TailRecursive {
    let mul = mul(feature_set);
    TailRecursive::builder("factorial")
        .param("n")
        .capture("mul")
        .feature_set(feature_set)
        .build(move |ctx| {
            let n = ctx.long("n")?;
            if n <= 1 {
                return Ok(Value::Long(1));
            }
            Ok(mul.defer(args![n, ctx.recurse(args![n - 1])]).into())
        })
}

/// `add(n, sum(n - 1))`: 0 + 1 + ... + n through nested resolution. The
/// explicit stack grows to `n` frames. Needs `NestedCalls`.
pub fn sum_nested(feature_set: FeatureSet) -> TailRecursive {
    let add = add(feature_set);
    TailRecursive::builder("sum")
        .param("n")
        .capture("add")
        .feature_set(feature_set)
        .build(move |ctx| {
            let n = ctx.long("n")?;
            if n <= 0 {
                return Ok(Value::Long(0));
            }
            Ok(add.defer(args![n, ctx.recurse(args![n - 1])]).into())
        })
}

/// `[last] + reverse(middle) + [first]` on the deferred result. Needs
/// `Full`.
pub fn reverse(feature_set: FeatureSet) -> TailRecursive {
    TailRecursive::builder("reverse")
        .param("items")
        .feature_set(feature_set)
        .doc("Reverse a list")
        .build(|ctx| {
            let items = ctx.list("items")?;
            if items.len() <= 1 {
                return Ok(Value::List(items.to_vec()));
            }
            let first = items[0].clone();
            let last = items[items.len() - 1].clone();
            let middle = items[1..items.len() - 1].to_vec();
            Ok((Value::List(vec![last]) + ctx.recurse(args![middle]) + Value::List(vec![first])).into())
        })
}

/// Mutually recursive parity check: `is_even(n) = is_odd(n - 1)`.
///
/// Returns `(is_even, is_odd)`. `is_even` owns `is_odd`, while `is_odd` only
/// holds a weak handle back, so the pair is freed once the caller drops
/// both. `is_odd` fails with a runtime error if `is_even` is gone.
pub fn parity(feature_set: FeatureSet) -> (TailRecursive, TailRecursive) {
    let even_cell: Arc<OnceLock<WeakTailRecursive>> = Arc::new(OnceLock::new());
    let odd_cell: Arc<OnceLock<TailRecursive>> = Arc::new(OnceLock::new());

    let is_even = {
        let odd_cell = Arc::clone(&odd_cell);
        TailRecursive::builder("is_even")
            .param("n")
            .capture("is_odd")
            .feature_set(feature_set)
            .build(move |ctx| {
                let n = ctx.long("n")?;
                if n == 0 {
                    return Ok(Value::Bool(true));
                }
                let is_odd = odd_cell.get().ok_or_else(|| not_registered("is_odd"))?;
                Ok(is_odd.defer(args![n - 1]).into())
            })
    };
    let is_odd = {
        let even_cell = Arc::clone(&even_cell);
        TailRecursive::builder("is_odd")
            .param("n")
            .capture("is_even")
            .feature_set(feature_set)
            .build(move |ctx| {
                let n = ctx.long("n")?;
                if n == 0 {
                    return Ok(Value::Bool(false));
                }
                let is_even = even_cell
                    .get()
                    .and_then(WeakTailRecursive::upgrade)
                    .ok_or_else(|| not_registered("is_even"))?;
                Ok(is_even.defer(args![n - 1]).into())
            })
    };

    // Fresh cells: these sets cannot fail
    let _ = even_cell.set(is_even.downgrade());
    let _ = odd_cell.set(is_odd.clone());
    (is_even, is_odd)
}

fn not_registered(name: &str) -> TailError {
    ExecError::Runtime(format!("'{}' is not registered", name)).into()
}

/// Programs the binary can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Program {
    Countdown,
    Factorial,
    Fibonacci,
    SumNested,
    Reverse,
}

impl Program {
    pub const ALL: [Program; 5] = [
        Program::Countdown,
        Program::Factorial,
        Program::Fibonacci,
        Program::SumNested,
        Program::Reverse,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Program::Countdown => "countdown",
            Program::Factorial => "factorial",
            Program::Fibonacci => "fibonacci",
            Program::SumNested => "sum-nested",
            Program::Reverse => "reverse",
        }
    }

    /// Lowest feature set the program runs under
    pub fn required_feature_set(self) -> FeatureSet {
        match self {
            Program::Countdown | Program::Factorial | Program::Fibonacci => FeatureSet::Base,
            Program::SumNested => FeatureSet::NestedCalls,
            Program::Reverse => FeatureSet::Full,
        }
    }

    pub fn register(self, feature_set: FeatureSet) -> TailRecursive {
        match self {
            Program::Countdown => countdown(feature_set),
            Program::Factorial => factorial(feature_set),
            Program::Fibonacci => fibonacci(feature_set),
            Program::SumNested => sum_nested(feature_set),
            Program::Reverse => reverse(feature_set),
        }
    }

    /// Entry arguments for input size `n`
    pub fn args(self, n: i64) -> Args {
        match self {
            Program::Reverse => args![(0..n).collect::<Vec<i64>>()],
            _ => args![n],
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Program {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Program::ALL
            .into_iter()
            .find(|program| program.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown program '{}'", s))
    }
}

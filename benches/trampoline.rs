//! Trampoline Benchmark Suite
//!
//! Measures the cost of each feature-set tier on the same programs:
//! - Countdown: pure tail calls (Base minimal loop vs explicit-stack loop)
//! - Factorial: accumulator form vs nested `mul` call vs operator forwarding
//! - Sum: nested resolution with a stack as deep as the input
//!
//! Run with:
//!   cargo bench --bench trampoline

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tailrec::demos;
use tailrec::{args, FeatureSet};

fn bench_countdown(c: &mut Criterion) {
    let mut group = c.benchmark_group("countdown");
    group.measurement_time(Duration::from_secs(5));

    for feature_set in FeatureSet::ALL {
        let countdown = demos::countdown(feature_set);
        group.bench_with_input(
            BenchmarkId::new("tail_calls_10k", feature_set),
            &countdown,
            |b, countdown| b.iter(|| countdown.invoke(black_box(args![10_000])).unwrap()),
        );
    }

    group.finish();
}

fn bench_factorial_styles(c: &mut Criterion) {
    let mut group = c.benchmark_group("factorial_20");
    group.sample_size(200);

    let accumulator = demos::factorial(FeatureSet::Base);
    group.bench_function("accumulator_base", |b| {
        b.iter(|| accumulator.invoke(black_box(args![20])).unwrap())
    });

    let nested = demos::nested_factorial(FeatureSet::NestedCalls);
    group.bench_function("nested_mul", |b| {
        b.iter(|| nested.invoke(black_box(args![20])).unwrap())
    });

    let forwarding = demos::factorial_forwarding(FeatureSet::Full);
    group.bench_function("operator_forwarding", |b| {
        b.iter(|| forwarding.invoke(black_box(args![20])).unwrap())
    });

    group.finish();
}

fn bench_nested_depth(c: &mut Criterion) {
    let mut group = c.benchmark_group("sum_nested");
    group.sample_size(20); // Deep stacks are slow

    let sum = demos::sum_nested(FeatureSet::NestedCalls);
    for n in [100i64, 1_000, 10_000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| sum.invoke(black_box(args![n])).unwrap())
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_countdown,
    bench_factorial_styles,
    bench_nested_depth
);
criterion_main!(benches);

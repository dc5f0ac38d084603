//! Tests for operator forwarding on unresolved calls

mod common;

use common::*;
use tailrec::{args, Capability, ExecError, FeatureSet, Record, TailError, TailRecursive, Value};

#[test]
fn test_factorial_with_operator() {
    let factorial = demos::factorial_forwarding(FeatureSet::Full);

    let (value, stats) = factorial.invoke_with_stats(args![5]).unwrap();
    assert_eq!(value, Value::Long(120));
    assert_eq!(stats.nested_resolutions, 4);

    let (value, stats) = factorial.invoke_with_stats(args![0]).unwrap();
    assert_eq!(value, Value::Long(1));
    assert_eq!(stats.nested_resolutions, 0);
    assert_eq!(stats.invocations, 1);

    assert_eq!(factorial.invoke(args![20]).unwrap(), Value::Long(reference_factorial(20)));
}

#[test]
fn test_fibonacci_with_two_pending_operands() {
    let fibonacci = TailRecursive::builder("fibonacci")
        .param("n")
        .build(|ctx| {
            let n = ctx.long("n")?;
            if n <= 1 {
                return Ok(Value::Long(n));
            }
            Ok((ctx.recurse(args![n - 1]) + ctx.recurse(args![n - 2])).into())
        });

    for n in [0, 1, 4, 7, 15] {
        assert_eq!(fibonacci.invoke(args![n]).unwrap(), Value::Long(reference_fibonacci(n)));
    }
}

#[test]
fn test_list_concatenation_either_operand_order() {
    // f(false) = f(true) + [2]
    let pending_left = TailRecursive::builder("func1")
        .param_default("is_base_case", false)
        .build(|ctx| {
            if ctx.boolean("is_base_case")? {
                return Ok(Value::from(vec![1]));
            }
            Ok((ctx.recurse(args![true]) + Value::from(vec![2])).into())
        });

    // f(false) = [1] + f(true)
    let pending_right = TailRecursive::builder("func2")
        .param_default("is_base_case", false)
        .build(|ctx| {
            if ctx.boolean("is_base_case")? {
                return Ok(Value::from(vec![2]));
            }
            Ok((Value::from(vec![1]) + ctx.recurse(args![true])).into())
        });

    assert_eq!(pending_left.invoke(args![]).unwrap(), Value::from(vec![1, 2]));
    assert_eq!(pending_right.invoke(args![]).unwrap(), Value::from(vec![1, 2]));
}

#[test]
fn test_reverse() {
    let reverse = demos::reverse(FeatureSet::Full);
    for n in [0i64, 1, 2, 10, 1000] {
        let items: Vec<i64> = (0..n).collect();
        let expected: Vec<i64> = items.iter().rev().copied().collect();
        assert_eq!(reverse.invoke(args![items]).unwrap(), Value::from(expected));
    }
}

#[test]
fn test_tuple_factory() {
    let factory = tuple_factory(FeatureSet::Full);
    let numbers = TailRecursive::builder("square_and_triangular_numbers")
        .param("n")
        .build(move |ctx| {
            let n = ctx.long("n")?;
            let square = n * n;
            let triangular: Value = if n == 1 {
                Value::Long(n)
            } else {
                (n + ctx.recurse(args![n - 1]).get_item(1)).into()
            };
            Ok(factory.defer(args![square, triangular]).into())
        });

    assert_eq!(numbers.invoke(args![3]).unwrap(), Value::from(vec![9, 6]));
    assert_eq!(numbers.invoke(args![100]).unwrap(), Value::from(vec![10_000, 5050]));
}

#[test]
fn test_deferred_inside_container_is_not_resolved() {
    // Only argument slots are scanned; a pending call inside a returned list
    // comes back as-is
    let numbers = TailRecursive::builder("square_and_triangular_numbers")
        .param("n")
        .build(|ctx| {
            let n = ctx.long("n")?;
            let triangular: Value = if n == 1 {
                Value::Long(n)
            } else {
                (n + ctx.recurse(args![n - 1]).get_item(1)).into()
            };
            Ok(Value::List(vec![Value::Long(n * n), triangular]))
        });

    let value = numbers.invoke(args![3]).unwrap();
    let items = value.as_list().unwrap();
    assert_eq!(items[0], Value::Long(9));
    assert!(items[1].is_deferred());
    assert_ne!(value, Value::from(vec![9, 6]));
}

#[test]
fn test_record_constructor_with_keyword_arguments() {
    let constructor = TailRecursive::builder("SquareAndTriangularNumber")
        .param("square")
        .param_default("triangular", 1)
        .build(|ctx| {
            Ok(Record::new("SquareAndTriangularNumber")
                .with_field("square", ctx.get("square")?.clone())
                .with_field("triangular", ctx.get("triangular")?.clone())
                .into())
        });

    let numbers = TailRecursive::builder("square_and_triangular_numbers")
        .param("n")
        .build(move |ctx| {
            let n = ctx.long("n")?;
            let triangular: Value = if n == 1 {
                Value::Long(1)
            } else {
                (n + ctx.recurse(args![n - 1]).attr("triangular")).into()
            };
            Ok(constructor
                .defer(args![; square = n * n, triangular = triangular])
                .into())
        });

    let value = numbers.invoke(args![3]).unwrap();
    let record = value.as_record().unwrap();
    assert_eq!(record.field("square"), Some(&Value::Long(9)));
    assert_eq!(record.field("triangular"), Some(&Value::Long(6)));
}

#[test]
fn test_comparison_and_conversion_chain() {
    // Is the sum 1..=n above the threshold?
    let sum = TailRecursive::builder("sum")
        .param("n")
        .build(|ctx| {
            let n = ctx.long("n")?;
            if n == 0 {
                return Ok(Value::Long(0));
            }
            Ok((n + ctx.recurse(args![n - 1])).into())
        });
    let above = TailRecursive::builder("above")
        .param("n")
        .param("threshold")
        .build(move |ctx| {
            let n = ctx.long("n")?;
            let threshold = ctx.long("threshold")?;
            Ok(sum.defer(args![n]).to_float().greater_than(threshold).into())
        });

    assert_eq!(above.invoke(args![10, 54]).unwrap(), Value::Bool(true));
    assert_eq!(above.invoke(args![10, 55]).unwrap(), Value::Bool(false));
}

#[test]
fn test_excluded_capabilities_build_nothing() {
    let factorial = demos::factorial_forwarding(FeatureSet::Full);
    for capability in [
        Capability::Construct,
        Capability::Initialize,
        Capability::AttributeLookup,
        Capability::SetName,
        Capability::Render,
    ] {
        let err = factorial.defer(args![3]).forward(capability, Vec::<Value>::new()).unwrap_err();
        assert_eq!(err, TailError::UnsupportedCapability { capability });
    }

    let err = factorial.defer(args![3]).set_attr("n", 4).unwrap_err();
    assert!(matches!(err, TailError::AttributeNotSettable { ref attribute } if attribute == "n"));
}

#[test]
fn test_explicit_forward() {
    let factorial = demos::factorial_forwarding(FeatureSet::Full);
    let entry = TailRecursive::builder("entry").build(move |_| {
        Ok(factorial
            .defer(args![4])
            .forward(Capability::Sub, vec![Value::Long(4)])?
            .into())
    });
    assert_eq!(entry.invoke(args![]).unwrap(), Value::Long(20));
}

#[test]
fn test_metadata_without_evaluation() {
    let factorial = demos::factorial(FeatureSet::Full);
    let deferred = factorial.defer(args![4]);

    assert_eq!(deferred.name(), "factorial");
    assert_eq!(deferred.doc(), Some("n! with an accumulator"));
    assert_eq!(deferred.defaults(), &[Value::Long(1)]);
    assert_eq!(deferred.code().params, vec!["n", "accumulator"]);
    assert_eq!(deferred.annotations()["n"], "int");
    assert!(deferred.keyword_defaults().is_empty());
    assert!(deferred.captures().is_empty());
}

#[test]
fn test_describe_renders_call_shape() {
    let factorial = demos::factorial_forwarding(FeatureSet::Full);
    assert_eq!(factorial.defer(args![4]).describe(), "factorial.defer(4)");
    assert_eq!(
        (5i64 * factorial.defer(args![4])).describe(),
        "rmul.defer(factorial.defer(4), 5)"
    );
    assert_eq!(
        (-(factorial.defer(args![2]) - 1)).describe(),
        "neg.defer(sub.defer(factorial.defer(2), 1))"
    );
}

#[test]
fn test_oversized_repetition_surfaces_as_error() {
    let count = TailRecursive::builder("count").build(|_| Ok(Value::Long(i64::MAX)));
    let entry = TailRecursive::builder("entry").build(move |_| {
        Ok((Value::from("ab") * count.defer(args![])).into())
    });
    let err = entry.invoke(args![]).unwrap_err();
    assert!(matches!(
        err,
        TailError::Target(ExecError::Arithmetic(ref m)) if m.contains("repetition overflow")
    ));
}

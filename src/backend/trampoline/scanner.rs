//! Nested-argument scanner.

use smallvec::SmallVec;

use crate::backend::models::{ArgumentLocation, DeferredCall, Value};

/// List the argument slots of `call` holding a deferred call, positional
/// slots first, then keywords in insertion order.
///
/// Only one level is inspected: a deferred call nested inside a nested call
/// is found when that inner frame is scanned in turn. Values inside lists and
/// records are not looked at.
pub fn scan(call: &DeferredCall) -> SmallVec<[(ArgumentLocation, &DeferredCall); 4]> {
    call.args()
        .iter()
        .filter_map(|(location, value)| match value {
            Value::Deferred(nested) => Some((location, nested)),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::grounded::Capability;
    use crate::backend::models::{Args, Operation};

    fn cap(capability: Capability, args: Args) -> DeferredCall {
        DeferredCall::new(Operation::Capability(capability), args)
    }

    #[test]
    fn test_scan_order_positional_then_keyword() {
        let inner = || Value::Deferred(cap(Capability::Len, Args::from_positional(vec!["ab".into()])));
        let call = cap(
            Capability::Add,
            Args::from_positional(vec![Value::Long(1), inner(), inner()])
                .with_keyword("z", inner())
                .with_keyword("a", 3)
                .with_keyword("b", inner()),
        );

        let locations: Vec<ArgumentLocation> = scan(&call).into_iter().map(|(l, _)| l).collect();
        assert_eq!(
            locations,
            vec![
                ArgumentLocation::Positional(1),
                ArgumentLocation::Positional(2),
                ArgumentLocation::Keyword("z".to_string()),
                ArgumentLocation::Keyword("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_scan_is_one_level_deep() {
        let deepest = cap(Capability::Len, Args::from_positional(vec!["x".into()]));
        let middle = cap(Capability::Neg, Args::from_positional(vec![deepest.into()]));
        let list = Value::List(vec![Value::Deferred(middle.clone())]);
        let call = cap(Capability::Add, Args::from_positional(vec![middle.into(), list]));

        let found = scan(&call);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].1.target(), &Operation::Capability(Capability::Neg));
    }

    #[test]
    fn test_scan_concrete_call_is_empty() {
        let call = cap(Capability::Add, Args::from_positional(vec![1.into(), 2.into()]));
        assert!(scan(&call).is_empty());
    }
}

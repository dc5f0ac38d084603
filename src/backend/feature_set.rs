//! Feature-set gate.
//!
//! Three ordered tiers select which resolution layers are active for a
//! registered function:
//!
//! - `Base` - minimal loop, the returned call's target is invoked on its
//!   stored arguments until a concrete value appears
//! - `NestedCalls` - adds the argument scanner and the explicit-stack loop
//! - `Full` - adds operator forwarding on unresolved results
//!
//! Each tier's capabilities are a superset of the previous one, so the
//! derived `Ord` doubles as the containment check.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum FeatureSet {
    Base,
    NestedCalls,
    #[default]
    Full,
}

impl FeatureSet {
    pub const ALL: [FeatureSet; 3] = [FeatureSet::Base, FeatureSet::NestedCalls, FeatureSet::Full];

    /// Whether nested deferred calls in arguments are resolved.
    #[inline]
    pub fn resolves_nested_calls(self) -> bool {
        self >= FeatureSet::NestedCalls
    }

    /// Whether capability calls built by the forwarding wrapper may run.
    #[inline]
    pub fn forwards_operators(self) -> bool {
        self >= FeatureSet::Full
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FeatureSet::Base => "base",
            FeatureSet::NestedCalls => "nested_calls",
            FeatureSet::Full => "full",
        }
    }
}

impl fmt::Display for FeatureSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a string names no feature set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("'{0}' is not a valid FeatureSet")]
pub struct ParseFeatureSetError(pub String);

impl FromStr for FeatureSet {
    type Err = ParseFeatureSetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base" => Ok(FeatureSet::Base),
            "nested_calls" | "nested-calls" | "nested" => Ok(FeatureSet::NestedCalls),
            "full" => Ok(FeatureSet::Full),
            _ => Err(ParseFeatureSetError(s.to_string())),
        }
    }
}

impl TryFrom<String> for FeatureSet {
    type Error = ParseFeatureSetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_order() {
        assert!(FeatureSet::Base < FeatureSet::NestedCalls);
        assert!(FeatureSet::NestedCalls < FeatureSet::Full);
        assert_eq!(FeatureSet::default(), FeatureSet::Full);
    }

    #[test]
    fn test_capability_containment() {
        for fs in FeatureSet::ALL {
            if fs.forwards_operators() {
                assert!(fs.resolves_nested_calls());
            }
        }
        assert!(!FeatureSet::Base.resolves_nested_calls());
        assert!(!FeatureSet::NestedCalls.forwards_operators());
    }

    #[test]
    fn test_parse_from_string() {
        assert_eq!("full".parse::<FeatureSet>().unwrap(), FeatureSet::Full);
        assert_eq!("base".parse::<FeatureSet>().unwrap(), FeatureSet::Base);
        assert_eq!("nested_calls".parse::<FeatureSet>().unwrap(), FeatureSet::NestedCalls);
        assert_eq!("Nested".parse::<FeatureSet>().unwrap(), FeatureSet::NestedCalls);
    }

    #[test]
    fn test_parse_unknown_feature_set() {
        let err = "not_a_feature_set".parse::<FeatureSet>().unwrap_err();
        assert_eq!(err.to_string(), "'not_a_feature_set' is not a valid FeatureSet");
    }

    #[test]
    fn test_display_round_trips_through_parse() {
        for fs in FeatureSet::ALL {
            assert_eq!(fs.to_string().parse::<FeatureSet>().unwrap(), fs);
        }
    }
}

//! Argument lists and argument addressing.
//!
//! `Args` is an ordered positional sequence plus an insertion-ordered keyword
//! map. `ArgumentLocation` addresses one slot of it; the scanner and the
//! trampoline frames use locations to remember which slot a nested call came
//! from and where its resolution must be written back.

use std::fmt;

use indexmap::IndexMap;

use super::Value;

/// One argument slot: a positional index or a keyword name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ArgumentLocation {
    Positional(usize),
    Keyword(String),
}

impl fmt::Display for ArgumentLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentLocation::Positional(index) => write!(f, "positional {}", index),
            ArgumentLocation::Keyword(name) => write!(f, "keyword '{}'", name),
        }
    }
}

/// Positional and keyword arguments of one invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Args {
    positional: Vec<Value>,
    keywords: IndexMap<String, Value>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_positional(positional: Vec<Value>) -> Self {
        Args {
            positional,
            keywords: IndexMap::new(),
        }
    }

    pub fn from_parts(positional: Vec<Value>, keywords: IndexMap<String, Value>) -> Self {
        Args {
            positional,
            keywords,
        }
    }

    /// Builder-style keyword argument
    pub fn with_keyword(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.push_keyword(name, value);
        self
    }

    /// Append a keyword argument; re-using a name replaces the value in place
    pub fn push_keyword(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.keywords.insert(name.into(), value.into());
    }

    #[inline]
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    #[inline]
    pub fn keywords(&self) -> &IndexMap<String, Value> {
        &self.keywords
    }

    /// Total number of slots (positional + keyword)
    pub fn len(&self) -> usize {
        self.positional.len() + self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keywords.is_empty()
    }

    pub fn get(&self, location: &ArgumentLocation) -> Option<&Value> {
        match location {
            ArgumentLocation::Positional(index) => self.positional.get(*index),
            ArgumentLocation::Keyword(name) => self.keywords.get(name),
        }
    }

    /// Mutable slot access, reserved for frames owned by the trampoline
    pub(crate) fn slot_mut(&mut self, location: &ArgumentLocation) -> Option<&mut Value> {
        match location {
            ArgumentLocation::Positional(index) => self.positional.get_mut(*index),
            ArgumentLocation::Keyword(name) => self.keywords.get_mut(name),
        }
    }

    /// All slots in scan order: positional first, then keywords in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (ArgumentLocation, &Value)> {
        self.positional
            .iter()
            .enumerate()
            .map(|(index, value)| (ArgumentLocation::Positional(index), value))
            .chain(
                self.keywords
                    .iter()
                    .map(|(name, value)| (ArgumentLocation::Keyword(name.clone()), value)),
            )
    }

    pub fn into_parts(self) -> (Vec<Value>, IndexMap<String, Value>) {
        (self.positional, self.keywords)
    }
}

impl From<Vec<Value>> for Args {
    fn from(positional: Vec<Value>) -> Self {
        Args::from_positional(positional)
    }
}

/// Build an `Args` value.
///
/// ```
/// use tailrec::{args, Value};
///
/// let a = args![5, "x"];
/// assert_eq!(a.positional()[0], Value::Long(5));
///
/// let b = args![10; accumulator = 1];
/// assert_eq!(b.keywords()["accumulator"], Value::Long(1));
///
/// let c = args![; only = true];
/// assert!(c.positional().is_empty());
/// ```
#[macro_export]
macro_rules! args {
    () => {
        $crate::Args::new()
    };
    ($($pos:expr),+ $(,)?) => {
        $crate::Args::from_positional(vec![$($crate::Value::from($pos)),+])
    };
    ($($pos:expr),* ; $($name:ident = $kw:expr),+ $(,)?) => {{
        let mut args = $crate::Args::from_positional(vec![$($crate::Value::from($pos)),*]);
        $( args.push_keyword(stringify!($name), $crate::Value::from($kw)); )+
        args
    }};
}

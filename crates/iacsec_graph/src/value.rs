//! Provenance-carrying scalar values.

use serde::Serialize;

use crate::range::{Metadata, Provenance, Range};

/// An extracted scalar together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Value<T> {
    pub value: T,
    pub metadata: Metadata,
}

pub type BoolValue = Value<bool>;
pub type StringValue = Value<String>;
pub type IntValue = Value<i64>;

impl<T> Value<T> {
    /// A value declared in source at `range`.
    pub fn explicit(value: impl Into<T>, range: Range) -> Self {
        Self {
            value: value.into(),
            metadata: Metadata::explicit(range),
        }
    }

    /// A schema default for an attribute missing from a present block.
    pub fn defaulted(value: impl Into<T>) -> Self {
        Self {
            value: value.into(),
            metadata: Metadata::defaulted(),
        }
    }

    /// A schema default on a placeholder entity.
    pub fn unmanaged(value: impl Into<T>) -> Self {
        Self {
            value: value.into(),
            metadata: Metadata::unmanaged(),
        }
    }

    pub fn provenance(&self) -> Provenance {
        self.metadata.provenance()
    }

    pub fn range(&self) -> &Range {
        self.metadata.range()
    }

    pub fn is_explicit(&self) -> bool {
        self.metadata.is_explicit()
    }
}

impl<T: PartialEq> Value<T> {
    pub fn equal_to(&self, other: &T) -> bool {
        self.value == *other
    }
}

impl BoolValue {
    pub fn is_true(&self) -> bool {
        self.value
    }

    pub fn is_false(&self) -> bool {
        !self.value
    }
}

impl StringValue {
    pub fn as_str(&self) -> &str {
        &self.value
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

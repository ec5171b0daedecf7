//! Positional identities.
//!
//! Within a single comparison a field is identified by its position in the
//! `fields` container, not by its `fieldId`. Positions are kept string-encoded
//! because that is how clients key the report, but they order numerically.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::path::PathSegment;

macro_rules! position_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(position: impl Into<String>) -> Self {
                Self(position.into())
            }

            /// Extract a position from a path segment (array index or digit key).
            pub fn from_segment(segment: &PathSegment) -> Option<Self> {
                segment.as_position().map(Self)
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// The position as an array offset, if it fits.
            pub fn as_usize(&self) -> Option<usize> {
                self.0.parse().ok()
            }
        }

        impl Ord for $name {
            fn cmp(&self, other: &Self) -> Ordering {
                self.0
                    .len()
                    .cmp(&other.0.len())
                    .then_with(|| self.0.cmp(&other.0))
            }
        }

        impl PartialOrd for $name {
            fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
                Some(self.cmp(other))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<usize> for $name {
            fn from(position: usize) -> Self {
                Self(position.to_string())
            }
        }

        impl From<&str> for $name {
            fn from(position: &str) -> Self {
                Self(position.to_string())
            }
        }
    };
}

position_newtype!(
    /// Position of a field inside the document's `fields` container.
    FieldIndex
);

position_newtype!(
    /// Position of a rule inside a field's `rules` list.
    RuleIndex
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_numerically() {
        let mut indices: Vec<FieldIndex> = ["10", "2", "0", "1"].into_iter().map(FieldIndex::from).collect();
        indices.sort();
        let order: Vec<&str> = indices.iter().map(FieldIndex::as_str).collect();
        assert_eq!(order, vec!["0", "1", "2", "10"]);
    }

    #[test]
    fn serializes_as_plain_string() {
        let idx = RuleIndex::from(4);
        assert_eq!(serde_json::to_string(&idx).unwrap(), "\"4\"");
        assert_eq!(idx.as_usize(), Some(4));
    }

    #[test]
    fn from_segment_rejects_names() {
        assert_eq!(
            FieldIndex::from_segment(&PathSegment::Index(7)),
            Some(FieldIndex::from(7))
        );
        assert!(FieldIndex::from_segment(&PathSegment::key("label")).is_none());
    }
}

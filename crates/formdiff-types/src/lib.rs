//! Foundation types for formdiff.
//!
//! This crate provides the structural vocabulary shared by the diff engine,
//! the classifier, and the transport front ends.
//!
//! # Key Types
//!
//! - [`PathSegment`] / [`Path`] -- Typed location of a change inside a document
//! - [`Document`] -- A validated form definition (must carry a `fields` container)
//! - [`FieldView`] -- Read-only accessors over a single field definition
//! - [`FieldIndex`] / [`RuleIndex`] -- String-encoded positional identities

pub mod document;
pub mod error;
pub mod index;
pub mod path;

pub use document::{kind_name, Document, FieldView, FIELDS_KEY, PROPERTIES_KEY, RULES_KEY, UUID_KEY};
pub use error::{TypeError, TypeResult};
pub use index::{FieldIndex, RuleIndex};
pub use path::{is_name_token, tokenize_path, Path, PathSegment};

//! Structural diff engine for formdiff.
//!
//! Compares two JSON trees and emits path-addressed change records grouped
//! into six categories, optionally with a normalized distance in `[0, 1]`.
//! Consumers depend on the [`DiffEngine`] trait so the engine can be swapped.
//!
//! # Key Types
//!
//! - [`DiffEngine`] / [`TreeDiffEngine`] -- Engine seam and the default positional engine
//! - [`DiffOptions`] -- Exclusion predicate and distance toggle
//! - [`ChangeRecord`] / [`ChangeKind`] -- A single change at a typed [`Path`](formdiff_types::Path)
//! - [`ChangeSet`] -- All records of one comparison, by category

pub mod distance;
pub mod engine;
pub mod record;

pub use distance::{leaf_count, raw_distance};
pub use engine::{DiffEngine, DiffOptions, ExcludeFn, TreeDiffEngine};
pub use record::{ChangeKind, ChangeRecord, ChangeSet};

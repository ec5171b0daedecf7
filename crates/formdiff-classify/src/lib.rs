//! Form definition change classification.
//!
//! Re-projects a generic, path-addressed structural diff between an original
//! and a modified form definition into a field-indexed change report: which
//! fields were added or removed wholesale, which field settings, nested
//! properties, and rules changed, and a distance score in `[0, 100]`.
//!
//! # Key Types
//!
//! - [`Classifier`] -- Drives one classification pass over a [`DiffEngine`](formdiff_diff::DiffEngine)
//! - [`PathClass`] -- Structural category of a change path
//! - [`FieldLookup`] -- Two-document field resolution (original first, then modified)
//! - [`ChangeAccumulator`] -- Get-or-create change buckets for one pass
//! - [`Report`] -- The serializable result

pub mod accumulator;
pub mod classifier;
pub mod distance;
pub mod error;
pub mod lookup;
pub mod path_class;
pub mod report;

pub use accumulator::ChangeAccumulator;
pub use classifier::{classify, is_field_uuid, Classifier};
pub use distance::normalize_distance;
pub use error::{ClassifyError, ClassifyResult};
pub use lookup::FieldLookup;
pub use path_class::{classify_path, PathClass, RawPath};
pub use report::{
    ChangeAction, ChangedRule, FieldChangeEntry, FieldSummary, FormChangeEntry, PropertyBucket,
    PropertyChanges, PropertyEntry, Report, RuleEntry,
};

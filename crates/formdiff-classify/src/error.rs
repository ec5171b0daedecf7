//! Error types for the classify crate.

use formdiff_types::{FieldIndex, RuleIndex, TypeError};

/// Errors that can occur during classification.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// An input document is unusable (not an object, or no `fields` list).
    #[error(transparent)]
    InvalidDocument(#[from] TypeError),

    /// A change path names a field position neither document has.
    #[error("field {0} not found in either document")]
    MissingField(FieldIndex),

    /// A change path names a rule position neither document has.
    #[error("rule {rule} of field {field} not found in either document")]
    MissingRule { field: FieldIndex, rule: RuleIndex },
}

impl ClassifyError {
    /// Returns `true` for errors caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::InvalidDocument(_))
    }
}

/// Convenience alias for classification results.
pub type ClassifyResult<T> = Result<T, ClassifyError>;

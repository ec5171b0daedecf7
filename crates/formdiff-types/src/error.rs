use thiserror::Error;

/// Errors produced when constructing foundation types.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    /// The document is not an object or lacks a usable `fields` container.
    #[error("invalid document: {0}")]
    InvalidDocument(String),
}

pub type TypeResult<T> = Result<T, TypeError>;

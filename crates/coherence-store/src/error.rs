//! Store error types.

use coherence_ir::{ErrorKind, JsonError};
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur in a result store.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum StoreError {
    /// No row with this id.
    #[error("Result {0} not found")]
    NotFound(i64),

    /// String is not a 64-character lowercase hex digest.
    #[error("Invalid content hash '{0}'")]
    InvalidHash(String),

    /// Circuit could not be canonicalized.
    #[error("Failed to encode circuit: {0}")]
    Encode(#[from] JsonError),

    /// A stored row could not be decoded.
    #[error("Stored result {id} is corrupt: {message}")]
    Corrupt { id: i64, message: String },

    /// The backing database failed.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound(_) => ErrorKind::NotFound,
            StoreError::InvalidHash(_) | StoreError::Encode(_) => ErrorKind::Validation,
            StoreError::Corrupt { .. } | StoreError::Unavailable(_) => {
                ErrorKind::StorageUnavailable
            }
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(e: rusqlite::Error) -> Self {
        StoreError::Unavailable(e.to_string())
    }
}

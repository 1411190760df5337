//! Error types for the record lifecycle service.

use thiserror::Error;
use vaxtrack_store::StoreError;

use crate::validate::ValidationError;

/// A result type using `RecordsError`.
pub type Result<T> = std::result::Result<T, RecordsError>;

/// Errors that can occur in record lifecycle operations.
#[derive(Debug, Error)]
pub enum RecordsError {
    /// Input failed validation; the store was never reached.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Storage layer error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}

impl RecordsError {
    /// Returns the appropriate HTTP status code for this error.
    #[must_use]
    pub const fn http_status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::Store(_) => 500,
        }
    }
}

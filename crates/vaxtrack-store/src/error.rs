//! Error types for the storage layer.

use thiserror::Error;

/// A result type using `StoreError`.
pub type Result<T> = std::result::Result<T, StoreError>;

/// The connection provider failed to open a connection.
///
/// Covers both unreachable-store and rejected-credential failures; the
/// underlying driver message is carried verbatim. There is no retry at this
/// layer, the error propagates to the caller of the current operation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("connection failed: {reason}")]
pub struct ConnectionError {
    /// The driver-reported failure.
    pub reason: String,
}

impl ConnectionError {
    /// Wrap a driver failure message.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No connection could be opened for the operation.
    #[error(transparent)]
    Connection(#[from] ConnectionError),

    /// A parameterized statement failed at the store.
    #[error("statement failed: {0}")]
    Execution(String),

    /// A result row lacked a column the mapping expects.
    ///
    /// This indicates a schema/contract mismatch; the operation fails as a
    /// whole rather than producing a partial record.
    #[error("row is missing expected column {column:?}")]
    MissingColumn {
        /// The column the mapping asked for.
        column: String,
    },

    /// A result cell was present but could not be decoded.
    #[error("column {column:?} holds undecodable value {value:?}")]
    InvalidCell {
        /// The column being decoded.
        column: &'static str,
        /// The raw cell contents.
        value: String,
    },
}

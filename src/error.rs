//! Error types for ratewalk
//!
//! `StorageError` covers the storage port; `SessionError` wraps it for
//! session-level operations.

use thiserror::Error;

/// Errors from a storage port operation
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("Record has no \"key\" field: {0}")]
    MissingKey(String),

    #[error("Storage backend error: {0}")]
    Backend(String),
}

/// Errors from session operations
///
/// "All items already rated" is not an error; `advance_to_unrated` reports
/// it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum SessionError {
    /// Construction rejected before any state was created or persisted
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A storage port call failed; in-memory walk state is not rolled back
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

/// Result alias for session operations
pub type SessionResult<T> = Result<T, SessionError>;

//! Error types for the store module.

use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// The backend could not serve the request.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// The query text is not a selector this store can evaluate.
    #[error("invalid selector: {0}")]
    InvalidSelector(String),

    /// A query cursor was used after being closed.
    #[error("query iterator already closed")]
    IteratorClosed,

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

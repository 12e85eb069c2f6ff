//! Error types for the SQLite executor.

use thiserror::Error;

/// Errors raised while executing a statement against SQLite.
#[derive(Debug, Error)]
pub enum SqliteError {
    /// The statement could not be compiled.
    #[error("statement error: {0}")]
    Statement(#[from] sqlweave_core::Error),

    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Result type alias for SQLite operations.
pub type Result<T> = std::result::Result<T, SqliteError>;

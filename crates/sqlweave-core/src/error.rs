//! Error types for statement compilation.

use thiserror::Error;

/// Errors raised while building or compiling a statement.
///
/// None of these are transient: they all indicate a usage error on the
/// caller's side and are never retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The statement has no column assignments.
    #[error("can't prepare UPDATE statement without fields to update")]
    EmptyAssignments,

    /// The construct is not supported by the target or dialect.
    #[error("{0}")]
    Unsupported(String),

    /// The input is malformed.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

impl Error {
    /// Creates an unsupported-construct error.
    pub fn unsupported(message: impl Into<String>) -> Self {
        Self::Unsupported(message.into())
    }

    /// Creates an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result type alias for statement operations.
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for sqlbind

use thiserror::Error;

/// Boxed error produced by a [`Connection`](crate::Connection) implementation.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result type alias for sqlbind operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for building and executing statements
#[derive(Debug, Error)]
pub enum Error {
    /// Error reported by the execution layer, passed through untouched
    #[error("Database error: {0}")]
    Database(#[source] BoxError),

    /// Builder was given arguments it cannot render (empty IN list, empty SET, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Row field could not be converted to the requested type
    #[error("Decode error on column '{column}': {message}")]
    Decode { column: String, message: String },

    /// A query hook refused to run the statement
    #[error("Query aborted: {0}")]
    Aborted(String),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wrap an execution-layer error
    pub fn database(err: impl Into<BoxError>) -> Self {
        Self::Database(err.into())
    }

    /// Create a decode error for a specific column
    pub fn decode(column: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Decode {
            column: column.into(),
            message: message.into(),
        }
    }

    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the execution layer
    pub fn is_database(&self) -> bool {
        matches!(self, Self::Database(_))
    }

    /// Check if a hook aborted the query
    pub fn is_aborted(&self) -> bool {
        matches!(self, Self::Aborted(_))
    }
}

//! Error types for filedrop.

use thiserror::Error;

/// Common error type for filedrop.
#[derive(Error, Debug)]
pub enum FiledropError {
    /// I/O error.
    ///
    /// Any failure of the underlying filesystem (permissions, disk full,
    /// unreadable directories) ends up here.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or incorrect shared secret.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Validation error for client input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// Upload exceeded the configured request size limit.
    #[error("payload too large: {0}")]
    TooLarge(String),

    /// A freshly generated batch identifier was already taken.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Result type alias for filedrop operations.
pub type Result<T> = std::result::Result<T, FiledropError>;

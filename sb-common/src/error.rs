//! Common error types for Study Buddy

use thiserror::Error;

/// Common result type for Study Buddy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types shared by the library and the server
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input (e.g. a row referencing an unknown user)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Uniqueness constraint violated (e.g. username already taken)
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Stored row could not be decoded (e.g. malformed timestamp)
    #[error("Invalid stored data: {0}")]
    InvalidData(String),
}

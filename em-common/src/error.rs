//! Common error types for EventMosaic

use thiserror::Error;

/// Common result type for EventMosaic operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the EventMosaic services
#[derive(Error, Debug)]
pub enum Error {
    /// Document store query error (wraps sqlx::Error)
    #[cfg(feature = "sqlx")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request parameter (names the field and its valid range)
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

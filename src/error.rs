//! Error types for the forum backend.

use thiserror::Error;

/// Common error type for storage and infrastructure failures.
///
/// Component-level errors (`AuthError`, `SubmitError`) wrap these into an
/// opaque `StorageFailure` before they reach a caller.
#[derive(Error, Debug)]
pub enum ForumError {
    /// Database error.
    ///
    /// Database errors from sqlx are automatically converted.
    #[error("database error: {0}")]
    Database(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Resource not found.
    #[error("{0} not found")]
    NotFound(String),

    /// A store operation did not finish before the request deadline.
    #[error("operation timed out: {0}")]
    Timeout(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<sqlx::Error> for ForumError {
    fn from(e: sqlx::Error) -> Self {
        ForumError::Database(e.to_string())
    }
}

/// Result type alias for forum operations.
pub type Result<T> = std::result::Result<T, ForumError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let err = ForumError::Validation("handle too long".to_string());
        assert_eq!(err.to_string(), "validation error: handle too long");
    }

    #[test]
    fn test_not_found_error_display() {
        let err = ForumError::NotFound("post".to_string());
        assert_eq!(err.to_string(), "post not found");
    }

    #[test]
    fn test_timeout_error_display() {
        let err = ForumError::Timeout("session lookup".to_string());
        assert_eq!(err.to_string(), "operation timed out: session lookup");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: ForumError = io_err.into();
        assert!(matches!(err, ForumError::Io(_)));
        assert!(err.to_string().contains("file not found"));
    }

    #[test]
    fn test_sqlx_error_conversion() {
        let err: ForumError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, ForumError::Database(_)));
    }
}

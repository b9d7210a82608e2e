//! Input validation for registration and login.

use thiserror::Error;

/// Minimum handle length.
pub const MIN_HANDLE_LENGTH: usize = 1;

/// Maximum handle length.
pub const MAX_HANDLE_LENGTH: usize = 32;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 1;

/// Maximum password length.
pub const MAX_PASSWORD_LENGTH: usize = 128;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Handle is empty.
    #[error("handle cannot be empty")]
    HandleEmpty,

    /// Handle is too long.
    #[error("handle must be at most {MAX_HANDLE_LENGTH} characters")]
    HandleTooLong,

    /// Handle contains invalid characters.
    #[error("handle can only contain letters, digits, '_', '-' and '.'")]
    HandleInvalidChars,

    /// Password is empty.
    #[error("password cannot be empty")]
    PasswordEmpty,

    /// Password is too long.
    #[error("password must be at most {MAX_PASSWORD_LENGTH} characters")]
    PasswordTooLong,
}

fn is_handle_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '-' || c == '.'
}

/// Validate a handle.
///
/// Requirements:
/// - Length: 1-32 characters
/// - Characters: letters, digits, `_`, `-` and `.`
///
/// # Examples
///
/// ```
/// use forum::auth::validation::validate_handle;
///
/// assert!(validate_handle("alice").is_ok());
/// assert!(validate_handle("").is_err());
/// assert!(validate_handle("bad handle").is_err());
/// ```
pub fn validate_handle(handle: &str) -> Result<(), ValidationError> {
    let len = handle.chars().count();
    if len < MIN_HANDLE_LENGTH {
        return Err(ValidationError::HandleEmpty);
    }
    if len > MAX_HANDLE_LENGTH {
        return Err(ValidationError::HandleTooLong);
    }
    if !handle.chars().all(is_handle_char) {
        return Err(ValidationError::HandleInvalidChars);
    }
    Ok(())
}

/// Validate a password.
///
/// Requirements:
/// - Length: 1-128 characters
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let len = password.chars().count();
    if len < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordEmpty);
    }
    if len > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooLong);
    }
    Ok(())
}

/// Validate all registration fields.
pub fn validate_registration(handle: &str, password: &str) -> Result<(), ValidationError> {
    validate_handle(handle)?;
    validate_password(password)?;
    Ok(())
}

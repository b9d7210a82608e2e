//! Authentication module for the forum backend.
//!
//! This module provides password hashing, input validation, the session
//! model, the [`AuthManager`] that orchestrates register/login/logout, and
//! the background [`SessionSweeper`].

mod manager;
mod password;
mod session;
mod sweeper;
pub mod validation;

pub use manager::AuthManager;
pub use password::{Argon2Hasher, CredentialHasher, PasswordError};
pub use session::{generate_token, Session, DEFAULT_SESSION_TTL_SECS, TOKEN_BYTES};
pub use sweeper::{SessionSweeper, SweeperHandle, DEFAULT_SWEEP_INTERVAL_SECS};
pub use validation::ValidationError;

use thiserror::Error;

/// Errors returned by [`AuthManager`] operations.
///
/// Credential and authentication failures carry no detail about which check
/// failed. Storage failures are logged where they occur and surface here
/// without the underlying cause.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Handle or password failed validation.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] ValidationError),

    /// The handle is already registered.
    #[error("handle is already taken")]
    DuplicateHandle,

    /// Unknown handle or wrong password.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Missing, unknown, or expired session token.
    #[error("unauthenticated")]
    Unauthenticated,

    /// A backing store failed or did not respond in time.
    #[error("storage failure")]
    StorageFailure,
}

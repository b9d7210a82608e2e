//! Registration, login, authentication and logout.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::OnceCell;
use tokio::time::Instant;
use tracing::{debug, error, info};

use super::password::{CredentialHasher, PasswordError};
use super::session::{generate_token, Session, DEFAULT_SESSION_TTL_SECS};
use super::validation::validate_registration;
use super::AuthError;
use crate::datetime;
use crate::db::{with_deadline, CredentialStore, Identity, NewIdentity, SessionStore};
use crate::ForumError;

/// Default deadline for a single auth operation.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Log a store failure and replace it with the opaque auth error.
fn storage_failure(operation: &'static str, err: ForumError) -> AuthError {
    error!(operation, error = %err, "Auth store operation failed");
    AuthError::StorageFailure
}

/// Orchestrates identity registration and the session lifecycle.
///
/// Holds no session state of its own; every call goes through the stores.
pub struct AuthManager {
    credentials: Arc<dyn CredentialStore>,
    sessions: Arc<dyn SessionStore>,
    hasher: Arc<dyn CredentialHasher>,
    session_ttl: Duration,
    request_timeout: Duration,
    /// Hash verified against when a login handle is unknown.
    dummy_hash: OnceCell<String>,
}

impl AuthManager {
    /// Create a new AuthManager with default TTL and timeout.
    ///
    /// The throwaway hash for unknown-handle logins is computed here, so the
    /// first such login does the same work as a wrong password. If hashing
    /// fails now it is retried on first use.
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        sessions: Arc<dyn SessionStore>,
        hasher: Arc<dyn CredentialHasher>,
    ) -> Self {
        let dummy_hash = OnceCell::new_with(hasher.hash(&generate_token()).ok());
        Self {
            credentials,
            sessions,
            hasher,
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            dummy_hash,
        }
    }

    /// Set the fixed session lifetime.
    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    /// Set the deadline applied to each operation.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    fn deadline(&self) -> Instant {
        Instant::now() + self.request_timeout
    }

    /// Run a hasher call on the blocking pool under the deadline.
    async fn run_hasher<T, F>(
        &self,
        deadline: Instant,
        operation: &'static str,
        f: F,
    ) -> Result<T, AuthError>
    where
        T: Send + 'static,
        F: FnOnce(&dyn CredentialHasher) -> Result<T, PasswordError> + Send + 'static,
    {
        let hasher = Arc::clone(&self.hasher);
        let task = tokio::task::spawn_blocking(move || f(hasher.as_ref()));

        match tokio::time::timeout_at(deadline, task).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(e))) => {
                error!(operation, error = %e, "Password hasher failed");
                Err(AuthError::StorageFailure)
            }
            Ok(Err(e)) => {
                error!(operation, error = %e, "Password hasher task failed");
                Err(AuthError::StorageFailure)
            }
            Err(_) => {
                error!(operation, "Password hasher timed out");
                Err(AuthError::StorageFailure)
            }
        }
    }

    /// Burn the same verification work as a real login against a throwaway hash.
    async fn verify_dummy(&self, deadline: Instant, password: &str) -> Result<(), AuthError> {
        let dummy = self
            .dummy_hash
            .get_or_try_init(|| self.run_hasher(deadline, "dummy hash", |h| h.hash(&generate_token())))
            .await?
            .clone();
        let password = password.to_string();
        self.run_hasher(deadline, "verify password", move |h| h.verify(&password, &dummy))
            .await?;
        Ok(())
    }

    /// Register a new identity.
    ///
    /// The handle check and insert are a single store operation, so of two
    /// concurrent registrations of the same handle exactly one succeeds.
    pub async fn register(&self, handle: &str, password: &str) -> Result<Identity, AuthError> {
        validate_registration(handle, password)?;
        let deadline = self.deadline();

        let raw = password.to_string();
        let password_hash = self
            .run_hasher(deadline, "hash password", move |h| h.hash(&raw))
            .await?;

        let new_identity = NewIdentity::new(handle, password_hash);
        let inserted = with_deadline(
            deadline,
            "insert identity",
            self.credentials.insert_if_absent(&new_identity),
        )
        .await
        .map_err(|e| storage_failure("insert identity", e))?;

        match inserted {
            Some(identity) => {
                info!(handle = %identity.handle, identity_id = identity.id, "New identity registered");
                Ok(identity)
            }
            None => {
                debug!(handle = %handle, "Registration rejected: handle taken");
                Err(AuthError::DuplicateHandle)
            }
        }
    }

    /// Log in and issue a new session.
    ///
    /// Unknown handles and wrong passwords produce the same error after the
    /// same amount of hashing work.
    pub async fn login(&self, handle: &str, password: &str) -> Result<Session, AuthError> {
        let deadline = self.deadline();

        let identity = with_deadline(
            deadline,
            "lookup identity",
            self.credentials.get_by_handle(handle),
        )
        .await
        .map_err(|e| storage_failure("lookup identity", e))?;

        let Some(identity) = identity else {
            self.verify_dummy(deadline, password).await?;
            debug!("Login failed");
            return Err(AuthError::InvalidCredentials);
        };

        let raw = password.to_string();
        let stored = identity.password_hash.clone();
        let matches = self
            .run_hasher(deadline, "verify password", move |h| h.verify(&raw, &stored))
            .await?;
        if !matches {
            debug!("Login failed");
            return Err(AuthError::InvalidCredentials);
        }

        let session = Session::issue(identity.id, self.session_ttl);
        with_deadline(deadline, "insert session", self.sessions.insert(&session))
            .await
            .map_err(|e| storage_failure("insert session", e))?;

        info!(handle = %identity.handle, identity_id = identity.id, "Login successful");
        Ok(session)
    }

    /// Resolve a session token to its identity.
    ///
    /// Expiry is checked here against the current time, so a session past
    /// its expiry is rejected whether or not the sweeper has removed it yet.
    /// Expiry is never extended.
    pub async fn authenticate(&self, token: &str) -> Result<Identity, AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        let deadline = self.deadline();

        let session = with_deadline(deadline, "lookup session", self.sessions.get(token))
            .await
            .map_err(|e| storage_failure("lookup session", e))?
            .ok_or(AuthError::Unauthenticated)?;

        if session.is_expired_at(datetime::now()) {
            debug!(identity_id = session.identity_id, "Rejected expired session");
            return Err(AuthError::Unauthenticated);
        }

        with_deadline(
            deadline,
            "lookup identity",
            self.credentials.get_by_id(session.identity_id),
        )
        .await
        .map_err(|e| storage_failure("lookup identity", e))?
        .ok_or(AuthError::Unauthenticated)
    }

    /// End a session.
    ///
    /// Fails with `Unauthenticated` if the token is absent, already logged
    /// out, or expired. An expired session is still removed.
    pub async fn logout(&self, token: &str) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::Unauthenticated);
        }
        let deadline = self.deadline();

        let session = with_deadline(deadline, "lookup session", self.sessions.get(token))
            .await
            .map_err(|e| storage_failure("lookup session", e))?
            .ok_or(AuthError::Unauthenticated)?;

        let deleted = with_deadline(deadline, "delete session", self.sessions.delete(token))
            .await
            .map_err(|e| storage_failure("delete session", e))?;

        // A concurrent logout may have won the delete.
        if !deleted || session.is_expired_at(datetime::now()) {
            return Err(AuthError::Unauthenticated);
        }

        info!(identity_id = session.identity_id, "Logged out");
        Ok(())
    }
}

impl std::fmt::Debug for AuthManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthManager")
            .field("session_ttl", &self.session_ttl)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

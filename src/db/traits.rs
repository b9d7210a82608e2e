//! Store traits consumed by the authentication and posting core.
//!
//! Each store is a shared resource accessed concurrently by request workers
//! (and, for sessions, by the sweeper). Implementations must be safe for
//! concurrent use; the only cross-operation atomicity the core relies on is
//! [`CredentialStore::insert_if_absent`].
//!
//! The traits are object safe so backends can be swapped behind
//! `Arc<dyn …>`:
//!
//! ```ignore
//! let credentials: Arc<dyn CredentialStore> = Arc::new(IdentityRepository::new(db.pool().clone()));
//! let sessions: Arc<dyn SessionStore> = Arc::new(SessionRepository::new(db.pool().clone()));
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::attachment::Attachment;
use crate::auth::Session;
use crate::db::{Identity, NewIdentity};
use crate::post::{NewPost, Post};
use crate::Result;

/// Persistence for registered identities.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Insert a new identity unless the handle is already taken.
    ///
    /// The uniqueness check and the insert happen as one store-level step.
    /// Returns `None` when the handle already exists.
    async fn insert_if_absent(&self, new_identity: &NewIdentity) -> Result<Option<Identity>>;

    /// Get an identity by handle.
    async fn get_by_handle(&self, handle: &str) -> Result<Option<Identity>>;

    /// Get an identity by ID.
    async fn get_by_id(&self, id: i64) -> Result<Option<Identity>>;
}

/// Persistence for active sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Persist a newly issued session.
    async fn insert(&self, session: &Session) -> Result<()>;

    /// Look up a session by token, expired or not.
    async fn get(&self, token: &str) -> Result<Option<Session>>;

    /// Delete a session by token.
    ///
    /// Returns true if a session was deleted.
    async fn delete(&self, token: &str) -> Result<bool>;

    /// Delete every session whose expiry is at or before `now`.
    ///
    /// Returns the number of sessions removed.
    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64>;

    /// Count stored sessions, including expired ones not yet swept.
    async fn count(&self) -> Result<i64>;
}

/// Durable storage for uploaded binary content.
#[async_trait]
pub trait AttachmentStore: Send + Sync {
    /// Write content under a newly generated reference.
    ///
    /// The content is durable once this returns.
    async fn put(&self, content: &[u8], original_name: Option<&str>) -> Result<Attachment>;

    /// Read back content by reference.
    ///
    /// Returns `None` for unknown or malformed references.
    async fn get(&self, reference: &str) -> Result<Option<Vec<u8>>>;
}

/// Persistence for post records.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Insert a post and its category tags as one transaction.
    async fn insert(&self, new_post: &NewPost) -> Result<Post>;

    /// Get a post by ID.
    async fn get_by_id(&self, id: i64) -> Result<Option<Post>>;

    /// List posts newest first.
    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<Post>>;

    /// List posts carrying the given category tag, newest first.
    async fn list_by_tag(&self, tag: &str, limit: i64, offset: i64) -> Result<Vec<Post>>;

    /// Count all posts.
    async fn count(&self) -> Result<i64>;
}

//! Response DTOs.

use serde::Serialize;

use crate::auth::Session;
use crate::datetime::to_rfc3339;
use crate::db::Identity;
use crate::post::Post;

/// Generic API response wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a new API response.
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Public view of an identity. Never includes the password hash.
#[derive(Debug, Serialize)]
pub struct IdentityResponse {
    /// Identity ID.
    pub id: i64,
    /// Handle.
    pub handle: String,
    /// Registration time (RFC 3339).
    pub created_at: String,
}

impl From<&Identity> for IdentityResponse {
    fn from(identity: &Identity) -> Self {
        Self {
            id: identity.id,
            handle: identity.handle.clone(),
            created_at: to_rfc3339(&identity.created_at),
        }
    }
}

/// Issued session.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    /// Session token.
    pub token: String,
    /// Expiry time (RFC 3339).
    pub expires_at: String,
}

impl From<&Session> for SessionResponse {
    fn from(session: &Session) -> Self {
        Self {
            token: session.token.clone(),
            expires_at: to_rfc3339(&session.expires_at),
        }
    }
}

/// Post view.
#[derive(Debug, Serialize)]
pub struct PostResponse {
    /// Post ID.
    pub id: i64,
    /// Title.
    pub title: String,
    /// Body.
    pub body: String,
    /// Category tags.
    pub tags: Vec<String>,
    /// Author identity ID.
    pub author_id: i64,
    /// Author handle.
    pub author_handle: String,
    /// Attachment URL, empty if none.
    pub image_url: String,
    /// Attachment size in bytes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment_size: Option<u64>,
    /// Creation time (RFC 3339).
    pub created_at: String,
}

impl From<&Post> for PostResponse {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id,
            title: post.title.clone(),
            body: post.body.clone(),
            tags: post.tags.clone(),
            author_id: post.author_id,
            author_handle: post.author_handle.clone(),
            image_url: post.image_url(),
            attachment_size: post.attachment.as_ref().map(|a| a.size),
            created_at: to_rfc3339(&post.created_at),
        }
    }
}

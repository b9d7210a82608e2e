//! API handlers for the forum web layer.

pub mod auth;
pub mod post;
pub mod upload;

pub use auth::*;
pub use post::*;
pub use upload::*;

use std::sync::Arc;

use crate::auth::AuthManager;
use crate::db::{AttachmentStore, PostStore};
use crate::post::PostSubmissionPipeline;

/// Extra request body allowance on top of the attachment limit, for the
/// text fields and multipart framing.
pub const BODY_OVERHEAD_BYTES: usize = 1024 * 1024;

/// Shared application state.
pub struct AppState {
    /// Registration, login, and session resolution.
    pub auth: Arc<AuthManager>,
    /// Post submission.
    pub pipeline: Arc<PostSubmissionPipeline>,
    /// Read access to posts for the feed.
    pub posts: Arc<dyn PostStore>,
    /// Read access to attachments for serving uploads.
    pub attachments: Arc<dyn AttachmentStore>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        auth: Arc<AuthManager>,
        pipeline: Arc<PostSubmissionPipeline>,
        posts: Arc<dyn PostStore>,
        attachments: Arc<dyn AttachmentStore>,
    ) -> Self {
        Self {
            auth,
            pipeline,
            posts,
            attachments,
        }
    }

    /// Largest request body accepted.
    ///
    /// Slightly above the attachment limit so oversized attachments reach
    /// validation and get a field-level error.
    pub fn max_body_bytes(&self) -> usize {
        let max_attachment = self.pipeline.limits().max_attachment_bytes;
        usize::try_from(max_attachment)
            .unwrap_or(usize::MAX)
            .saturating_add(BODY_OVERHEAD_BYTES)
    }
}

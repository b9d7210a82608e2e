//! Post submission pipeline.
//!
//! A submission runs strictly in order: validate, persist the attachment (if
//! any), persist the post record. Validation failures leave no trace. An
//! attachment that was written before the post record failed is left in
//! place and logged with its reference so it can be reclaimed.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, error, info, warn};

use super::types::{NewPost, Post};
use super::validation::{
    normalize_tags, validate_attachment_size, validate_body, validate_title, SubmissionLimits,
};
use super::SubmitError;
use crate::db::{with_deadline, AttachmentStore, Identity, PostStore};

/// Default deadline for a single submission.
pub const DEFAULT_SUBMIT_TIMEOUT_SECS: u64 = 10;

/// Uploaded attachment content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttachmentUpload {
    /// Original file name, used only for its extension.
    pub file_name: Option<String>,
    /// Raw bytes.
    pub content: Vec<u8>,
}

/// A post submission as received from the request layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Category tags.
    pub tags: Vec<String>,
    /// Explicitly supplied attachment, possibly zero bytes.
    pub attachment: Option<AttachmentUpload>,
}

impl Submission {
    /// Create a submission without attachment.
    pub fn new(title: impl Into<String>, body: impl Into<String>, tags: Vec<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags,
            attachment: None,
        }
    }

    /// Attach content.
    pub fn with_attachment(mut self, file_name: Option<String>, content: Vec<u8>) -> Self {
        self.attachment = Some(AttachmentUpload { file_name, content });
        self
    }
}

/// Orchestrates validation, attachment persistence, and post creation.
pub struct PostSubmissionPipeline {
    attachments: Arc<dyn AttachmentStore>,
    posts: Arc<dyn PostStore>,
    limits: SubmissionLimits,
    request_timeout: Duration,
}

impl PostSubmissionPipeline {
    /// Create a new pipeline with default limits.
    pub fn new(attachments: Arc<dyn AttachmentStore>, posts: Arc<dyn PostStore>) -> Self {
        Self {
            attachments,
            posts,
            limits: SubmissionLimits::default(),
            request_timeout: Duration::from_secs(DEFAULT_SUBMIT_TIMEOUT_SECS),
        }
    }

    /// Set the submission limits.
    pub fn with_limits(mut self, limits: SubmissionLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Set the deadline applied to each submission.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Get the submission limits.
    pub fn limits(&self) -> &SubmissionLimits {
        &self.limits
    }

    /// Submit a post on behalf of an authenticated identity.
    pub async fn submit(&self, author: &Identity, submission: Submission) -> Result<Post, SubmitError> {
        let Submission {
            title,
            body,
            tags,
            attachment,
        } = submission;

        let validated = validate_title(&title).and_then(|title| {
            let body = validate_body(&body)?;
            let tags = normalize_tags(&tags)?;
            if let Some(upload) = &attachment {
                validate_attachment_size(upload.content.len() as u64, &self.limits)?;
            }
            Ok((title, body, tags))
        });
        let (title, body, tags) = match validated {
            Ok(fields) => fields,
            Err(e) => {
                debug!(author_id = author.id, error = %e, "Submission rejected");
                return Err(e.into());
            }
        };

        let deadline = Instant::now() + self.request_timeout;

        let stored_attachment = match &attachment {
            Some(upload) => {
                let stored = with_deadline(
                    deadline,
                    "store attachment",
                    self.attachments
                        .put(&upload.content, upload.file_name.as_deref()),
                )
                .await
                .map_err(|e| {
                    error!(author_id = author.id, error = %e, "Failed to store attachment");
                    SubmitError::StorageFailure
                })?;
                Some(stored)
            }
            None => None,
        };

        let mut new_post = NewPost::new(author.id, title, body, tags);
        if let Some(stored) = &stored_attachment {
            new_post = new_post.with_attachment(stored.clone());
        }

        let post = match with_deadline(deadline, "insert post", self.posts.insert(&new_post)).await {
            Ok(post) => post,
            Err(e) => {
                error!(author_id = author.id, error = %e, "Failed to store post");
                if let Some(orphan) = &stored_attachment {
                    warn!(
                        reference = %orphan.reference,
                        size = orphan.size,
                        "Attachment orphaned by failed post insert"
                    );
                }
                return Err(SubmitError::StorageFailure);
            }
        };

        info!(
            post_id = post.id,
            author = %post.author_handle,
            attachment = post.attachment.as_ref().map(|a| a.reference.as_str()).unwrap_or(""),
            "Post created"
        );
        Ok(post)
    }
}

impl std::fmt::Debug for PostSubmissionPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PostSubmissionPipeline")
            .field("limits", &self.limits)
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

//! Validation for post submissions.

use thiserror::Error;

/// Maximum title length.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Maximum body length.
pub const MAX_BODY_LENGTH: usize = 10_000;

/// Maximum number of category tags per post.
pub const MAX_TAGS: usize = 10;

/// Maximum tag length.
pub const MAX_TAG_LENGTH: usize = 32;

/// Default maximum attachment size (20 MiB).
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 20 * 1024 * 1024;

/// Post validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PostValidationError {
    /// Title is empty.
    #[error("title cannot be empty")]
    TitleEmpty,

    /// Title is too long.
    #[error("title must be at most {MAX_TITLE_LENGTH} characters")]
    TitleTooLong,

    /// Body is empty.
    #[error("body cannot be empty")]
    BodyEmpty,

    /// Body is too long.
    #[error("body must be at most {MAX_BODY_LENGTH} characters")]
    BodyTooLong,

    /// No category tag was given.
    #[error("at least one category tag is required")]
    NoTags,

    /// Too many category tags.
    #[error("at most {MAX_TAGS} category tags are allowed")]
    TooManyTags,

    /// A category tag is too long.
    #[error("category tags must be at most {MAX_TAG_LENGTH} characters")]
    TagTooLong,

    /// Attachment exceeds the configured maximum.
    #[error("attachment is {size} bytes, maximum is {max} bytes")]
    AttachmentTooLarge {
        /// Submitted size.
        size: u64,
        /// Configured maximum.
        max: u64,
    },

    /// Attachment is empty and empty attachments are rejected.
    #[error("attachment cannot be empty")]
    AttachmentEmpty,
}

/// Limits applied to submissions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionLimits {
    /// Maximum attachment size in bytes.
    pub max_attachment_bytes: u64,
    /// Whether an explicitly supplied zero-byte attachment is accepted.
    pub allow_empty_attachments: bool,
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            allow_empty_attachments: true,
        }
    }
}

/// Validate and trim a title.
pub fn validate_title(title: &str) -> Result<String, PostValidationError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(PostValidationError::TitleEmpty);
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(PostValidationError::TitleTooLong);
    }
    Ok(title.to_string())
}

/// Validate and trim a body. Whitespace-only bodies count as empty.
pub fn validate_body(body: &str) -> Result<String, PostValidationError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(PostValidationError::BodyEmpty);
    }
    if body.chars().count() > MAX_BODY_LENGTH {
        return Err(PostValidationError::BodyTooLong);
    }
    Ok(body.to_string())
}

/// Trim, drop blanks, and de-duplicate tags, keeping first-seen order.
pub fn normalize_tags<S: AsRef<str>>(tags: &[S]) -> Result<Vec<String>, PostValidationError> {
    let mut normalized: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || normalized.iter().any(|t| t == tag) {
            continue;
        }
        if tag.chars().count() > MAX_TAG_LENGTH {
            return Err(PostValidationError::TagTooLong);
        }
        normalized.push(tag.to_string());
    }

    if normalized.is_empty() {
        return Err(PostValidationError::NoTags);
    }
    if normalized.len() > MAX_TAGS {
        return Err(PostValidationError::TooManyTags);
    }
    Ok(normalized)
}

/// Validate an attachment size against the limits.
pub fn validate_attachment_size(
    size: u64,
    limits: &SubmissionLimits,
) -> Result<(), PostValidationError> {
    if size > limits.max_attachment_bytes {
        return Err(PostValidationError::AttachmentTooLarge {
            size,
            max: limits.max_attachment_bytes,
        });
    }
    if size == 0 && !limits.allow_empty_attachments {
        return Err(PostValidationError::AttachmentEmpty);
    }
    Ok(())
}

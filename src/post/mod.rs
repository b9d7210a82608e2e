//! Posts for the forum backend.
//!
//! This module provides the post model, submission validation, the SQLite
//! post store, and the [`PostSubmissionPipeline`] that turns an
//! authenticated submission into a persisted post.

mod pipeline;
mod repository;
mod types;
pub mod validation;

pub use pipeline::{AttachmentUpload, PostSubmissionPipeline, Submission};
pub use repository::PostRepository;
pub use types::{NewPost, Post};
pub use validation::{PostValidationError, SubmissionLimits};

use thiserror::Error;

/// Errors returned by [`PostSubmissionPipeline::submit`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// The submission was rejected before anything was written.
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] PostValidationError),

    /// The attachment or post record could not be stored.
    #[error("storage failure")]
    StorageFailure,
}

//! Forum backend
//!
//! Session-based authentication and post submission for a discussion forum,
//! with SQLite persistence, filesystem attachment storage, and a JSON web API.

pub mod attachment;
pub mod auth;
pub mod config;
pub mod datetime;
pub mod db;
pub mod error;
pub mod logging;
pub mod post;
pub mod web;

pub use attachment::{Attachment, FileAttachmentStore};
pub use auth::{
    Argon2Hasher, AuthError, AuthManager, CredentialHasher, PasswordError, Session,
    SessionSweeper, SweeperHandle, ValidationError,
};
pub use config::Config;
pub use db::{
    AttachmentStore, CredentialStore, Database, Identity, IdentityRepository, NewIdentity,
    PostStore, SessionRepository, SessionStore,
};
pub use error::{ForumError, Result};
pub use post::{
    NewPost, Post, PostRepository, PostSubmissionPipeline, PostValidationError, Submission,
    SubmissionLimits, SubmitError,
};

//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;

use forum::post::SubmissionLimits;
use forum::web::AppState;
use forum::{
    Argon2Hasher, AuthManager, Database, FileAttachmentStore, IdentityRepository, PostRepository,
    PostSubmissionPipeline, SessionRepository,
};

/// Default session TTL used by tests (24 hours).
pub const TEST_SESSION_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// A fully wired core over an in-memory database and a temporary upload dir.
pub struct TestForum {
    pub db: Database,
    pub temp_dir: TempDir,
    pub credentials: Arc<IdentityRepository>,
    pub sessions: Arc<SessionRepository>,
    pub posts: Arc<PostRepository>,
    pub attachments: Arc<FileAttachmentStore>,
    pub auth: Arc<AuthManager>,
    pub pipeline: Arc<PostSubmissionPipeline>,
}

impl TestForum {
    /// Build a forum with default limits.
    pub async fn new() -> Self {
        Self::with_options(TEST_SESSION_TTL, SubmissionLimits::default()).await
    }

    /// Build a forum with a custom session TTL and submission limits.
    pub async fn with_options(session_ttl: Duration, limits: SubmissionLimits) -> Self {
        let db = Database::open_in_memory().await.unwrap();
        let temp_dir = TempDir::new().unwrap();

        let credentials = Arc::new(IdentityRepository::new(db.pool().clone()));
        let sessions = Arc::new(SessionRepository::new(db.pool().clone()));
        let posts = Arc::new(PostRepository::new(db.pool().clone()));
        let attachments =
            Arc::new(FileAttachmentStore::new(temp_dir.path().join("uploads")).unwrap());

        // Minimal Argon2 cost keeps tests fast.
        let auth = AuthManager::new(
            credentials.clone(),
            sessions.clone(),
            Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap()),
        )
        .with_session_ttl(session_ttl);

        let pipeline =
            PostSubmissionPipeline::new(attachments.clone(), posts.clone()).with_limits(limits);

        Self {
            db,
            temp_dir,
            credentials,
            sessions,
            posts,
            attachments,
            auth: Arc::new(auth),
            pipeline: Arc::new(pipeline),
        }
    }

    /// Application state for the web layer.
    pub fn app_state(&self) -> Arc<AppState> {
        Arc::new(AppState::new(
            self.auth.clone(),
            self.pipeline.clone(),
            self.posts.clone(),
            self.attachments.clone(),
        ))
    }

    /// Count files under the upload directory.
    pub fn stored_files(&self) -> usize {
        let Ok(shards) = std::fs::read_dir(self.attachments.base_path()) else {
            return 0;
        };
        shards
            .flatten()
            .filter_map(|shard| std::fs::read_dir(shard.path()).ok())
            .map(|files| files.count())
            .sum()
    }
}

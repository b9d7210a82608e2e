//! Web server for the forum backend.

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::{ForumError, Result};

use super::handlers::AppState;
use super::router::create_router;

/// Web server for the API.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    app_state: Arc<AppState>,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, app_state: Arc<AppState>) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|e| ForumError::Config(format!("invalid server address: {e}")))?;

        Ok(Self { addr, app_state })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Run the web server until `shutdown` resolves.
    ///
    /// In-flight requests are allowed to finish before this returns.
    pub async fn run<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let router = create_router(self.app_state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("Web server stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachment::FileAttachmentStore;
    use crate::auth::{Argon2Hasher, AuthManager};
    use crate::db::{IdentityRepository, SessionRepository};
    use crate::post::{PostRepository, PostSubmissionPipeline};
    use crate::Database;
    use tempfile::TempDir;

    async fn create_state(temp_dir: &TempDir) -> Arc<AppState> {
        let db = Database::open_in_memory().await.unwrap();
        let attachments = Arc::new(FileAttachmentStore::new(temp_dir.path()).unwrap());
        let posts = Arc::new(PostRepository::new(db.pool().clone()));
        let auth = AuthManager::new(
            Arc::new(IdentityRepository::new(db.pool().clone())),
            Arc::new(SessionRepository::new(db.pool().clone())),
            Arc::new(Argon2Hasher::with_params(8, 1, 1).unwrap()),
        );
        let pipeline = PostSubmissionPipeline::new(attachments.clone(), posts.clone());
        Arc::new(AppState::new(
            Arc::new(auth),
            Arc::new(pipeline),
            posts,
            attachments,
        ))
    }

    #[tokio::test]
    async fn test_web_server_new() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };

        let server = WebServer::new(&config, create_state(&temp_dir).await).unwrap();
        assert_eq!(server.addr().ip().to_string(), "127.0.0.1");
    }

    #[tokio::test]
    async fn test_web_server_rejects_bad_address() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            host: "not an address".to_string(),
            port: 8080,
        };

        let result = WebServer::new(&config, create_state(&temp_dir).await);
        assert!(matches!(result, Err(ForumError::Config(_))));
    }

    #[tokio::test]
    async fn test_web_server_graceful_shutdown() {
        let temp_dir = TempDir::new().unwrap();
        let config = ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        };
        let server = WebServer::new(&config, create_state(&temp_dir).await).unwrap();

        let (tx, rx) = tokio::sync::oneshot::channel::<()>();
        let task = tokio::spawn(server.run(async {
            let _ = rx.await;
        }));

        tx.send(()).unwrap();
        let result = tokio::time::timeout(std::time::Duration::from_secs(5), task)
            .await
            .unwrap()
            .unwrap();
        assert!(result.is_ok());
    }
}

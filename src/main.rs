use std::sync::Arc;

use tracing::{error, info};

use forum::post::SubmissionLimits;
use forum::web::{AppState, WebServer};
use forum::{
    Argon2Hasher, AuthManager, Config, Database, FileAttachmentStore, IdentityRepository,
    PostRepository, PostSubmissionPipeline, SessionRepository, SessionSweeper,
};

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn run(config: Config) -> forum::Result<()> {
    let db = Database::open(&config.database.path).await?;

    let credentials = Arc::new(IdentityRepository::new(db.pool().clone()));
    let sessions = Arc::new(SessionRepository::new(db.pool().clone()));
    let posts = Arc::new(PostRepository::new(db.pool().clone()));
    let attachments = Arc::new(FileAttachmentStore::new(&config.uploads.storage_path)?);

    let auth = AuthManager::new(credentials, sessions.clone(), Arc::new(Argon2Hasher::new()))
        .with_session_ttl(config.session.ttl())
        .with_request_timeout(config.session.request_timeout());

    let pipeline = PostSubmissionPipeline::new(attachments.clone(), posts.clone())
        .with_limits(SubmissionLimits {
            max_attachment_bytes: config.uploads.max_upload_bytes(),
            allow_empty_attachments: config.uploads.allow_empty,
        })
        .with_request_timeout(config.session.request_timeout());

    let sweeper = SessionSweeper::new(sessions, config.session.sweep_interval()).spawn();

    let app_state = Arc::new(AppState::new(
        Arc::new(auth),
        Arc::new(pipeline),
        posts,
        attachments,
    ));
    let server = WebServer::new(&config.server, app_state)?;
    let served = server.run(shutdown_signal()).await;

    sweeper.shutdown().await;
    db.close().await;
    served
}

#[tokio::main]
async fn main() {
    // Load configuration
    let config = match Config::load_with_env("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            let mut config = Config::default();
            config.apply_env_overrides();
            config
        }
    };

    // Initialize logging
    if let Err(e) = forum::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        // Fall back to console-only logging
        forum::logging::init_console_only(&config.logging.level);
    }

    if let Err(e) = config.validate() {
        error!(error = %e, "Invalid configuration");
        std::process::exit(1);
    }

    info!("Forum backend starting");
    info!(
        "Server configured on {}:{}",
        config.server.host, config.server.port
    );

    if let Err(e) = run(config).await {
        error!(error = %e, "Forum backend exited with error");
        std::process::exit(1);
    }
}

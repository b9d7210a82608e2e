//! Router configuration for the web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{
    create_post, get_post, list_posts, login, logout, me, register, serve_upload, AppState,
};

/// Create the main API router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    let body_limit = app_state.max_body_bytes();

    let auth_routes = Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .route("/me", get(me));

    let post_routes = Router::new()
        .route("/", get(list_posts).post(create_post))
        .route("/:id", get(get_post));

    let api_routes = Router::new()
        .nest("/auth", auth_routes)
        .nest("/posts", post_routes);

    Router::new()
        .nest("/api", api_routes)
        .route("/uploads/:reference", get(serve_upload))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(DefaultBodyLimit::max(body_limit)),
        )
        .with_state(app_state)
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

//! Web API module for the forum backend.
//!
//! A JSON API over the authentication and posting core. Session tokens
//! travel as a Bearer header or the `session_token` cookie; posts are
//! submitted as multipart forms.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::create_router;
pub use server::WebServer;

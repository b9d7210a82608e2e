//! Request extractors for the web API.

mod auth;

pub use auth::{AuthIdentity, SessionToken, SESSION_COOKIE};

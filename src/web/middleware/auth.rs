//! Session authentication extractors.
//!
//! The session token is read from an `Authorization: Bearer` header, falling
//! back to the session cookie. It is resolved to an identity once, here, and
//! handed to handlers as an explicit value.

use std::sync::Arc;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::CookieJar;

use crate::db::Identity;
use crate::web::error::ApiError;
use crate::web::handlers::AppState;

/// Name of the session cookie.
pub const SESSION_COOKIE: &str = "session_token";

/// Raw session token carried by a request.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

impl SessionToken {
    fn from_parts(parts: &Parts) -> Option<Self> {
        let bearer = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty());
        if let Some(token) = bearer {
            return Some(Self(token.to_string()));
        }

        CookieJar::from_headers(&parts.headers)
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
            .map(Self)
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionToken
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts).ok_or_else(|| ApiError::unauthorized("Authentication required"))
    }
}

/// Extractor for the authenticated identity.
///
/// Rejects with 401 when the token is missing, unknown, or expired.
#[derive(Debug, Clone)]
pub struct AuthIdentity(pub Identity);

#[async_trait]
impl FromRequestParts<Arc<AppState>> for AuthIdentity {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let SessionToken(token) = SessionToken::from_request_parts(parts, state).await?;
        let identity = state.auth.authenticate(&token).await?;
        Ok(AuthIdentity(identity))
    }
}

//! Authentication handlers.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, Json};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use super::AppState;
use crate::web::dto::{ApiResponse, IdentityResponse, LoginRequest, RegisterRequest, SessionResponse};
use crate::web::error::ApiError;
use crate::web::middleware::{AuthIdentity, SessionToken, SESSION_COOKIE};

fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}

/// POST /api/auth/register - Register a new identity.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<IdentityResponse>>), ApiError> {
    let identity = state.auth.register(&req.handle, &req.password).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(IdentityResponse::from(&identity))),
    ))
}

/// POST /api/auth/login - Log in and receive a session token.
///
/// The token is returned in the body and also set as an HTTP-only cookie.
pub async fn login(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    Json(req): Json<LoginRequest>,
) -> Result<(CookieJar, Json<ApiResponse<SessionResponse>>), ApiError> {
    let session = state.auth.login(&req.handle, &req.password).await?;
    let response = SessionResponse::from(&session);
    Ok((
        jar.add(session_cookie(session.token)),
        Json(ApiResponse::new(response)),
    ))
}

/// POST /api/auth/logout - End the current session.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    SessionToken(token): SessionToken,
) -> Result<(CookieJar, StatusCode), ApiError> {
    state.auth.logout(&token).await?;
    Ok((
        jar.remove(Cookie::build(SESSION_COOKIE).path("/")),
        StatusCode::NO_CONTENT,
    ))
}

/// GET /api/auth/me - Get the authenticated identity.
pub async fn me(
    AuthIdentity(identity): AuthIdentity,
) -> Json<ApiResponse<IdentityResponse>> {
    Json(ApiResponse::new(IdentityResponse::from(&identity)))
}

//! Attachment serving.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::{Path, State},
    http::header,
    response::Response,
};

use super::AppState;
use crate::attachment::is_valid_reference;
use crate::web::error::ApiError;

/// GET /uploads/:reference - Serve a stored attachment.
pub async fn serve_upload(
    State(state): State<Arc<AppState>>,
    Path(reference): Path<String>,
) -> Result<Response, ApiError> {
    if !is_valid_reference(&reference) {
        return Err(ApiError::not_found("Attachment not found"));
    }

    let content = state
        .attachments
        .get(&reference)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, reference = %reference, "Failed to read attachment");
            ApiError::internal("Failed to read attachment")
        })?
        .ok_or_else(|| ApiError::not_found("Attachment not found"))?;

    let content_type = mime_guess::from_path(&reference)
        .first_or_octet_stream()
        .to_string();

    Response::builder()
        .header(header::CONTENT_TYPE, content_type)
        .header(header::CONTENT_LENGTH, content.len())
        .header(header::X_CONTENT_TYPE_OPTIONS, "nosniff")
        .body(Body::from(content))
        .map_err(|e| {
            tracing::error!("Failed to build response: {}", e);
            ApiError::internal("Failed to build response")
        })
}

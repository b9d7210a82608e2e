//! Post handlers.

use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use super::AppState;
use crate::post::Submission;
use crate::web::dto::{ApiResponse, FeedQuery, PostResponse};
use crate::web::error::ApiError;
use crate::web::middleware::AuthIdentity;

/// GET /api/posts - List posts newest first, optionally filtered by tag.
pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FeedQuery>,
) -> Result<Json<ApiResponse<Vec<PostResponse>>>, ApiError> {
    let (limit, offset) = (query.limit(), query.offset());
    let posts = match query.tag() {
        Some(tag) => state.posts.list_by_tag(tag, limit, offset).await,
        None => state.posts.list_recent(limit, offset).await,
    }
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to list posts");
        ApiError::internal("Failed to list posts")
    })?;

    Ok(Json(ApiResponse::new(
        posts.iter().map(PostResponse::from).collect(),
    )))
}

/// GET /api/posts/:id - Get a single post.
pub async fn get_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> Result<Json<ApiResponse<PostResponse>>, ApiError> {
    let post = state
        .posts
        .get_by_id(id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, post_id = id, "Failed to get post");
            ApiError::internal("Failed to get post")
        })?
        .ok_or_else(|| ApiError::not_found("Post not found"))?;

    Ok(Json(ApiResponse::new(PostResponse::from(&post))))
}

/// Split a category field into tags. Accepts comma-separated values.
fn push_tags(tags: &mut Vec<String>, value: &str) {
    tags.extend(value.split(',').map(|t| t.to_string()));
}

/// Read a post submission from multipart fields.
///
/// Fields: `title`, `body` (or `message`), `category` (or `tags`,
/// repeatable or comma-separated), and an optional `file`. A file part with
/// neither a name nor content is what browsers send for an empty file input
/// and counts as no attachment.
pub async fn read_submission(mut multipart: Multipart) -> Result<Submission, ApiError> {
    let mut title = String::new();
    let mut body = String::new();
    let mut tags = Vec::new();
    let mut attachment: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "title" => title = field.text().await?,
            "body" | "message" => body = field.text().await?,
            "category" | "tags" => push_tags(&mut tags, &field.text().await?),
            "file" => {
                let file_name = field
                    .file_name()
                    .map(|s| s.to_string())
                    .filter(|s| !s.is_empty());
                let content = field.bytes().await?.to_vec();
                if file_name.is_some() || !content.is_empty() {
                    attachment = Some((file_name, content));
                }
            }
            _ => {}
        }
    }

    let submission = Submission::new(title, body, tags);
    Ok(match attachment {
        Some((file_name, content)) => submission.with_attachment(file_name, content),
        None => submission,
    })
}

/// POST /api/posts - Submit a new post (multipart).
pub async fn create_post(
    State(state): State<Arc<AppState>>,
    AuthIdentity(identity): AuthIdentity,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PostResponse>>), ApiError> {
    let submission = read_submission(multipart).await?;
    let post = state.pipeline.submit(&identity, submission).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::new(PostResponse::from(&post))),
    ))
}

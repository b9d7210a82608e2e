//! Request DTOs.

use serde::Deserialize;

/// Default number of posts per feed page.
pub const DEFAULT_FEED_LIMIT: i64 = 20;

/// Maximum number of posts per feed page.
pub const MAX_FEED_LIMIT: i64 = 100;

/// Registration request.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Handle.
    pub handle: String,
    /// Password.
    pub password: String,
}

/// Login request.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Handle.
    pub handle: String,
    /// Password.
    pub password: String,
}

/// Feed query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct FeedQuery {
    /// Only list posts carrying this category tag.
    #[serde(default)]
    pub tag: Option<String>,
    /// Page size.
    #[serde(default)]
    pub limit: Option<i64>,
    /// Number of posts to skip.
    #[serde(default)]
    pub offset: Option<i64>,
}

impl FeedQuery {
    /// Page size clamped to 1..=100.
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_FEED_LIMIT)
            .clamp(1, MAX_FEED_LIMIT)
    }

    /// Non-negative offset.
    pub fn offset(&self) -> i64 {
        self.offset.unwrap_or(0).max(0)
    }

    /// Tag filter, ignoring blank values.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref().map(str::trim).filter(|t| !t.is_empty())
    }
}

//! Post model.

use chrono::{DateTime, Utc};

use crate::attachment::Attachment;

/// A persisted post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    /// Unique post ID.
    pub id: i64,
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Category tags, in submission order. Never empty.
    pub tags: Vec<String>,
    /// ID of the identity that wrote the post.
    pub author_id: i64,
    /// Handle of the author.
    pub author_handle: String,
    /// Attached content, if any.
    pub attachment: Option<Attachment>,
    /// Post creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Public URL of the attached image, or an empty string if none.
    pub fn image_url(&self) -> String {
        self.attachment
            .as_ref()
            .map(Attachment::url)
            .unwrap_or_default()
    }
}

/// Data for creating a new post.
#[derive(Debug, Clone)]
pub struct NewPost {
    /// Post title.
    pub title: String,
    /// Post body.
    pub body: String,
    /// Category tags.
    pub tags: Vec<String>,
    /// ID of the author.
    pub author_id: i64,
    /// Already persisted attachment.
    pub attachment: Option<Attachment>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewPost {
    /// Create a new post stamped with the current time.
    pub fn new(
        author_id: i64,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            tags,
            author_id,
            attachment: None,
            created_at: crate::datetime::now(),
        }
    }

    /// Reference a persisted attachment.
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachment = Some(attachment);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn post(attachment: Option<Attachment>) -> Post {
        Post {
            id: 1,
            title: "Hello".to_string(),
            body: "World".to_string(),
            tags: vec!["general".to_string()],
            author_id: 1,
            author_handle: "alice".to_string(),
            attachment,
            created_at: crate::datetime::now(),
        }
    }

    #[test]
    fn test_image_url_without_attachment() {
        let post = post(None);
        assert_eq!(post.image_url(), "");
    }

    #[test]
    fn test_image_url_with_attachment() {
        let post = post(Some(Attachment::new("abc.png", 3)));
        assert_eq!(post.image_url(), "/uploads/abc.png");
    }

    #[test]
    fn test_new_post_builder() {
        let new_post = NewPost::new(5, "t", "b", vec!["x".to_string()])
            .with_attachment(Attachment::new("r.bin", 0));

        assert_eq!(new_post.author_id, 5);
        assert_eq!(new_post.attachment.unwrap().size, 0);
    }
}

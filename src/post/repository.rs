//! SQLite-backed post store.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::types::{NewPost, Post};
use crate::attachment::Attachment;
use crate::datetime::{from_millis, to_millis};
use crate::db::PostStore;
use crate::Result;

const SELECT_POST: &str = "SELECT p.id, p.title, p.body, p.author_id, i.handle AS author_handle,
        p.attachment_ref, p.attachment_size, p.created_at
     FROM posts p
     JOIN identities i ON i.id = p.author_id";

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i64,
    title: String,
    body: String,
    author_id: i64,
    author_handle: String,
    attachment_ref: Option<String>,
    attachment_size: Option<i64>,
    created_at: i64,
}

impl PostRow {
    fn into_post(self, tags: Vec<String>) -> Post {
        let attachment = match (self.attachment_ref, self.attachment_size) {
            (Some(reference), Some(size)) => Some(Attachment::new(reference, size.max(0) as u64)),
            _ => None,
        };
        Post {
            id: self.id,
            title: self.title,
            body: self.body,
            tags,
            author_id: self.author_id,
            author_handle: self.author_handle,
            attachment,
            created_at: from_millis(self.created_at),
        }
    }
}

/// Repository for post records.
#[derive(Debug, Clone)]
pub struct PostRepository {
    pool: SqlitePool,
}

impl PostRepository {
    /// Create a new PostRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn load_tags(&self, post_id: i64) -> Result<Vec<String>> {
        let tags: Vec<String> =
            sqlx::query_scalar("SELECT tag FROM post_categories WHERE post_id = ? ORDER BY rowid")
                .bind(post_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(tags)
    }

    async fn with_tags(&self, rows: Vec<PostRow>) -> Result<Vec<Post>> {
        let mut posts = Vec::with_capacity(rows.len());
        for row in rows {
            let tags = self.load_tags(row.id).await?;
            posts.push(row.into_post(tags));
        }
        Ok(posts)
    }
}

#[async_trait]
impl PostStore for PostRepository {
    async fn insert(&self, new_post: &NewPost) -> Result<Post> {
        let mut tx = self.pool.begin().await?;

        let id: i64 = sqlx::query_scalar(
            "INSERT INTO posts (title, body, author_id, attachment_ref, attachment_size, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING id",
        )
        .bind(&new_post.title)
        .bind(&new_post.body)
        .bind(new_post.author_id)
        .bind(new_post.attachment.as_ref().map(|a| a.reference.as_str()))
        .bind(new_post.attachment.as_ref().map(|a| a.size as i64))
        .bind(to_millis(&new_post.created_at))
        .fetch_one(&mut *tx)
        .await?;

        for tag in &new_post.tags {
            sqlx::query("INSERT OR IGNORE INTO post_categories (post_id, tag) VALUES (?, ?)")
                .bind(id)
                .bind(tag)
                .execute(&mut *tx)
                .await?;
        }

        let author_handle: String = sqlx::query_scalar("SELECT handle FROM identities WHERE id = ?")
            .bind(new_post.author_id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(Post {
            id,
            title: new_post.title.clone(),
            body: new_post.body.clone(),
            tags: new_post.tags.clone(),
            author_id: new_post.author_id,
            author_handle,
            attachment: new_post.attachment.clone(),
            created_at: new_post.created_at,
        })
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Post>> {
        let row = sqlx::query_as::<_, PostRow>(&format!("{SELECT_POST} WHERE p.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => {
                let tags = self.load_tags(row.id).await?;
                Ok(Some(row.into_post(tags)))
            }
            None => Ok(None),
        }
    }

    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{SELECT_POST} ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        self.with_tags(rows).await
    }

    async fn list_by_tag(&self, tag: &str, limit: i64, offset: i64) -> Result<Vec<Post>> {
        let rows = sqlx::query_as::<_, PostRow>(&format!(
            "{SELECT_POST}
             WHERE p.id IN (SELECT post_id FROM post_categories WHERE tag = ?)
             ORDER BY p.created_at DESC, p.id DESC LIMIT ? OFFSET ?"
        ))
        .bind(tag)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;
        self.with_tags(rows).await
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

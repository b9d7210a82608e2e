//! SQLite-backed session store.
//!
//! Tokens are never stored in clear: rows are keyed by the SHA-256 digest of
//! the token, so a leaked database does not yield usable sessions.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::SqlitePool;

use super::traits::SessionStore;
use crate::auth::Session;
use crate::datetime::{from_millis, to_millis};
use crate::Result;

/// Hex-encoded SHA-256 digest of a session token.
fn token_digest(token: &str) -> String {
    Sha256::digest(token.as_bytes())
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

#[derive(Debug, sqlx::FromRow)]
struct SessionRow {
    identity_id: i64,
    created_at: i64,
    expires_at: i64,
}

/// Repository for session records.
#[derive(Debug, Clone)]
pub struct SessionRepository {
    pool: SqlitePool,
}

impl SessionRepository {
    /// Create a new SessionRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionStore for SessionRepository {
    async fn insert(&self, session: &Session) -> Result<()> {
        sqlx::query(
            "INSERT INTO sessions (token_hash, identity_id, created_at, expires_at)
             VALUES (?, ?, ?, ?)",
        )
        .bind(token_digest(&session.token))
        .bind(session.identity_id)
        .bind(to_millis(&session.created_at))
        .bind(to_millis(&session.expires_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get(&self, token: &str) -> Result<Option<Session>> {
        let row = sqlx::query_as::<_, SessionRow>(
            "SELECT identity_id, created_at, expires_at FROM sessions WHERE token_hash = ?",
        )
        .bind(token_digest(token))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| Session {
            token: token.to_string(),
            identity_id: r.identity_id,
            created_at: from_millis(r.created_at),
            expires_at: from_millis(r.expires_at),
        }))
    }

    async fn delete(&self, token: &str) -> Result<bool> {
        let result = sqlx::query("DELETE FROM sessions WHERE token_hash = ?")
            .bind(token_digest(token))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(to_millis(&now))
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sessions")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

//! SQLite-backed credential store.

use async_trait::async_trait;
use sqlx::SqlitePool;

use super::identity::{Identity, IdentityRow, NewIdentity};
use super::traits::CredentialStore;
use crate::datetime::to_millis;
use crate::Result;

/// Repository for identity records.
#[derive(Debug, Clone)]
pub struct IdentityRepository {
    pool: SqlitePool,
}

impl IdentityRepository {
    /// Create a new IdentityRepository over the given pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Count all identities.
    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM identities")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl CredentialStore for IdentityRepository {
    async fn insert_if_absent(&self, new_identity: &NewIdentity) -> Result<Option<Identity>> {
        // The UNIQUE NOCASE constraint decides the race; a conflicting insert
        // returns no row instead of an error.
        let row = sqlx::query_as::<_, IdentityRow>(
            "INSERT INTO identities (handle, password_hash, created_at)
             VALUES (?, ?, ?)
             ON CONFLICT DO NOTHING
             RETURNING id, handle, password_hash, created_at",
        )
        .bind(&new_identity.handle)
        .bind(&new_identity.password_hash)
        .bind(to_millis(&new_identity.created_at))
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn get_by_handle(&self, handle: &str) -> Result<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, handle, password_hash, created_at
             FROM identities WHERE handle = ? COLLATE NOCASE",
        )
        .bind(handle)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Identity::from))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<Identity>> {
        let row = sqlx::query_as::<_, IdentityRow>(
            "SELECT id, handle, password_hash, created_at FROM identities WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Identity::from))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Database;

    async fn setup() -> (Database, IdentityRepository) {
        let db = Database::open_in_memory().await.unwrap();
        let repo = IdentityRepository::new(db.pool().clone());
        (db, repo)
    }

    #[tokio::test]
    async fn test_insert_if_absent_creates_identity() {
        let (_db, repo) = setup().await;

        let identity = repo
            .insert_if_absent(&NewIdentity::new("alice", "$argon2id$fake"))
            .await
            .unwrap()
            .unwrap();

        assert!(identity.id > 0);
        assert_eq!(identity.handle, "alice");
        assert_eq!(identity.password_hash, "$argon2id$fake");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_insert_if_absent_rejects_duplicate() {
        let (_db, repo) = setup().await;

        repo.insert_if_absent(&NewIdentity::new("alice", "h1"))
            .await
            .unwrap()
            .unwrap();
        let second = repo
            .insert_if_absent(&NewIdentity::new("alice", "h2"))
            .await
            .unwrap();

        assert!(second.is_none());
        assert_eq!(repo.count().await.unwrap(), 1);

        // The original record is untouched
        let stored = repo.get_by_handle("alice").await.unwrap().unwrap();
        assert_eq!(stored.password_hash, "h1");
    }

    #[tokio::test]
    async fn test_handles_are_case_insensitive() {
        let (_db, repo) = setup().await;

        repo.insert_if_absent(&NewIdentity::new("Alice", "h1"))
            .await
            .unwrap()
            .unwrap();

        assert!(repo
            .insert_if_absent(&NewIdentity::new("ALICE", "h2"))
            .await
            .unwrap()
            .is_none());

        let found = repo.get_by_handle("alice").await.unwrap().unwrap();
        assert_eq!(found.handle, "Alice");
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let (_db, repo) = setup().await;

        let created = repo
            .insert_if_absent(&NewIdentity::new("bob", "hash"))
            .await
            .unwrap()
            .unwrap();

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(found, created);
        assert!(repo.get_by_id(created.id + 100).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_handle_not_found() {
        let (_db, repo) = setup().await;
        assert!(repo.get_by_handle("nobody").await.unwrap().is_none());
    }
}

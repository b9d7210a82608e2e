//! Identity model.

use chrono::{DateTime, Utc};

use crate::datetime::from_millis;

/// A registered user's authentication record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Unique identity ID.
    pub id: i64,
    /// Login handle (unique, case-insensitive).
    pub handle: String,
    /// Password hash (PHC string).
    pub password_hash: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

/// Data for creating a new identity.
#[derive(Debug, Clone)]
pub struct NewIdentity {
    /// Login handle.
    pub handle: String,
    /// Password hash (already hashed).
    pub password_hash: String,
    /// Registration timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewIdentity {
    /// Create a new identity stamped with the current time.
    pub fn new(handle: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            handle: handle.into(),
            password_hash: password_hash.into(),
            created_at: crate::datetime::now(),
        }
    }
}

/// Raw `identities` row.
#[derive(Debug, sqlx::FromRow)]
pub(crate) struct IdentityRow {
    pub id: i64,
    pub handle: String,
    pub password_hash: String,
    pub created_at: i64,
}

impl From<IdentityRow> for Identity {
    fn from(row: IdentityRow) -> Self {
        Self {
            id: row.id,
            handle: row.handle,
            password_hash: row.password_hash,
            created_at: from_millis(row.created_at),
        }
    }
}

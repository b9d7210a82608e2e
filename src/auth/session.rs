//! Session model and token generation.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::RngCore;

use crate::datetime;

/// Default session duration (24 hours).
pub const DEFAULT_SESSION_TTL_SECS: u64 = 24 * 60 * 60;

/// Number of random bytes in a session token.
pub const TOKEN_BYTES: usize = 32;

/// Generate an unguessable session token.
///
/// 32 bytes from the thread-local CSPRNG, hex encoded (64 characters).
pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    /// Opaque session token.
    pub token: String,
    /// Identity that owns this session.
    pub identity_id: i64,
    /// When the session was created.
    pub created_at: DateTime<Utc>,
    /// When the session expires. Always later than `created_at`.
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Issue a new session starting now.
    pub fn issue(identity_id: i64, ttl: Duration) -> Self {
        Self::issue_at(identity_id, ttl, datetime::now())
    }

    /// Issue a new session starting at the given time.
    ///
    /// TTLs below one millisecond are raised to one millisecond so the expiry
    /// stays strictly after creation at the stored precision.
    pub fn issue_at(identity_id: i64, ttl: Duration, now: DateTime<Utc>) -> Self {
        let ttl = ttl.max(Duration::from_millis(1));
        Self {
            token: generate_token(),
            identity_id,
            created_at: now,
            expires_at: datetime::add_duration(&now, ttl),
        }
    }

    /// Check whether the session is expired at the given instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}

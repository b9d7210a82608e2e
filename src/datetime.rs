//! Date/time utilities.
//!
//! Timestamps are persisted as Unix milliseconds so that range comparisons
//! (session expiry, feed ordering) are plain integer comparisons in SQL.

use chrono::{DateTime, SecondsFormat, Utc};

/// Current time truncated to millisecond precision.
///
/// Values produced here survive a round trip through the database unchanged.
pub fn now() -> DateTime<Utc> {
    from_millis(Utc::now().timestamp_millis())
}

/// Convert a timestamp to Unix milliseconds.
pub fn to_millis(dt: &DateTime<Utc>) -> i64 {
    dt.timestamp_millis()
}

/// Convert Unix milliseconds back to a timestamp.
///
/// Out-of-range values fall back to the Unix epoch.
pub fn from_millis(millis: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(millis).unwrap_or_default()
}

/// Add a std duration to a timestamp, saturating at the maximum representable time.
pub fn add_duration(dt: &DateTime<Utc>, duration: std::time::Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(duration)
        .ok()
        .and_then(|d| dt.checked_add_signed(d))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

/// Format a timestamp as RFC 3339 with millisecond precision.
pub fn to_rfc3339(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Millis, true)
}

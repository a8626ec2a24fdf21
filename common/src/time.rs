//! Time helpers for the price feed format.

use chrono::{DateTime, NaiveDateTime, Utc};

/// A timestamp with timezone (always UTC for quotes).
pub type Timestamp = DateTime<Utc>;

/// Layout of the feed's `create_date` field.
pub const FEED_DATETIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get the current timestamp.
pub fn now() -> Timestamp {
    Utc::now()
}

/// Parse an epoch-seconds value such as `"1709773060"`.
pub fn from_epoch_seconds(value: &str) -> Option<Timestamp> {
    let seconds = value.trim().parse::<i64>().ok()?;
    DateTime::from_timestamp(seconds, 0)
}

/// Parse a feed date such as `"2024-03-06 21:57:40"`, read as UTC.
pub fn from_feed_datetime(value: &str) -> Option<Timestamp> {
    NaiveDateTime::parse_from_str(value.trim(), FEED_DATETIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Age of a timestamp relative to now, never negative.
pub fn age(timestamp: Timestamp) -> chrono::Duration {
    let age = now() - timestamp;
    if age < chrono::Duration::zero() {
        chrono::Duration::zero()
    } else {
        age
    }
}

//! Timestamp utilities
//!
//! All timestamps cross the API and the database as RFC 3339 strings and are
//! handled internally as `DateTime<Utc>`.

use crate::{Error, Result};
use chrono::{DateTime, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Parse an RFC 3339 timestamp and normalize it to UTC
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| Error::InvalidData(format!("Invalid timestamp '{}': {}", value, e)))
}

/// Format a timestamp the way it is stored (`2023-05-01T10:00:00.000Z`)
///
/// Fixed width with millisecond precision, so TEXT ordering is chronological.
pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Signed duration between two timestamps in fractional hours
///
/// Negative when `end` precedes `start`.
pub fn hours_between(start: &DateTime<Utc>, end: &DateTime<Utc>) -> f64 {
    let millis = end.signed_duration_since(*start).num_milliseconds();
    millis as f64 / (1000.0 * 60.0 * 60.0)
}

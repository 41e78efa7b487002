//! Date and time utility functions
//!
//! Stored rows keep their timestamps as UTC RFC 3339 text with millisecond
//! precision, so lexical order matches chronological order.

use chrono::{DateTime, SecondsFormat, Utc};

/// Standard date format for task due dates
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d";

/// Format a UTC timestamp for storage.
pub fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Current time, formatted for storage.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}

/// Parse a stored RFC 3339 timestamp back into UTC.
pub fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    DateTime::parse_from_rfc3339(value).map(|dt| dt.with_timezone(&Utc))
}

/// Validate a `YYYY-MM-DD` due date.
pub fn is_valid_due_date(value: &str) -> bool {
    chrono::NaiveDate::parse_from_str(value, DUE_DATE_FORMAT).is_ok()
}

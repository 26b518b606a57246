//! Timestamp utilities

use chrono::{DateTime, Duration, NaiveDate, SecondsFormat, TimeZone, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Midnight UTC at the start of `date`
pub fn start_of_day_utc(date: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Midnight UTC at the start of the day after `date`.
///
/// Used for inclusive `until` dates: the whole of `date` falls before this instant.
/// `None` when that instant is past the representable range.
pub fn start_of_next_day_utc(date: NaiveDate) -> Option<DateTime<Utc>> {
    start_of_day_utc(date).checked_add_signed(Duration::days(1))
}

/// Convert epoch milliseconds (store encoding) to a UTC timestamp
pub fn from_epoch_millis(millis: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis)
}

/// Convert a UTC timestamp to epoch milliseconds (store encoding)
pub fn to_epoch_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Serde adapter: second-precision timestamp with offset, `Z` for UTC
/// (e.g. `2025-06-20T14:30:00Z`)
pub mod seconds_with_offset {
    use super::*;
    use serde::Serializer;

    pub fn serialize<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

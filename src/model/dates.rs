//! Lenient date handling for API payloads and form input.
//!
//! The API stores full timestamps, but dialogs submit bare `YYYY-MM-DD`
//! values. Both parse to midnight UTC when no time is given.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Deserializer};

/// Parses an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
#[must_use]
pub fn parse_flexible(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok().map(midnight_utc)
}

/// Midnight UTC at the start of `date`.
#[must_use]
pub fn midnight_utc(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(NaiveTime::default()).and_utc()
}

/// Formats a form date the way the API expects deadlines: `YYYY-MM-DDT00:00:00.000Z`.
#[must_use]
pub fn to_api_midnight(date: NaiveDate) -> String {
    format!("{}T00:00:00.000Z", date.format("%Y-%m-%d"))
}

/// Short display form used in tables, e.g. `Mar 5, 2025`.
#[must_use]
pub fn display(date: Option<&DateTime<Utc>>) -> String {
    date.map_or_else(|| "No due date".to_string(), |d| d.format("%b %-d, %Y").to_string())
}

/// Serde helper for optional date fields that may be timestamps, bare dates,
/// empty strings or `null`.
pub(crate) fn deserialize_optional<'de, D>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref() {
        None | Some("") => Ok(None),
        Some(value) => parse_flexible(value)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid date: {value}"))),
    }
}

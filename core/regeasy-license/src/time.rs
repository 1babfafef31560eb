//! Timestamp parsing and formatting for registration payloads.
//!
//! Structured payloads use exactly `yyyy-MM-dd HH:mm:ss`. Delimited payloads
//! accept the culture-invariant shapes older issuing tools wrote; values with
//! no offset are taken as UTC, values with an offset are converted to UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Format of the structured `ts` field.
pub const STRUCTURED_TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used when writing delimited timestamps.
pub const DELIMITED_TS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const OFFSET_DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%:z", "%Y-%m-%d %H:%M:%S%.f%:z"];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Parses a structured `ts` value. Anything other than the exact
/// `yyyy-MM-dd HH:mm:ss` pattern fails.
#[must_use]
pub fn parse_structured(value: &str) -> Option<DateTime<Utc>> {
    // chrono accepts single-digit fields, a signed year and runs of spaces.
    if !has_structured_shape(value) {
        return None;
    }
    NaiveDateTime::parse_from_str(value, STRUCTURED_TS_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

fn has_structured_shape(value: &str) -> bool {
    const SHAPE: &[u8; 19] = b"dddd-dd-dd dd:dd:dd";
    let bytes = value.as_bytes();
    bytes.len() == SHAPE.len()
        && bytes.iter().zip(SHAPE).all(|(b, expected)| match expected {
            b'd' => b.is_ascii_digit(),
            sep => b == sep,
        })
}

/// Parses a delimited timestamp field.
pub(crate) fn parse_invariant(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = OFFSET_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| DateTime::parse_from_str(value, fmt).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
    {
        return Some(naive.and_utc());
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn format_structured(dt: &DateTime<Utc>) -> String {
    dt.format(STRUCTURED_TS_FORMAT).to_string()
}

pub(crate) fn format_delimited(dt: &DateTime<Utc>) -> String {
    dt.format(DELIMITED_TS_FORMAT).to_string()
}

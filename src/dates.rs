//! Normalization of date input from untyped sources.
//!
//! Everything arriving from outside the crate (CLI arguments, stored rows
//! written by older versions, request-body style JSON) passes through
//! [`normalize_due_date`] before it reaches the task model. Unparseable
//! input becomes `None` rather than an error: a missing deadline is a
//! legitimate task state, so bad input degrades to that instead of
//! failing the whole operation.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::Value;

/// Normalize a raw JSON value into a UTC instant, or `None` when the value
/// does not describe one. Never fails.
///
/// Strings go through [`parse_date_str`]; numbers are read as epoch
/// milliseconds; everything else (null, booleans, arrays, objects) is
/// `None`.
pub fn normalize_due_date(raw: &Value) -> Option<DateTime<Utc>> {
    match raw {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            let millis = n
                .as_i64()
                .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))?;
            DateTime::from_timestamp_millis(millis)
        }
        _ => None,
    }
}

/// Parse a date string into a UTC instant.
///
/// Accepts RFC 3339 (offset preserved, result converted to UTC), a naive
/// `YYYY-MM-DDTHH:MM:SS` read as UTC, or a plain `YYYY-MM-DD` read as
/// midnight UTC. Anything else is `None`.
pub fn parse_date_str(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }
    None
}

//! Raw-string value coercion
//!
//! Query-parameter values arrive as strings and are coerced to the target
//! column's scalar type at predicate-build time. Coercion never fails: an
//! unparseable value degrades to a text bind of the original string, which
//! builds a valid (if non-matching) predicate instead of crashing the
//! request.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::schema::ScalarType;
use crate::value::SqlValue;

const TRUE_TOKENS: [&str; 5] = ["true", "1", "t", "yes", "y"];
const FALSE_TOKENS: [&str; 5] = ["false", "0", "f", "no", "n"];

/// Coerce a raw string to a column's scalar type.
///
/// Worst case returns `SqlValue::Text(raw)` unchanged; it never errors.
pub fn coerce_value(ty: ScalarType, raw: &str) -> SqlValue {
    match ty {
        ScalarType::Text | ScalarType::Other => SqlValue::Text(raw.to_string()),
        ScalarType::Bool => {
            let token = raw.trim().to_ascii_lowercase();
            if TRUE_TOKENS.contains(&token.as_str()) {
                SqlValue::Bool(true)
            } else if FALSE_TOKENS.contains(&token.as_str()) {
                SqlValue::Bool(false)
            } else {
                SqlValue::Text(raw.to_string())
            }
        }
        ScalarType::Int => match raw.parse::<i64>() {
            Ok(i) => SqlValue::Int(i),
            Err(_) => match raw.parse::<f64>() {
                Ok(f) if f.is_finite() => SqlValue::Int(f.trunc() as i64),
                _ => SqlValue::Text(raw.to_string()),
            },
        },
        ScalarType::Float => match raw.parse::<f64>() {
            Ok(f) => SqlValue::Float(f),
            Err(_) => SqlValue::Text(raw.to_string()),
        },
        ScalarType::DateTime => match parse_datetime(raw) {
            Some(dt) => SqlValue::DateTime(dt),
            None => SqlValue::Text(raw.to_string()),
        },
    }
}

/// Parse a datetime string: strict ISO 8601 forms first, then a bounded set
/// of permissive fallback formats. Naive datetimes are taken as UTC.
pub fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }

    // Permissive fallbacks for human-entered dates.
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in [
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y",
        "%d-%m-%Y",
        "%d.%m.%Y",
    ] {
        if fmt.contains("%H") {
            if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
                return Some(naive.and_utc());
            }
        } else if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    for fmt in ["%d %b %Y", "%d %B %Y", "%b %d, %Y", "%B %d, %Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, fmt) {
            return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
        }
    }
    None
}

/// Split a comma-separated value list, trimming surrounding whitespace from
/// each piece. Empty pieces are preserved: a trailing comma yields a
/// trailing empty string.
pub fn split_values(raw: &str) -> Vec<String> {
    raw.split(',').map(|item| item.trim().to_string()).collect()
}

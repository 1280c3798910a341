//! Format predicates for identifiers, addresses and timestamps
//!
//! All predicates are total: they return `false` for anything they cannot
//! parse and never panic.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::ValidationError;

/// Canonical textual UUID, versions 1-5, RFC 4122 variant
static UUID_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-[1-5][0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$")
        .expect("invalid uuid regex")
});

/// Permissive single-`@` address with a 2+ letter top-level segment
static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("invalid email regex")
});

/// Time of day: hour, then optional minutes, seconds and fraction. No leap
/// second.
static CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([01][0-9]|2[0-3])(:[0-5][0-9](:[0-5][0-9](\.[0-9]+)?)?)?$")
        .expect("invalid clock regex")
});

/// UTC offset `±HH:MM`, optionally with seconds and fraction
static OFFSET_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]([01][0-9]|2[0-3]):[0-5][0-9](:[0-5][0-9](\.[0-9]+)?)?$")
        .expect("invalid offset regex")
});

const DATE_FORMAT: &str = "%Y-%m-%d";

/// `YYYY-MM-DD`
const DATE_LEN: usize = 10;

pub fn is_valid_uuid(value: &str) -> bool {
    UUID_RE.is_match(value)
}

/// Syntactic check only, no DNS or MX lookup.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// ISO-8601 date or date-time, with an optional UTC offset.
///
/// A literal `Z` is read as `+00:00`. The time may stop after the hour or
/// the minutes; the offset may carry seconds.
pub fn is_valid_date_string(date_string: &str) -> bool {
    let normalized = date_string.replace('Z', "+00:00");
    let s = normalized.as_str();

    if s.len() < DATE_LEN || !s.is_char_boundary(DATE_LEN) {
        return false;
    }
    let (date, rest) = s.split_at(DATE_LEN);
    if !is_valid_calendar_date(date) {
        return false;
    }
    if rest.is_empty() {
        return true;
    }

    let Some(time) = rest.strip_prefix('T').or_else(|| rest.strip_prefix(' ')) else {
        return false;
    };
    let (clock, offset) = match time.find(['+', '-']) {
        Some(at) => time.split_at(at),
        None => (time, ""),
    };

    CLOCK_RE.is_match(clock) && (offset.is_empty() || OFFSET_RE.is_match(offset))
}

/// Four-digit year, two-digit month and day, and a real calendar day.
fn is_valid_calendar_date(date: &str) -> bool {
    let shaped = date.bytes().enumerate().all(|(i, b)| match i {
        4 | 7 => b == b'-',
        _ => b.is_ascii_digit(),
    });
    shaped && NaiveDate::parse_from_str(date, DATE_FORMAT).is_ok()
}

/// [`is_valid_date_string`] over a dynamic value; non-strings are invalid.
pub fn is_valid_date_value(value: &Value) -> bool {
    value.as_str().is_some_and(is_valid_date_string)
}

pub fn require_non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

pub fn require_max_len(field: &'static str, value: &str, max: usize) -> Result<(), ValidationError> {
    if value.chars().count() > max {
        return Err(ValidationError::TooLong { field, max });
    }
    Ok(())
}

pub fn require_uuid(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !is_valid_uuid(value) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a canonical UUID",
        });
    }
    Ok(())
}

pub fn require_email(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if !is_valid_email(value) {
        return Err(ValidationError::InvalidFormat {
            field,
            reason: "must be a valid email address",
        });
    }
    Ok(())
}

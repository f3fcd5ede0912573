//! Field validators for input validation
//!
//! Format checks shared by the per-entity schemas. Each returns the parsed
//! value or a message suitable for a `FieldError`.

use chrono::{DateTime, NaiveDate, Utc};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Date-time with a mandatory time component and zone designator
    static ref DATETIME_REGEX: Regex = Regex::new(
        r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}(:\d{2}(\.\d+)?)?(Z|[+-]\d{2}:\d{2})$"
    ).unwrap();

    /// Email address: local part, '@', dotted domain with an alphabetic TLD
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9_'+\-.]*[A-Za-z0-9_+\-]@([A-Za-z0-9][A-Za-z0-9\-]*\.)+[A-Za-z]{2,}$"
    ).unwrap();
}

/// Parse an ISO-8601 date-time. A bare date is rejected.
pub fn parse_datetime(value: &str) -> Result<DateTime<Utc>, String> {
    if !DATETIME_REGEX.is_match(value) {
        return Err("Invalid datetime".to_string());
    }

    let candidate = if value.len() == 16 || value.as_bytes().get(16) != Some(&b':') {
        // Seconds omitted: "2024-01-15T10:00Z"
        format!("{}:00{}", &value[..16], &value[16..])
    } else {
        value.to_string()
    };

    DateTime::parse_from_rfc3339(&candidate)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| "Invalid datetime".to_string())
}

/// Validate email address format
pub fn validate_email(value: &str) -> Result<(), String> {
    if value.contains("..") || !EMAIL_REGEX.is_match(value) {
        return Err("Invalid email".to_string());
    }
    Ok(())
}

/// Accepts a date-time, a calendar date, or nothing at all
pub fn is_empty_or_iso_date(value: &str) -> bool {
    let trimmed = value.trim();
    trimmed.is_empty()
        || parse_datetime(trimmed).is_ok()
        || NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").is_ok()
}

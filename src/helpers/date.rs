//! Date helper functions

use chrono::{DateTime, Months, NaiveDate, Utc};

/// Format a date string as a long US date ("January 15, 2024")
///
/// Accepts RFC 3339 timestamps and plain `YYYY-MM-DD` dates. Anything
/// else is returned unchanged, and an empty input stays empty.
///
/// # Examples
/// ```ignore
/// long_date("2024-01-15T10:30:00Z") // -> "January 15, 2024"
/// ```
pub fn long_date(input: &str) -> String {
    match parse_date(input) {
        Some(date) => date.format("%B %-d, %Y").to_string(),
        None => input.trim().to_string(),
    }
}

/// Parse the calendar date out of a date or timestamp string
pub fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.date_naive());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// Milliseconds since the epoch for a timestamp string, used for sorting
pub fn timestamp_millis(input: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input.trim()) {
        return Some(dt.timestamp_millis());
    }
    parse_date(input)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

/// The instant `months` months before `now`
pub fn months_ago(now: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    now.checked_sub_months(Months::new(months)).unwrap_or(now)
}

//! Time utilities: due-date parsing and whole-calendar-day arithmetic.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use chrono_tz::Tz;

use crate::error::InvalidDateError;

const NAIVE_DATETIME_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse a due date into a calendar date.
///
/// Accepts `2026-02-20`, RFC 3339 (`2026-02-20T23:59:00-06:00`, date taken as
/// written) and naive date-times (`2026-02-20T09:30`, `2026-02-20 09:30:00`).
/// The time of day never matters; comparisons are by calendar day.
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, InvalidDateError> {
    let s = raw.trim();

    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.date_naive());
    }

    NAIVE_DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|ndt| ndt.date())
        .ok_or_else(|| InvalidDateError::new(raw))
}

/// Calendar date of an instant as seen in `tz`.
pub fn local_date(at: DateTime<Utc>, tz: Tz) -> NaiveDate {
    at.with_timezone(&tz).date_naive()
}

/// Like [`parse_due_date`], but an RFC 3339 instant is converted to `tz`
/// first. Used for stamps the app recorded as instants (`lastLoginDate`).
pub fn parse_date_in(raw: &str, tz: Tz) -> Result<NaiveDate, InvalidDateError> {
    match DateTime::parse_from_rfc3339(raw.trim()) {
        Ok(dt) => Ok(local_date(dt.with_timezone(&Utc), tz)),
        Err(_) => parse_due_date(raw),
    }
}

/// Signed number of calendar days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    (to - from).num_days()
}

/// Days left until `due_date` as seen from `today`. Negative when overdue.
pub fn days_left(today: NaiveDate, due_date: &str) -> Result<i64, InvalidDateError> {
    Ok(days_between(today, parse_due_date(due_date)?))
}

/// Current calendar date in an IANA timezone.
pub fn today_in(tz: Tz) -> NaiveDate {
    local_date(Utc::now(), tz)
}

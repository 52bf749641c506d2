//! Tolerant parsing for client-supplied due dates.
//!
//! Two input shapes are accepted, tried in order:
//! 1. extended ISO-8601 with a zone designator (including a literal `Z`),
//! 2. a plain `YYYY-MM-DD` calendar date, taken as midnight UTC.
//!
//! Anything else is rejected; no third format is ever guessed.

use crate::errors::ServiceError;
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};

pub fn parse_due_date(input: &str) -> Result<DateTime<Utc>, ServiceError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        // No time-of-day supplied: midnight UTC.
        return Ok(date.and_time(NaiveTime::MIN).and_utc());
    }

    Err(ServiceError::ValidationError(format!(
        "Invalid dueDate {input:?}: expected ISO-8601 date-time (e.g. 2025-06-01T00:00:00Z) or YYYY-MM-DD"
    )))
}

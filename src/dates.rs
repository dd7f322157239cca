//! Resolution of the caller-supplied listing date.
//!
//! Malformed or future dates never abort an ingestion run: they are logged
//! and replaced by today's date.

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

/// The current calendar date in UTC.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolve an optional `YYYY-MM-DD` string against the current date.
pub fn resolve_date(input: Option<&str>) -> NaiveDate {
    resolve_date_at(input, today())
}

/// Resolve an optional `YYYY-MM-DD` string against an explicit `today`.
///
/// Returns `today` when `input` is absent, blank, unparseable, or strictly
/// after `today`; otherwise returns the parsed date.
pub fn resolve_date_at(input: Option<&str>, today: NaiveDate) -> NaiveDate {
    let Some(raw) = input.map(str::trim).filter(|s| !s.is_empty()) else {
        return today;
    };

    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) if date <= today => {
            debug!(%date, "Using requested date");
            date
        }
        Ok(date) => {
            warn!(requested = %date, %today, "Future date requested; defaulting to today's date");
            today
        }
        Err(e) => {
            warn!(requested = raw, error = %e, %today, "Invalid date requested; defaulting to today's date");
            today
        }
    }
}

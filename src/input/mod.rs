//! User input handling
//!
//! Target instants are entered as local wall-clock times in the
//! `YYYY-MM-DDTHH:MM` form of an HTML `datetime-local` field, interpreted in a
//! fixed UTC offset. Observer coordinates are entered as plain decimal
//! degrees.

use crate::time::Time;
use chrono::{FixedOffset, NaiveDateTime, TimeZone, Utc};
use thiserror::Error;

/// Accepted local date-time layouts, most common first
const LOCAL_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

/// Layout produced by [`format_local`]
const OUTPUT_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Error type for rejected user input
#[derive(Debug, Error, Clone, PartialEq)]
pub enum InputError {
    #[error("Empty date-time input")]
    Empty,

    #[error("Cannot parse '{input}' as a local date-time (expected YYYY-MM-DDTHH:MM)")]
    Unparseable { input: String },

    #[error("Local time '{input}' does not exist at offset {offset}")]
    Nonexistent { input: String, offset: FixedOffset },

    #[error("Cannot parse '{input}' as a coordinate in degrees")]
    BadCoordinate { input: String },
}

/// Result type for input parsing
pub type Result<T> = std::result::Result<T, InputError>;

/// Parse a local date-time string entered at `offset` into an instant
pub fn parse_local_datetime(input: &str, offset: FixedOffset) -> Result<Time> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty);
    }

    let naive = LOCAL_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(trimmed, fmt).ok())
        .ok_or_else(|| InputError::Unparseable {
            input: trimmed.to_string(),
        })?;

    let local = offset
        .from_local_datetime(&naive)
        .single()
        .ok_or_else(|| InputError::Nonexistent {
            input: trimmed.to_string(),
            offset,
        })?;
    Ok(Time::from_datetime(local.with_timezone(&Utc)))
}

/// Format an instant as a local `YYYY-MM-DDTHH:MM` string at `offset`
///
/// Returns `None` for instants chrono cannot represent.
pub fn format_local(time: &Time, offset: FixedOffset) -> Option<String> {
    let utc = time.to_datetime().ok()?;
    Some(utc.with_timezone(&offset).format(OUTPUT_FORMAT).to_string())
}

/// Parse a latitude or longitude in decimal degrees
///
/// The value is not range checked; only non-numbers are rejected.
pub fn parse_coordinate(input: &str) -> Result<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| InputError::BadCoordinate {
            input: input.to_string(),
        })
}

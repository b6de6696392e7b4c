//! Lookback duration parsing for CLI arguments and configuration
//!
//! Accepts a count followed by a unit, with or without a space:
//! "180d", "6 months", "2 weeks", "1y", "36h".

use chrono::Duration;

/// Error types for duration parsing
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DurationParseError {
    #[error("Invalid duration: '{input}'. Expected a number followed by a unit, e.g. '180d' or '6 months'")]
    InvalidFormat { input: String },

    #[error("Invalid number in duration: '{input}'")]
    InvalidNumber { input: String },

    #[error("Unsupported time unit: {unit}. Supported units: seconds, minutes, hours, days, weeks, months, years")]
    UnsupportedUnit { unit: String },

    #[error("Duration must be greater than zero: '{input}'")]
    NotPositive { input: String },

    #[error("Duration out of range: '{input}'")]
    OutOfRange { input: String },
}

/// Parse a lookback duration
///
/// Months are 30 days and years 365 days.
///
/// # Examples
///
/// ```
/// use gspots::cli::duration_parser::parse_lookback;
///
/// assert_eq!(parse_lookback("180d").unwrap().num_days(), 180);
/// assert_eq!(parse_lookback("6 months").unwrap().num_days(), 180);
/// assert_eq!(parse_lookback("2w").unwrap().num_days(), 14);
/// ```
pub fn parse_lookback(input: &str) -> Result<Duration, DurationParseError> {
    let trimmed = input.trim().to_lowercase();
    if trimmed.is_empty() {
        return Err(DurationParseError::InvalidFormat { input: input.to_string() });
    }

    let split_at = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    let (number_str, unit) = trimmed.split_at(split_at);
    let unit = unit.trim();

    if number_str.is_empty() {
        return Err(DurationParseError::InvalidNumber { input: input.to_string() });
    }
    let number = number_str
        .parse::<i64>()
        .map_err(|_| DurationParseError::InvalidNumber { input: input.to_string() })?;
    if number <= 0 {
        return Err(DurationParseError::NotPositive { input: input.to_string() });
    }

    let duration = match unit {
        "s" | "sec" | "second" | "seconds" => Duration::try_seconds(number),
        "min" | "minute" | "minutes" => Duration::try_minutes(number),
        "h" | "hour" | "hours" => Duration::try_hours(number),
        // bare numbers are days
        "" | "d" | "day" | "days" => Duration::try_days(number),
        "w" | "week" | "weeks" => Duration::try_weeks(number),
        "m" | "mo" | "month" | "months" => number.checked_mul(30).and_then(Duration::try_days),
        "y" | "year" | "years" => number.checked_mul(365).and_then(Duration::try_days),
        _ => return Err(DurationParseError::UnsupportedUnit { unit: unit.to_string() }),
    }
    .ok_or_else(|| DurationParseError::OutOfRange { input: input.to_string() })?;

    Ok(duration)
}

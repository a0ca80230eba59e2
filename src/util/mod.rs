//! Shared constants and display formatting helpers.

use thiserror::Error;

// ============================================================================
// Constants
// ============================================================================

/// Connection string of the embedded database.
pub const DB_NAME: &str = "sqlite:pomodoko.db";

/// Sound resource played when a phase completes.
pub const NOTIFICATION_SUCCESS: &str = "complete.mp3";

/// Name given to freshly added tasks.
pub const DEFAULT_TASK_NAME: &str = "Your new task";

/// Default pomodoro duration in seconds (25 minutes).
pub const POMODORO_DEFAULT: u32 = 25 * 60;
/// Default short rest duration in seconds (5 minutes).
pub const SHORT_REST_DEFAULT: u32 = 5 * 60;
/// Default long rest duration in seconds (15 minutes).
pub const LONG_REST_DEFAULT: u32 = 15 * 60;

// ============================================================================
// Formatting
// ============================================================================

/// Errors raised when converting untrusted numbers into a seconds count.
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("seconds must not be negative: {0}")]
    Negative(f64),

    #[error("seconds must be finite: {0}")]
    NotFinite(f64),

    #[error("seconds must be a whole number: {0}")]
    Fractional(f64),

    #[error("seconds out of range: {0}")]
    OutOfRange(f64),
}

/// Whole minutes of `total_seconds`, zero-padded to two digits.
///
/// Values of 100 minutes or more are not truncated.
pub fn format_minutes(total_seconds: u64) -> String {
    format!("{:02}", total_seconds / 60)
}

/// Seconds past the minute of `total_seconds`, zero-padded to two digits.
pub fn format_seconds(total_seconds: u64) -> String {
    format!("{:02}", total_seconds % 60)
}

/// Formats `total_seconds` as `MM:SS`.
pub fn format_clock(total_seconds: u64) -> String {
    format!(
        "{}:{}",
        format_minutes(total_seconds),
        format_seconds(total_seconds)
    )
}

/// Converts an untrusted numeric value into a seconds count.
///
/// # Errors
///
/// Rejects negative, non-finite, fractional and out-of-range values.
pub fn checked_seconds(value: f64) -> Result<u64, FormatError> {
    if !value.is_finite() {
        return Err(FormatError::NotFinite(value));
    }
    if value < 0.0 {
        return Err(FormatError::Negative(value));
    }
    if value.fract() != 0.0 {
        return Err(FormatError::Fractional(value));
    }
    // u64::MAX rounds up to 2^64 as f64, so anything at or above it overflows.
    if value >= u64::MAX as f64 {
        return Err(FormatError::OutOfRange(value));
    }
    Ok(value as u64)
}

//! Duration text parsing and formatting.
//!
//! Input hosts (text box, CLI flag) normalize user text through here before
//! handing a duration to the engine. Accepted shapes are `MM` (whole
//! minutes) and `MM:SS`; seconds clamp to `0..=59`, negative minutes clamp
//! to zero, and a result of zero total length is rejected so the host can
//! revert its display to the last valid value.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseDurationError {
    #[error("empty duration")]
    Empty,
    #[error("expected MM or MM:SS")]
    BadFormat,
    #[error("invalid number: {0}")]
    InvalidNumber(String),
    #[error("duration must be positive")]
    NonPositive,
}

/// Parse `MM` or `MM:SS` into milliseconds.
pub fn parse_duration(text: &str) -> Result<u64, ParseDurationError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(ParseDurationError::Empty);
    }

    if text.contains(':') {
        // Empty segments are dropped, so "5:" or ":30" reduce to a single
        // segment and fail the shape check.
        let parts: Vec<&str> = text.split(':').filter(|p| !p.is_empty()).collect();
        if parts.len() != 2 {
            return Err(ParseDurationError::BadFormat);
        }
        let minutes = parse_int(parts[0])?.max(0) as u64;
        let seconds = parse_int(parts[1])?.clamp(0, 59) as u64;
        // Saturating arithmetic: absurdly large but parsable values cap at
        // u64::MAX milliseconds instead of overflowing.
        let total_ms = minutes.saturating_mul(60_000).saturating_add(seconds * 1_000);
        if total_ms == 0 {
            return Err(ParseDurationError::NonPositive);
        }
        return Ok(total_ms);
    }

    let minutes = parse_int(text)?.max(0) as u64;
    if minutes == 0 {
        return Err(ParseDurationError::NonPositive);
    }
    Ok(minutes.saturating_mul(60_000))
}

/// Format milliseconds as `MM:SS` (total whole minutes, zero-padded).
pub fn format_duration(ms: u64) -> String {
    let total_secs = ms / 1_000;
    format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
}

fn parse_int(segment: &str) -> Result<i64, ParseDurationError> {
    segment
        .trim()
        .parse::<i64>()
        .map_err(|_| ParseDurationError::InvalidNumber(segment.trim().to_string()))
}

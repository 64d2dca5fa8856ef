//! Poll interval parsing.

use std::time::Duration;

use super::ConfigError;

/// Parses a duration string like `1h`, `15m`, `90s`, `500ms` or `1h30m`.
///
/// Segments are summed, so `1h30m` is ninety minutes. The result must be
/// positive; a zero interval would poll in a busy loop.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidInterval`] for empty input, unknown units,
/// missing units, or a total of zero.
pub fn parse_interval(value: &str) -> Result<Duration, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(invalid(value, "empty duration"));
    }

    let bytes = trimmed.as_bytes();
    let mut total = Duration::ZERO;
    let mut i = 0;
    while i < bytes.len() {
        let number_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == number_start {
            return Err(invalid(value, "expected a number"));
        }
        let number: u64 = trimmed[number_start..i]
            .parse()
            .map_err(|_| invalid(value, "number out of range"))?;

        let unit_start = i;
        while i < bytes.len() && !bytes[i].is_ascii_digit() {
            i += 1;
        }
        let segment = match &trimmed[unit_start..i] {
            "ms" => Some(Duration::from_millis(number)),
            "s" => Some(Duration::from_secs(number)),
            "m" => number.checked_mul(60).map(Duration::from_secs),
            "h" => number.checked_mul(3600).map(Duration::from_secs),
            "" => return Err(invalid(value, "missing unit, expected ms, s, m or h")),
            unit => return Err(invalid(value, &format!("unknown unit '{unit}'"))),
        };
        let segment = segment.ok_or_else(|| invalid(value, "duration too large"))?;
        total = total
            .checked_add(segment)
            .ok_or_else(|| invalid(value, "duration too large"))?;
    }

    if total == Duration::ZERO {
        return Err(invalid(value, "interval must be positive"));
    }
    Ok(total)
}

fn invalid(value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidInterval {
        value: value.to_owned(),
        reason: reason.to_owned(),
    }
}

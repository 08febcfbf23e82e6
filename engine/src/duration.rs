use crate::error::{Result, TrackerError};

pub const ROUNDS_PER_MINUTE: u64 = 6;
pub const ROUNDS_PER_HOUR: u64 = ROUNDS_PER_MINUTE * 60;
pub const ROUNDS_PER_DAY: u64 = ROUNDS_PER_HOUR * 24;
pub const ROUNDS_PER_YEAR: u64 = ROUNDS_PER_DAY * 365;

/// Parse a round-count expression such as `3r`, `10s`, `2m` or `1d` into a
/// number of rounds.
///
/// The token must be a positive decimal number followed by exactly one unit
/// letter. Seconds must be a multiple of 10.
pub fn parse_rounds(token: &str) -> Result<u64> {
    let Some((unit_at, unit)) = token.char_indices().last() else {
        return Err(TrackerError::InvalidNumber(token.to_string()));
    };
    let digits = &token[..unit_at];
    if unit.is_ascii_digit() {
        return Err(TrackerError::InvalidDurationUnit(String::new()));
    }
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(TrackerError::InvalidNumber(token.to_string()));
    }
    let number: u64 = digits
        .parse()
        .map_err(|_| TrackerError::InvalidNumber(token.to_string()))?;
    if number == 0 {
        return Err(TrackerError::InvalidNumber(token.to_string()));
    }

    let scale = |factor: u64| {
        number
            .checked_mul(factor)
            .ok_or_else(|| TrackerError::InvalidNumber(token.to_string()))
    };

    match unit {
        'r' => Ok(number),
        's' => {
            if number % 10 != 0 {
                return Err(TrackerError::NonDivisibleSeconds(number));
            }
            Ok(number / 10)
        }
        'm' => scale(ROUNDS_PER_MINUTE),
        'h' => scale(ROUNDS_PER_HOUR),
        'd' => scale(ROUNDS_PER_DAY),
        'y' => scale(ROUNDS_PER_YEAR),
        other => Err(TrackerError::InvalidDurationUnit(other.to_string())),
    }
}

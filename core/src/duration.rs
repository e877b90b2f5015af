//! Duration text such as `5s`, `1h30m` or `1.5ms`.

use crate::coerce::{Coerce, Field};
use crate::error::BindError;
use std::time::Duration;
use thiserror::Error;

/// Why a duration string was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDuration {
    /// The string was empty.
    #[error("empty duration")]
    Empty,
    /// A segment had no leading number (this includes negative durations).
    #[error("expected a number at {0:?}")]
    MissingNumber(String),
    /// A number was not followed by a unit.
    #[error("missing unit after {0:?}")]
    MissingUnit(String),
    /// The unit is not one of `ns us µs ms s m h`.
    #[error("unknown unit {0:?}")]
    UnknownUnit(String),
    /// The number could not be read.
    #[error("invalid number {0:?}")]
    InvalidNumber(String),
    /// The total does not fit in a `Duration`.
    #[error("duration out of range")]
    Overflow,
}

/// Parse a sequence of `<decimal><unit>` segments. `0` alone is zero.
///
/// # Errors
///
/// Returns an [`InvalidDuration`] describing the first malformed segment.
///
/// # Examples
///
/// ```
/// use formbind_core::duration::parse_duration;
/// use std::time::Duration;
///
/// assert_eq!(parse_duration("1h30m"), Ok(Duration::from_secs(5400)));
/// assert_eq!(parse_duration("1.5s"), Ok(Duration::from_millis(1500)));
/// ```
pub fn parse_duration(text: &str) -> Result<Duration, InvalidDuration> {
    if text.is_empty() {
        return Err(InvalidDuration::Empty);
    }
    if text == "0" {
        return Ok(Duration::ZERO);
    }

    let mut nanos: u128 = 0;
    let mut rest = text;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .unwrap_or(rest.len());
        if number_end == 0 {
            return Err(InvalidDuration::MissingNumber(rest.to_owned()));
        }
        let (number, tail) = rest.split_at(number_end);
        if !number.bytes().any(|byte| byte.is_ascii_digit()) {
            return Err(InvalidDuration::InvalidNumber(number.to_owned()));
        }

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let scale: u128 = match unit {
            "ns" => 1,
            "us" | "µs" | "μs" => 1_000,
            "ms" => 1_000_000,
            "s" => 1_000_000_000,
            "m" => 60_000_000_000,
            "h" => 3_600_000_000_000,
            "" => return Err(InvalidDuration::MissingUnit(number.to_owned())),
            other => return Err(InvalidDuration::UnknownUnit(other.to_owned())),
        };

        nanos = nanos
            .checked_add(scaled(number, scale)?)
            .ok_or(InvalidDuration::Overflow)?;
        rest = tail;
    }

    u64::try_from(nanos)
        .map(Duration::from_nanos)
        .map_err(|_| InvalidDuration::Overflow)
}

/// `number` (with optional fraction) times `scale`, in nanoseconds.
fn scaled(number: &str, scale: u128) -> Result<u128, InvalidDuration> {
    let invalid = || InvalidDuration::InvalidNumber(number.to_owned());
    let (whole, fraction) = number.split_once('.').unwrap_or((number, ""));
    if whole.is_empty() && fraction.is_empty() {
        return Err(invalid());
    }
    if fraction.contains('.') {
        return Err(invalid());
    }

    let whole: u128 = if whole.is_empty() {
        0
    } else {
        whole.parse().map_err(|_| invalid())?
    };
    let mut total = whole.checked_mul(scale).ok_or(InvalidDuration::Overflow)?;

    // Digits beyond nanosecond precision cannot change the result.
    let mut numerator: u128 = 0;
    let mut denominator: u128 = 1;
    for digit in fraction.bytes().take(18) {
        numerator = numerator * 10 + u128::from(digit - b'0');
        denominator *= 10;
    }
    total += numerator * scale / denominator;
    Ok(total)
}

impl Coerce for Duration {
    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        *self = match values.first() {
            Some(text) => {
                parse_duration(text).map_err(|source| field.conversion(text, "duration", source))?
            }
            None => Self::ZERO,
        };
        Ok(())
    }
}

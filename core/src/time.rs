//! Timestamp coercion.
//!
//! Three independent directives compose, in this order:
//!
//! 1. `time_format` decides the parse shape (RFC 3339 when absent, epoch
//!    offsets for `unix`, `unixmilli`, `unixmicro` and `unixnano`, a chrono
//!    `strftime` format otherwise).
//! 2. The zone interprets zone-less timestamps: `time_location` when given,
//!    UTC when only `time_utc` is given, else the configured default zone.
//! 3. `time_utc` converts the final instant to UTC without moving it.
//!
//! An unknown `time_location` is rejected before the value is looked at.

use crate::coerce::{Coerce, Field};
use crate::error::{BindError, NonexistentLocalTime};
use chrono::{
    DateTime, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use chrono_tz::Tz;

/// Epoch precision selected by the `unix*` formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EpochUnit {
    Seconds,
    Millis,
    Micros,
    Nanos,
}

impl EpochUnit {
    fn from_format(format: &str) -> Option<Self> {
        match format {
            "unix" => Some(Self::Seconds),
            "unixmilli" => Some(Self::Millis),
            "unixmicro" => Some(Self::Micros),
            "unixnano" => Some(Self::Nanos),
            _ => None,
        }
    }

    fn to_datetime(self, offset: i64) -> Option<DateTime<Utc>> {
        match self {
            Self::Seconds => DateTime::from_timestamp(offset, 0),
            Self::Millis => DateTime::from_timestamp_millis(offset),
            Self::Micros => DateTime::from_timestamp_micros(offset),
            Self::Nanos => Some(DateTime::from_timestamp_nanos(offset)),
        }
    }
}

/// The out-of-range epoch offset error.
#[derive(thiserror::Error, Debug)]
#[error("epoch offset out of range")]
struct EpochOutOfRange;

/// Zone that interprets zone-less input for this field.
fn resolve_zone(field: &Field<'_>) -> Result<Tz, BindError> {
    let directives = field.spec().time;
    match directives.location {
        Some(name) => name.parse().map_err(|_| BindError::Configuration {
            field: field.name().to_owned(),
            zone: name.to_owned(),
        }),
        None if directives.utc => Ok(Tz::UTC),
        None => Ok(field.config().default_zone),
    }
}

/// Parse `text` according to the field's time directives.
///
/// # Errors
///
/// Returns [`BindError::Configuration`] for an unknown `time_location` and
/// [`BindError::Conversion`] when `text` does not match the format.
pub fn parse_time(text: &str, field: &Field<'_>) -> Result<DateTime<FixedOffset>, BindError> {
    let directives = field.spec().time;
    let zone = resolve_zone(field)?;

    let parsed = match directives.format {
        None => DateTime::parse_from_rfc3339(text)
            .map_err(|source| field.conversion(text, "RFC 3339 timestamp", source))?,
        Some(format) => match EpochUnit::from_format(format) {
            Some(unit) => {
                let offset: i64 = text
                    .parse()
                    .map_err(|source| field.conversion(text, "epoch timestamp", source))?;
                unit.to_datetime(offset)
                    .ok_or_else(|| field.conversion(text, "epoch timestamp", EpochOutOfRange))?
                    .with_timezone(&zone)
                    .fixed_offset()
            }
            None => parse_formatted(text, format, zone, field)?,
        },
    };

    Ok(if directives.utc {
        parsed.with_timezone(&Utc).fixed_offset()
    } else {
        parsed
    })
}

/// Parse with a `strftime` format, localising zone-less results in `zone`.
fn parse_formatted(
    text: &str,
    format: &str,
    zone: Tz,
    field: &Field<'_>,
) -> Result<DateTime<FixedOffset>, BindError> {
    if let Ok(with_offset) = DateTime::parse_from_str(text, format) {
        return Ok(with_offset);
    }

    let naive = NaiveDateTime::parse_from_str(text, format)
        .or_else(|_| NaiveDate::parse_from_str(text, format).map(|date| date.and_time(NaiveTime::MIN)))
        .map_err(|source| field.conversion(text, "timestamp", source))?;

    match zone.from_local_datetime(&naive) {
        // A repeated hour resolves to the earlier instant.
        LocalResult::Single(local) | LocalResult::Ambiguous(local, _) => Ok(local.fixed_offset()),
        LocalResult::None => Err(field.conversion(
            text,
            "timestamp",
            NonexistentLocalTime {
                zone: zone.name().to_owned(),
            },
        )),
    }
}

/// The zero timestamp: the Unix epoch in UTC.
fn zero_time() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

impl Coerce for DateTime<FixedOffset> {
    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        *self = match values.first() {
            Some(text) => parse_time(text, field)?,
            None => zero_time().fixed_offset(),
        };
        Ok(())
    }
}

impl Coerce for DateTime<Utc> {
    fn coerce(&mut self, values: &[String], field: &Field<'_>) -> Result<(), BindError> {
        *self = match values.first() {
            Some(text) => parse_time(text, field)?.with_timezone(&Utc),
            None => zero_time(),
        };
        Ok(())
    }
}

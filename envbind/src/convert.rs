//! Leaf value conversions

use std::time::Duration;

use chrono::format::ParseErrorKind;
use chrono::{DateTime, FixedOffset, Local, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::error::ConvertError;
use crate::field::Field;

/// Time format used when a field has no `time_format` annotation.
pub const DEFAULT_TIME_FORMAT: &str = "rfc3339";

/// Parse a boolean, accepting `1/0`, `t/f`, `yes/no`, `y/n` and the common
/// spellings of `true`/`false`.
pub fn parse_bool(s: &str) -> Result<bool, ConvertError> {
    match s {
        "1" | "t" | "T" | "true" | "TRUE" | "True" | "YES" | "yes" | "Y" | "y" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" | "NO" | "no" | "N" | "n" => Ok(false),
        _ => Err(ConvertError::Bool(s.to_string())),
    }
}

/// Parse a duration literal such as `1h30m` or `250ms`.
pub fn parse_duration(s: &str) -> Result<Duration, ConvertError> {
    Ok(humantime::parse_duration(s)?)
}

/// Parse a time value according to the field's time annotations.
///
/// Returns `None` for an empty string, meaning the zero time.
pub fn parse_time(s: &str, field: &Field<'_>) -> Result<Option<DateTime<FixedOffset>>, ConvertError> {
    if s.is_empty() {
        return Ok(None);
    }

    let format = field.annotation("time_format").unwrap_or(DEFAULT_TIME_FORMAT);
    let zone = Zone::from_field(field)?;

    let time = match format.to_ascii_lowercase().as_str() {
        "unix" => zone.in_zone(from_unix(s.parse()?, false)?),
        "unixnano" => zone.in_zone(from_unix(s.parse()?, true)?),
        "rfc3339" => zone.adjust(DateTime::parse_from_rfc3339(s)?),
        "rfc2822" => zone.adjust(DateTime::parse_from_rfc2822(s)?),
        _ => parse_layout(s, format, &zone)?,
    };

    Ok(Some(time))
}

fn from_unix(value: i64, nanos: bool) -> Result<DateTime<Utc>, ConvertError> {
    let time = if nanos {
        Some(DateTime::from_timestamp_nanos(value))
    } else {
        DateTime::from_timestamp(value, 0)
    };
    time.ok_or(ConvertError::Timestamp(value))
}

/// Parse with a strftime layout; layouts without an offset are read in `zone`.
fn parse_layout(s: &str, format: &str, zone: &Zone) -> Result<DateTime<FixedOffset>, ConvertError> {
    let naive = match DateTime::parse_from_str(s, format) {
        Ok(time) => return Ok(zone.adjust(time)),
        Err(err) if err.kind() != ParseErrorKind::NotEnough => return Err(err.into()),
        Err(_) => match NaiveDateTime::parse_from_str(s, format) {
            Ok(naive) => naive,
            Err(err) if err.kind() != ParseErrorKind::NotEnough => return Err(err.into()),
            Err(_) => NaiveDate::parse_from_str(s, format)?.and_time(NaiveTime::MIN),
        },
    };
    zone.localize(naive)
}

/// Zone selected by `time_location` / `time_utc`.
enum Zone {
    Local,
    Utc,
    Named(Tz),
}

impl Zone {
    fn from_field(field: &Field<'_>) -> Result<Self, ConvertError> {
        if let Some(name) = field.annotation("time_location").filter(|n| !n.is_empty()) {
            let tz = name.parse::<Tz>().map_err(|e| ConvertError::Location {
                name: name.to_string(),
                message: e.to_string(),
            })?;
            return Ok(Self::Named(tz));
        }

        let utc = field
            .annotation("time_utc")
            .and_then(|v| parse_bool(v).ok())
            .unwrap_or(false);
        Ok(if utc { Self::Utc } else { Self::Local })
    }

    fn is_explicit(&self) -> bool {
        !matches!(self, Self::Local)
    }

    fn in_zone(&self, time: DateTime<Utc>) -> DateTime<FixedOffset> {
        match self {
            Self::Local => time.with_timezone(&Local).fixed_offset(),
            Self::Utc => time.fixed_offset(),
            Self::Named(tz) => time.with_timezone(tz).fixed_offset(),
        }
    }

    /// Move a time carrying its own offset into an explicitly selected zone.
    fn adjust(&self, time: DateTime<FixedOffset>) -> DateTime<FixedOffset> {
        if self.is_explicit() {
            self.in_zone(time.with_timezone(&Utc))
        } else {
            time
        }
    }

    fn localize(&self, naive: NaiveDateTime) -> Result<DateTime<FixedOffset>, ConvertError> {
        let time = match self {
            Self::Local => Local.from_local_datetime(&naive).earliest().map(|t| t.fixed_offset()),
            Self::Utc => Some(Utc.from_utc_datetime(&naive).fixed_offset()),
            Self::Named(tz) => tz.from_local_datetime(&naive).earliest().map(|t| t.fixed_offset()),
        };
        time.ok_or_else(|| ConvertError::LocalTime(naive.to_string()))
    }
}

//! Tick based date and time in the `System.DateTime` layout.
//!
//! A [`DateTime`] counts 100-nanosecond ticks since 0001-01-01T00:00:00 and carries a
//! [`DateTimeKind`]. The binary form packs the kind into the top two bits of the tick
//! count, as `DateTime.ToBinary` does.

use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    str::FromStr,
};

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::{Error, Result};

/// Ticks in one second
pub const TICKS_PER_SECOND: i64 = 10_000_000;
/// Ticks in one day
pub const TICKS_PER_DAY: i64 = 86_400 * TICKS_PER_SECOND;
/// Tick count of 9999-12-31T23:59:59.9999999
pub const MAX_TICKS: i64 = 3_155_378_975_999_999_999;

const KIND_SHIFT: u32 = 62;
const TICKS_MASK: i64 = 0x3FFF_FFFF_FFFF_FFFF;

/// Whether a [`DateTime`] is in local time, UTC, or neither
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DateTimeKind {
    /// No time zone information
    #[default]
    Unspecified,
    /// Coordinated universal time
    Utc,
    /// Local time of the serializing machine
    Local,
}

/// A `System.DateTime` value.
///
/// Equality and ordering compare ticks only; the kind is informational.
#[derive(Debug, Clone, Copy, Default)]
pub struct DateTime {
    ticks: i64,
    kind: DateTimeKind,
}

impl DateTime {
    /// 0001-01-01T00:00:00
    pub const MIN: DateTime = DateTime {
        ticks: 0,
        kind: DateTimeKind::Unspecified,
    };

    /// 9999-12-31T23:59:59.9999999
    pub const MAX: DateTime = DateTime {
        ticks: MAX_TICKS,
        kind: DateTimeKind::Unspecified,
    };

    /// Create a value from a tick count.
    ///
    /// # Errors
    /// Returns [`crate::Error::Argument`] if `ticks` lies outside `0..=MAX_TICKS`.
    pub fn new(ticks: i64, kind: DateTimeKind) -> Result<Self> {
        if !(0..=MAX_TICKS).contains(&ticks) {
            return Err(Error::Argument(format!(
                "Ticks must be between 0 and {MAX_TICKS}, got {ticks}"
            )));
        }

        Ok(DateTime { ticks, kind })
    }

    /// Create a value from a chrono timestamp; sub-tick precision is truncated.
    ///
    /// # Errors
    /// Returns [`crate::Error::Argument`] for years outside 1 to 9999.
    pub fn from_naive(value: NaiveDateTime, kind: DateTimeKind) -> Result<Self> {
        if !(1..=9999).contains(&value.year()) {
            return Err(Error::Argument(format!(
                "Year {} is outside the range of DateTime",
                value.year()
            )));
        }

        let days = i64::from(value.date().num_days_from_ce() - 1);
        let seconds = i64::from(value.time().num_seconds_from_midnight());
        // Leap seconds are folded into the preceding second
        let nanos = i64::from(value.time().nanosecond().min(999_999_999));

        Self::new(
            days * TICKS_PER_DAY + seconds * TICKS_PER_SECOND + nanos / 100,
            kind,
        )
    }

    /// This value as a chrono timestamp
    #[must_use]
    pub fn to_naive(&self) -> NaiveDateTime {
        let days = self.ticks / TICKS_PER_DAY;
        let remainder = self.ticks % TICKS_PER_DAY;

        #[allow(clippy::cast_possible_truncation)]
        let date = NaiveDate::from_num_days_from_ce_opt(days as i32 + 1);
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let time = NaiveTime::from_num_seconds_from_midnight_opt(
            (remainder / TICKS_PER_SECOND) as u32,
            ((remainder % TICKS_PER_SECOND) * 100) as u32,
        );

        match (date, time) {
            (Some(date), Some(time)) => date.and_time(time),
            _ => NaiveDateTime::default(),
        }
    }

    /// Tick count since 0001-01-01
    #[must_use]
    pub fn ticks(&self) -> i64 {
        self.ticks
    }

    /// The time zone kind
    #[must_use]
    pub fn kind(&self) -> DateTimeKind {
        self.kind
    }

    /// Same instant with a different kind
    #[must_use]
    pub fn with_kind(self, kind: DateTimeKind) -> Self {
        DateTime { kind, ..self }
    }

    /// Pack ticks and kind into 64 bits
    #[must_use]
    pub fn to_binary(&self) -> i64 {
        let kind: i64 = match self.kind {
            DateTimeKind::Unspecified => 0,
            DateTimeKind::Utc => 1,
            DateTimeKind::Local => 2,
        };
        (kind << KIND_SHIFT) | self.ticks
    }

    /// Unpack a value produced by [`DateTime::to_binary`].
    ///
    /// Both local kind encodings (2 and 3) decode to [`DateTimeKind::Local`].
    ///
    /// # Errors
    /// Returns [`crate::Error::Argument`] if the tick count is out of range.
    pub fn from_binary(data: i64) -> Result<Self> {
        #[allow(clippy::cast_sign_loss)]
        let kind = match (data as u64) >> KIND_SHIFT {
            0 => DateTimeKind::Unspecified,
            1 => DateTimeKind::Utc,
            _ => DateTimeKind::Local,
        };

        Self::new(data & TICKS_MASK, kind)
    }

    /// ISO 8601 round-trip form, `yyyy-MM-ddTHH:mm:ss.fffffff` with a `Z` suffix for UTC
    #[must_use]
    pub fn to_round_trip_string(&self) -> String {
        let fraction = self.ticks % TICKS_PER_SECOND;
        let suffix = if self.kind == DateTimeKind::Utc { "Z" } else { "" };
        format!(
            "{}.{fraction:07}{suffix}",
            self.to_naive().format("%Y-%m-%dT%H:%M:%S")
        )
    }

    /// Parse a date and time.
    ///
    /// Accepted forms: ISO 8601 with optional fraction (`Z` marks UTC, numeric offsets are
    /// converted to UTC), `yyyy-MM-dd HH:mm:ss`, the invariant `MM/dd/yyyy HH:mm:ss`, and
    /// the date-only variants of both.
    ///
    /// # Errors
    /// Returns [`crate::Error::Format`] if no form matches.
    pub fn parse(input: &str) -> Result<Self> {
        let text = input.trim();

        if let Some(utc) = text.strip_suffix('Z') {
            if let Some(value) = Self::parse_naive(utc) {
                return Self::from_naive(value, DateTimeKind::Utc);
            }
        }

        if let Some(value) = Self::parse_naive(text) {
            return Self::from_naive(value, DateTimeKind::Unspecified);
        }

        if let Ok(value) = chrono::DateTime::parse_from_rfc3339(text) {
            return Self::from_naive(value.naive_utc(), DateTimeKind::Utc);
        }

        Err(Error::Format(format!("'{input}' is not a valid DateTime")))
    }

    fn parse_naive(text: &str) -> Option<NaiveDateTime> {
        const DATE_TIME_FORMATS: [&str; 3] =
            ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%m/%d/%Y %H:%M:%S"];
        const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%m/%d/%Y"];

        DATE_TIME_FORMATS
            .iter()
            .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
            .or_else(|| {
                DATE_FORMATS.iter().find_map(|format| {
                    NaiveDate::parse_from_str(text, format)
                        .ok()
                        .map(|date| date.and_time(NaiveTime::MIN))
                })
            })
    }
}

impl PartialEq for DateTime {
    fn eq(&self, other: &Self) -> bool {
        self.ticks == other.ticks
    }
}

impl Eq for DateTime {}

impl PartialOrd for DateTime {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DateTime {
    fn cmp(&self, other: &Self) -> Ordering {
        self.ticks.cmp(&other.ticks)
    }
}

impl Hash for DateTime {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ticks.hash(state);
    }
}

impl fmt::Display for DateTime {
    /// Invariant culture general format, `MM/dd/yyyy HH:mm:ss`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_naive().format("%m/%d/%Y %H:%M:%S"))
    }
}

impl FromStr for DateTime {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

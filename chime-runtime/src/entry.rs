use crate::error::ValidationError;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Identifier issued by a [`TaskStore`](crate::TaskStore) when an entry is
/// added. Ids are never reused within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(u64);

impl EntryId {
    pub(crate) fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Local wall-clock instant with minute granularity.
///
/// The text form is always `yyyy-MM-dd HH:mm`; two instants are equal exactly
/// when their text forms are equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DueInstant(NaiveDateTime);

impl DueInstant {
    /// Parse the raw date (`yyyy-MM-dd`) and time (`HH:mm`) fields.
    ///
    /// Digit counts are strict (`2024-1-5` and `9:00` are rejected) and the
    /// date must exist in the calendar (`2024-02-30` is rejected).
    pub fn parse(date: &str, time: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidDateTime {
            date: date.to_string(),
            time: time.to_string(),
        };

        if !has_shape(date, "dddd-dd-dd") || !has_shape(time, "dd:dd") {
            return Err(invalid());
        }

        let day = NaiveDate::parse_from_str(date, DATE_FORMAT).map_err(|_| invalid())?;
        let clock = NaiveTime::parse_from_str(time, TIME_FORMAT).map_err(|_| invalid())?;
        Ok(Self(day.and_time(clock)))
    }

    /// Truncate a clock reading to the minute it falls in
    pub fn at_minute(at: NaiveDateTime) -> Self {
        let truncated = at
            .with_second(0)
            .and_then(|t| t.with_nanosecond(0))
            .unwrap_or(at);
        Self(truncated)
    }

    pub fn date(&self) -> NaiveDate {
        self.0.date()
    }

    pub fn time(&self) -> NaiveTime {
        self.0.time()
    }

    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

fn has_shape(value: &str, pattern: &str) -> bool {
    value.len() == pattern.len()
        && value
            .bytes()
            .zip(pattern.bytes())
            .all(|(c, p)| if p == b'd' { c.is_ascii_digit() } else { c == p })
}

impl fmt::Display for DueInstant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(DATE_TIME_FORMAT))
    }
}

impl FromStr for DueInstant {
    type Err = ValidationError;

    /// Parse the combined `yyyy-MM-dd HH:mm` form
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(' ') {
            Some((date, time)) => Self::parse(date, time),
            None => Err(ValidationError::InvalidDateTime {
                date: s.to_string(),
                time: String::new(),
            }),
        }
    }
}

impl Serialize for DueInstant {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for DueInstant {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

/// One reminder as held by the store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderEntry {
    pub id: EntryId,
    pub description: String,
    pub due: DueInstant,
    /// Set once a notification for this entry has been delivered
    pub fired: bool,
}

impl fmt::Display for ReminderEntry {
    /// Listing line, e.g. `Pay rent - 2024-01-01 at 09:00`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} - {} at {}",
            self.description,
            self.due.date().format(DATE_FORMAT),
            self.due.time().format(TIME_FORMAT)
        )
    }
}

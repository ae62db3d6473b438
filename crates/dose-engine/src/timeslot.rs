//! Time-of-day and weekday values used as slot coordinates.
//!
//! Times are whole minutes within a day and always render as zero-padded `HH:mm`.
//! Arithmetic wraps at midnight, so `23:55 + 10 min` is `00:05` on the same weekday.
//! Day names parse case-insensitively into a canonical [`Day`], which keeps the slot
//! registry and the reminder scanner agreeing on what "Monday" means.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{DoseError, Result};

/// Minutes the conflict resolver advances a dose time on each collision.
pub const SHIFT_MINUTES: i64 = 10;

const MINUTES_PER_DAY: i64 = 24 * 60;

/// A minute-resolution time of day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeOfDay(NaiveTime);

impl TimeOfDay {
    /// Build from an hour and minute, returning `None` when out of range.
    pub fn from_hm(hour: u32, minute: u32) -> Option<Self> {
        NaiveTime::from_hms_opt(hour, minute, 0).map(Self)
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn as_naive(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for TimeOfDay {
    /// Truncates seconds and sub-seconds.
    fn from(t: NaiveTime) -> Self {
        Self(NaiveTime::from_hms_opt(t.hour(), t.minute(), 0).unwrap_or(t))
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.hour(), self.minute())
    }
}

impl FromStr for TimeOfDay {
    type Err = DoseError;

    fn from_str(s: &str) -> Result<Self> {
        parse_time(s)
    }
}

impl TryFrom<String> for TimeOfDay {
    type Error = DoseError;

    fn try_from(s: String) -> Result<Self> {
        parse_time(&s)
    }
}

impl From<TimeOfDay> for String {
    fn from(t: TimeOfDay) -> Self {
        t.to_string()
    }
}

/// Parse an `H:mm` or `HH:mm` time string.
///
/// The hour is one or two digits in 0-23 and the minute is exactly two digits in 0-59.
/// Surrounding whitespace is ignored; any other shape (`9-30`, `9:5`, `24:00`, `+9:30`)
/// fails with [`DoseError::InvalidFormat`].
pub fn parse_time(s: &str) -> Result<TimeOfDay> {
    let invalid = || DoseError::InvalidFormat(s.to_string());
    let trimmed = s.trim();

    let (hour, minute) = trimmed.split_once(':').ok_or_else(invalid)?;
    let all_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
    if hour.is_empty() || hour.len() > 2 || minute.len() != 2 {
        return Err(invalid());
    }
    if !all_digits(hour) || !all_digits(minute) {
        return Err(invalid());
    }

    let hour: u32 = hour.parse().map_err(|_| invalid())?;
    let minute: u32 = minute.parse().map_err(|_| invalid())?;
    if hour > 23 || minute > 59 {
        return Err(invalid());
    }
    TimeOfDay::from_hm(hour, minute).ok_or_else(invalid)
}

/// Add `delta` minutes to `time`, wrapping around midnight.
///
/// Negative deltas move backwards. The result is always a valid time of day:
/// `add_minutes(23:55, 10) == 00:05`.
pub fn add_minutes(time: TimeOfDay, delta: i64) -> TimeOfDay {
    let current = i64::from(time.hour()) * 60 + i64::from(time.minute());
    let total = (current + delta).rem_euclid(MINUTES_PER_DAY);
    // total is in 0..1440, so both components are in range.
    TimeOfDay::from_hm((total / 60) as u32, (total % 60) as u32).unwrap_or(time)
}

/// A weekday, displayed by its full English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Day(Weekday);

impl Day {
    pub fn weekday(&self) -> Weekday {
        self.0
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl PartialOrd for Day {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Day {
    /// Monday-first week order.
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0
            .num_days_from_monday()
            .cmp(&other.0.num_days_from_monday())
    }
}

impl From<Weekday> for Day {
    fn from(w: Weekday) -> Self {
        Self(w)
    }
}

impl fmt::Display for Day {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Day {
    type Err = DoseError;

    /// Accepts full or three-letter names in any case (`monday`, `MON`, `Monday`).
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<Weekday>()
            .map(Self)
            .map_err(|_| DoseError::InvalidDay(s.to_string()))
    }
}

impl TryFrom<String> for Day {
    type Error = DoseError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<Day> for String {
    fn from(d: Day) -> Self {
        d.name().to_string()
    }
}

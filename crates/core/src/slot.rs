//! Hour-slot time model. A bookable day runs 06:00 to 24:00 in one-hour
//! increments; every schedule boundary must sit on a slot boundary.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{ScheduleError, ScheduleResult};

/// First hour of the bookable day.
pub const DAY_START_HOUR: u8 = 6;
/// Upper boundary of the bookable day. A block may end at 24:00 but the last
/// bookable start is 23:00.
pub const DAY_END_HOUR: u8 = 24;
/// Number of hour rows in a day column, labelled 06:00 through 24:00.
pub const SLOTS_PER_DAY: usize = (DAY_END_HOUR - DAY_START_HOUR + 1) as usize;

/// A slot-aligned time of day, serialized as `"HH:00"`.
///
/// `chrono::NaiveTime` cannot represent 24:00, which is a legal end boundary
/// here, so slot times carry the hour directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotTime(u8);

impl SlotTime {
    pub fn new(hour: u8) -> ScheduleResult<Self> {
        if !(DAY_START_HOUR..=DAY_END_HOUR).contains(&hour) {
            return Err(ScheduleError::Validation(format!(
                "hour {hour} is outside the bookable day ({DAY_START_HOUR}:00-{DAY_END_HOUR}:00)"
            )));
        }
        Ok(Self(hour))
    }

    pub fn hour(self) -> u8 {
        self.0
    }

    /// Zero-based row index in a day column (06:00 is row 0).
    pub fn slot_index(self) -> usize {
        (self.0 - DAY_START_HOUR) as usize
    }
}

impl fmt::Display for SlotTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for SlotTime {
    type Err = ScheduleError;

    fn from_str(s: &str) -> ScheduleResult<Self> {
        let (hour, minute) = s
            .split_once(':')
            .ok_or_else(|| ScheduleError::Validation(format!("invalid time {s:?}, expected HH:00")))?;
        let hour: u8 = hour
            .parse()
            .map_err(|_| ScheduleError::Validation(format!("invalid hour in {s:?}")))?;
        if minute != "00" {
            return Err(ScheduleError::Validation(format!(
                "time {s:?} is not aligned to an hour slot"
            )));
        }
        Self::new(hour)
    }
}

impl Serialize for SlotTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SlotTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|e: ScheduleError| D::Error::custom(e.to_string()))
    }
}

/// Validates a candidate `[start, end)` block: slot-aligned bounds are
/// enforced by `SlotTime` itself, so what remains is ordering and the
/// bookable-start rule.
pub fn validate_block(start: SlotTime, end: SlotTime) -> ScheduleResult<()> {
    if start >= end {
        return Err(ScheduleError::Validation(format!(
            "start time {start} must be before end time {end}"
        )));
    }
    if start.hour() >= DAY_END_HOUR {
        return Err(ScheduleError::Validation(format!(
            "start time {start} is past the last bookable slot"
        )));
    }
    Ok(())
}

/// Day-of-week index used by the week grid: 0 = Sunday .. 6 = Saturday.
pub fn day_of_week_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Fixed size of the month view: 6 rows of 7 days.
pub const MONTH_GRID_CELLS: usize = 42;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayStatus {
    /// At least one schedule on the day.
    Schedule,
    /// The day appears in the workout-record date list.
    Record,
    /// At least one externally synced schedule on the day.
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthCell {
    /// Day number within the month; `None` for leading/trailing filler cells.
    pub day: Option<u32>,
    pub statuses: BTreeSet<DayStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthGrid {
    pub year: i32,
    pub month: u32,
    /// Always exactly [`MONTH_GRID_CELLS`] cells, row-major, Sunday first.
    pub cells: Vec<MonthCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WeekCell {
    Empty,
    /// First slot of an appointment block; `span` counts the slots the block
    /// covers so renderers draw it once.
    Block {
        schedule_id: Uuid,
        subject: String,
        span: u8,
        confirmed: bool,
    },
    /// Slot visually occupied by an earlier block start.
    Continuation { schedule_id: Uuid },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekDay {
    pub date: NaiveDate,
    /// 0 = Sunday .. 6 = Saturday.
    pub day_index: u32,
    /// One cell per hour row, 06:00 through 24:00.
    pub cells: Vec<WeekCell>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekGrid {
    /// Sunday on/before the requested start date.
    pub week_start: NaiveDate,
    pub days: Vec<WeekDay>,
}

//! Calendar view builders.
//!
//! Both builders are pure functions over already-fetched data; the api layer
//! does the querying and hands rows in. The month grid reports per-day status
//! presence, the week grid lays schedules out as block/continuation cells.

use std::collections::{BTreeSet, HashSet};

use chrono::{Datelike, Duration, NaiveDate};

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::calendar::{
    DayStatus, MonthCell, MonthGrid, WeekCell, WeekDay, WeekGrid, MONTH_GRID_CELLS,
};
use crate::models::schedule::{Origin, Schedule};
use crate::slot::{day_of_week_index, SLOTS_PER_DAY};

/// Builds the fixed 42-cell month view. Cells outside the month carry no day
/// number and no statuses; in-month cells union one tag per category, so a
/// day with three PT schedules still shows a single `schedule` tag.
pub fn month_grid(
    year: i32,
    month: u32,
    schedules: &[Schedule],
    record_dates: &[NaiveDate],
) -> ScheduleResult<MonthGrid> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ScheduleError::Validation(format!("invalid month {year}-{month}")))?;
    let grid_start = first - Duration::days(day_of_week_index(first) as i64);

    let mut schedule_days = HashSet::new();
    let mut external_days = HashSet::new();
    for s in schedules {
        schedule_days.insert(s.date);
        if s.origin == Origin::External {
            external_days.insert(s.date);
        }
    }
    let record_days: HashSet<NaiveDate> = record_dates.iter().copied().collect();

    let cells = (0..MONTH_GRID_CELLS as i64)
        .map(|offset| {
            let date = grid_start + Duration::days(offset);
            if date.year() != year || date.month() != month {
                return MonthCell { day: None, statuses: BTreeSet::new() };
            }
            let mut statuses = BTreeSet::new();
            if schedule_days.contains(&date) {
                statuses.insert(DayStatus::Schedule);
            }
            if record_days.contains(&date) {
                statuses.insert(DayStatus::Record);
            }
            if external_days.contains(&date) {
                statuses.insert(DayStatus::External);
            }
            MonthCell { day: Some(date.day()), statuses }
        })
        .collect();

    Ok(MonthGrid { year, month, cells })
}

/// Sunday on/before the given date.
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    date - Duration::days(day_of_week_index(date) as i64)
}

/// Builds the 7-day x 19-slot week view. A schedule becomes a block start at
/// its start hour spanning `end - start` slots; the slots it covers become
/// continuation cells. The repository's no-overlap invariant guarantees the
/// blocks of one day never collide, so placement is a single pass.
pub fn week_grid(week_start: NaiveDate, schedules: &[Schedule]) -> WeekGrid {
    let week_start = week_start_sunday(week_start);

    let days = (0..7)
        .map(|i| {
            let date = week_start + Duration::days(i);
            let mut cells = vec![WeekCell::Empty; SLOTS_PER_DAY];

            for s in schedules.iter().filter(|s| s.date == date) {
                let start = s.start_time.slot_index();
                let span = (s.end_time.hour() - s.start_time.hour()).max(1);
                cells[start] = WeekCell::Block {
                    schedule_id: s.id,
                    subject: s.subject.display_name().to_string(),
                    span,
                    confirmed: s.confirmed,
                };
                for cell in cells
                    .iter_mut()
                    .take(s.end_time.slot_index())
                    .skip(start + 1)
                {
                    *cell = WeekCell::Continuation { schedule_id: s.id };
                }
            }

            WeekDay { date, day_index: day_of_week_index(date), cells }
        })
        .collect();

    WeekGrid { week_start, days }
}

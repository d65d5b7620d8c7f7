pub mod directory;
pub mod matching;
pub mod records;
pub mod schedule;

use chrono::NaiveDate;
use ptbook_core::errors::{ScheduleError, ScheduleResult};

pub(crate) fn db_err(e: sqlx::Error) -> ScheduleError {
    ScheduleError::Database(e.into())
}

/// Half-open `[first, next_first)` date range of a calendar month.
pub(crate) fn month_bounds(year: i32, month: u32) -> ScheduleResult<(NaiveDate, NaiveDate)> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| ScheduleError::Validation(format!("invalid month {year}-{month}")))?;
    let next_first = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| ScheduleError::Validation(format!("invalid month {year}-{month}")))?;
    Ok((first, next_first))
}

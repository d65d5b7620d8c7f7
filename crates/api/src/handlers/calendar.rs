//! # Calendar Handlers
//!
//! Thin I/O wrappers around the pure calendar builders: they fetch schedules
//! and workout-record dates, then hand everything to
//! `ptbook_core::calendar`. The builders do no querying themselves.

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use ptbook_core::calendar;
use ptbook_core::collaborators::WorkoutRecordStore;
use ptbook_core::errors::ScheduleError;
use ptbook_core::models::calendar::{MonthGrid, WeekGrid};
use ptbook_core::models::schedule::Schedule;

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the month view; exactly one of `trainer_id` /
/// `member_id` scopes the calendar.
#[derive(Debug, Deserialize)]
pub struct MonthViewQuery {
    pub trainer_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub year: i32,
    pub month: u32,
}

#[derive(Debug, Deserialize)]
pub struct WeekViewQuery {
    pub trainer_id: Uuid,
    /// Any date in the week; normalized to the Sunday on/before it.
    pub week_start: NaiveDate,
}

#[axum::debug_handler]
pub async fn month_view(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<MonthViewQuery>,
) -> Result<Json<MonthGrid>, AppError> {
    let (owner_id, by_date) = match (query.trainer_id, query.member_id) {
        (Some(trainer_id), None) => (
            trainer_id,
            ptbook_db::repositories::schedule::list_by_trainer_and_month(
                &state.db_pool,
                trainer_id,
                query.year,
                query.month,
            )
            .await?,
        ),
        (None, Some(member_id)) => (
            member_id,
            ptbook_db::repositories::schedule::list_by_member_and_month(
                &state.db_pool,
                member_id,
                query.year,
                query.month,
            )
            .await?,
        ),
        _ => {
            return Err(AppError(ScheduleError::Validation(
                "exactly one of trainer_id or member_id must be provided".to_string(),
            )))
        }
    };

    let schedules: Vec<Schedule> = by_date.into_values().flatten().collect();
    let record_dates = state
        .records
        .list_record_dates(owner_id, query.year, query.month)
        .await?;

    let grid = calendar::month_grid(query.year, query.month, &schedules, &record_dates)?;
    Ok(Json(grid))
}

#[axum::debug_handler]
pub async fn week_view(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<WeekViewQuery>,
) -> Result<Json<WeekGrid>, AppError> {
    let week_start = calendar::week_start_sunday(query.week_start);
    let schedules = ptbook_db::repositories::schedule::list_by_trainer_and_range(
        &state.db_pool,
        query.trainer_id,
        week_start,
        week_start + Duration::days(7),
    )
    .await?;

    Ok(Json(calendar::week_grid(week_start, &schedules)))
}

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use ptbook_core::collaborators::MemberDirectory;
use ptbook_core::confirmation;
use ptbook_core::errors::ScheduleError;
use ptbook_core::models::schedule::{
    ConfirmScheduleResponse, CreateScheduleRequest, GetScheduleResponse, ScheduleDatesResponse,
    ScheduleResponse, Subject, UpdateScheduleRequest,
};

use crate::{middleware::error_handling::AppError, ApiState};

/// Query parameters for the schedule list endpoint; exactly one of
/// `trainer_id` / `member_id` scopes the query.
#[derive(Debug, Deserialize)]
pub struct ListSchedulesQuery {
    pub trainer_id: Option<Uuid>,
    pub member_id: Option<Uuid>,
    pub date: NaiveDate,
}

#[axum::debug_handler]
pub async fn create_schedule(
    State(state): State<Arc<ApiState>>,
    Json(payload): Json<CreateScheduleRequest>,
) -> Result<(StatusCode, Json<ScheduleResponse>), AppError> {
    // Resolve the subject once at write time; readers never branch on a
    // nullable member id afterwards
    let subject = resolve_subject(
        &state,
        payload.trainer_id,
        payload.member_id,
        payload.display_name.clone(),
    )
    .await?;

    let schedule = ptbook_db::repositories::schedule::create_schedule(
        &state.db_pool,
        payload.trainer_id,
        payload.date,
        payload.start_time,
        payload.end_time,
        &subject,
        payload.content.as_deref().unwrap_or(""),
        payload.origin,
    )
    .await?;

    Ok((StatusCode::CREATED, Json(schedule.into())))
}

#[axum::debug_handler]
pub async fn get_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<GetScheduleResponse>, AppError> {
    let schedule = ptbook_db::repositories::schedule::get_schedule_by_id(&state.db_pool, id)
        .await?
        .ok_or_else(|| ScheduleError::NotFound(format!("Schedule with ID {id} not found")))?;

    let status = confirmation::describe_status(&schedule, Utc::now().date_naive());
    Ok(Json(GetScheduleResponse {
        schedule: schedule.into(),
        status,
    }))
}

#[axum::debug_handler]
pub async fn update_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateScheduleRequest>,
) -> Result<Json<ScheduleResponse>, AppError> {
    let schedule =
        ptbook_db::repositories::schedule::update_schedule(&state.db_pool, id, &payload).await?;
    Ok(Json(schedule.into()))
}

#[axum::debug_handler]
pub async fn delete_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    ptbook_db::repositories::schedule::delete_schedule(&state.db_pool, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[axum::debug_handler]
pub async fn list_schedules(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListSchedulesQuery>,
) -> Result<Json<Vec<ScheduleResponse>>, AppError> {
    let schedules = match (query.trainer_id, query.member_id) {
        (Some(trainer_id), None) => {
            ptbook_db::repositories::schedule::list_by_trainer_and_date(
                &state.db_pool,
                trainer_id,
                query.date,
            )
            .await?
        }
        (None, Some(member_id)) => {
            ptbook_db::repositories::schedule::list_by_member_and_date(
                &state.db_pool,
                member_id,
                query.date,
            )
            .await?
        }
        _ => {
            return Err(AppError(ScheduleError::Validation(
                "exactly one of trainer_id or member_id must be provided".to_string(),
            )))
        }
    };

    Ok(Json(schedules.into_iter().map(ScheduleResponse::from).collect()))
}

#[axum::debug_handler]
pub async fn list_member_dates(
    State(state): State<Arc<ApiState>>,
    Path(member_id): Path<Uuid>,
) -> Result<Json<ScheduleDatesResponse>, AppError> {
    let dates =
        ptbook_db::repositories::schedule::list_dates_by_member(&state.db_pool, member_id).await?;
    Ok(Json(ScheduleDatesResponse { dates }))
}

#[axum::debug_handler]
pub async fn confirm_schedule(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ConfirmScheduleResponse>, AppError> {
    let today = Utc::now().date_naive();
    let (schedule, consumed) =
        ptbook_db::repositories::schedule::confirm_attendance(&state.db_pool, id, today).await?;

    Ok(Json(ConfirmScheduleResponse {
        id: schedule.id,
        confirmed: schedule.confirmed,
        remaining_sessions: consumed.map(|m| m.remaining_sessions),
    }))
}

async fn resolve_subject(
    state: &ApiState,
    trainer_id: Uuid,
    member_id: Option<Uuid>,
    display_name: Option<String>,
) -> Result<Subject, AppError> {
    match member_id {
        Some(member_id) => {
            if !state.directory.is_active_pair(trainer_id, member_id).await? {
                return Err(AppError(ScheduleError::Validation(format!(
                    "member {member_id} is not an active client of this trainer"
                ))));
            }
            let display_name = state.directory.resolve_display_name(member_id).await?;
            Ok(Subject::Registered { member_id, display_name })
        }
        None => {
            let display_name = display_name.filter(|n| !n.trim().is_empty()).ok_or_else(|| {
                AppError(ScheduleError::Validation(
                    "either member_id or display_name is required".to_string(),
                ))
            })?;
            Ok(Subject::Adhoc { display_name })
        }
    }
}

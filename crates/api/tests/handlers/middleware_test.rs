use axum::body::to_bytes;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use ptbook_api::middleware::error_handling::AppError;
use ptbook_core::errors::ScheduleError;

#[test]
fn not_found_maps_to_404() {
    let response = AppError(ScheduleError::NotFound("Schedule not found".into())).into_response();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[test]
fn validation_maps_to_422() {
    let response = AppError(ScheduleError::Validation("bad time".into())).into_response();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[test]
fn business_rule_rejections_map_to_409() {
    let conflict = AppError(ScheduleError::Conflict { conflicting: vec![Uuid::new_v4()] });
    assert_eq!(conflict.into_response().status(), StatusCode::CONFLICT);

    let too_early = AppError(ScheduleError::TooEarly { days_until: 2 });
    assert_eq!(too_early.into_response().status(), StatusCode::CONFLICT);

    let no_sessions = AppError(ScheduleError::InsufficientSessions);
    assert_eq!(no_sessions.into_response().status(), StatusCode::CONFLICT);
}

#[test]
fn infrastructure_errors_map_to_500() {
    let response = AppError(ScheduleError::Database(eyre::eyre!("connection reset"))).into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn conflict_body_carries_the_colliding_ids() {
    let id = Uuid::new_v4();
    let response = AppError(ScheduleError::Conflict { conflicting: vec![id] }).into_response();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["conflicting"], serde_json::json!([id.to_string()]));
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn error_bodies_are_single_message_json() {
    let response = AppError(ScheduleError::InsufficientSessions).into_response();

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body, serde_json::json!({ "error": "No sessions remaining" }));
}

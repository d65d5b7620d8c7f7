//! # Error Handling Middleware
//!
//! Maps the engine's error taxonomy to HTTP status codes and JSON error
//! responses so every handler surfaces the same shape: a single
//! human-readable message per category, with no storage detail leaked.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use ptbook_core::errors::ScheduleError;
use serde_json::json;

/// Application error wrapper that provides HTTP status code mapping
///
/// `AppError` wraps `ScheduleError` and implements `IntoResponse` to convert
/// it into an HTTP response with the appropriate status code and JSON body.
#[derive(Debug)]
pub struct AppError(pub ScheduleError);

/// Converts application errors to HTTP responses
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Map error types to HTTP status codes
        let status = match &self.0 {
            ScheduleError::NotFound(_) => StatusCode::NOT_FOUND,
            ScheduleError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ScheduleError::Conflict { .. } => StatusCode::CONFLICT,
            ScheduleError::TooEarly { .. } => StatusCode::CONFLICT,
            ScheduleError::InsufficientSessions => StatusCode::CONFLICT,
            ScheduleError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ScheduleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Booking conflicts carry the colliding schedule ids so the caller
        // can show "already booked"
        let message = self.0.to_string();
        let body = match &self.0 {
            ScheduleError::Conflict { conflicting } => {
                Json(json!({ "error": message, "conflicting": conflicting }))
            }
            _ => Json(json!({ "error": message })),
        };

        (status, body).into_response()
    }
}

/// Allows using `?` with functions returning `Result<T, ScheduleError>`
/// inside handlers that return `Result<T, AppError>`.
impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError(err)
    }
}

/// Wraps infrastructure error reports in the `Database` category.
impl From<eyre::Report> for AppError {
    fn from(err: eyre::Report) -> Self {
        AppError(ScheduleError::Database(err))
    }
}

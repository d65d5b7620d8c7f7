use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Booking conflict with {} existing schedule(s)", conflicting.len())]
    Conflict { conflicting: Vec<Uuid> },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Appointment is {days_until} day(s) away and cannot be confirmed yet")]
    TooEarly { days_until: i64 },

    #[error("No sessions remaining")]
    InsufficientSessions,

    #[error("Database error: {0}")]
    Database(#[from] eyre::Report),

    #[error("Internal error: {0}")]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

pub type ScheduleResult<T> = Result<T, ScheduleError>;

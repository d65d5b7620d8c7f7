//! Confirmation rules: Scheduled -> Confirmed, and nothing else.
//!
//! The rules here are pure; the storage layer applies the resulting action
//! inside one transaction so that marking a schedule confirmed and consuming
//! a ledger session succeed or fail together.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::{ScheduleError, ScheduleResult};
use crate::models::schedule::{Origin, Schedule};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmAction {
    /// Confirming twice is a no-op, not an error.
    AlreadyConfirmed,
    /// Go ahead; when `consume_for` carries a member id, one session must be
    /// consumed from the active matching for (trainer, member).
    Proceed { consume_for: Option<Uuid> },
}

/// Transition guard. A schedule may be confirmed on its date or later, never
/// before. External schedules and ad-hoc subjects confirm without touching
/// the ledger.
pub fn check_confirmable(schedule: &Schedule, today: NaiveDate) -> ScheduleResult<ConfirmAction> {
    if schedule.confirmed {
        return Ok(ConfirmAction::AlreadyConfirmed);
    }

    let days_until = (schedule.date - today).num_days();
    if days_until > 0 {
        return Err(ScheduleError::TooEarly { days_until });
    }

    let consume_for = match schedule.origin {
        Origin::Internal => schedule.subject.member_id(),
        Origin::External => None,
    };
    Ok(ConfirmAction::Proceed { consume_for })
}

/// Status text for calendars and detail views. Purely informational.
pub fn describe_status(schedule: &Schedule, today: NaiveDate) -> String {
    if schedule.confirmed {
        return "already confirmed".to_string();
    }
    let days_until = (schedule.date - today).num_days();
    if days_until <= 0 {
        "today".to_string()
    } else {
        format!("{days_until} days remaining")
    }
}

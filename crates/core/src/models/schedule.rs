use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::slot::SlotTime;

/// Who a schedule is booked for. Resolved once at write time so readers never
/// branch on a nullable member id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Subject {
    Registered { member_id: Uuid, display_name: String },
    Adhoc { display_name: String },
}

impl Subject {
    pub fn display_name(&self) -> &str {
        match self {
            Subject::Registered { display_name, .. } => display_name,
            Subject::Adhoc { display_name } => display_name,
        }
    }

    pub fn member_id(&self) -> Option<Uuid> {
        match self {
            Subject::Registered { member_id, .. } => Some(*member_id),
            Subject::Adhoc { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    #[default]
    Internal,
    /// Synced from an outside calendar; takes part in conflict checks and
    /// calendar display but never in session-ledger accounting.
    External,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schedule {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub subject: Subject,
    pub date: NaiveDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub content: String,
    pub confirmed: bool,
    pub origin: Origin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateScheduleRequest {
    pub trainer_id: Uuid,
    pub date: NaiveDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub member_id: Option<Uuid>,
    pub display_name: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub origin: Origin,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateScheduleRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<SlotTime>,
    pub end_time: Option<SlotTime>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleResponse {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub subject: Subject,
    pub date: NaiveDate,
    pub start_time: SlotTime,
    pub end_time: SlotTime,
    pub content: String,
    pub confirmed: bool,
    pub origin: Origin,
}

impl From<Schedule> for ScheduleResponse {
    fn from(s: Schedule) -> Self {
        Self {
            id: s.id,
            trainer_id: s.trainer_id,
            subject: s.subject,
            date: s.date,
            start_time: s.start_time,
            end_time: s.end_time,
            content: s.content,
            confirmed: s.confirmed,
            origin: s.origin,
        }
    }
}

/// Detail view: the schedule plus the human-readable confirmation status
/// shown on the appointment detail screen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetScheduleResponse {
    #[serde(flatten)]
    pub schedule: ScheduleResponse,
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfirmScheduleResponse {
    pub id: Uuid,
    pub confirmed: bool,
    /// Sessions left on the matching after this confirmation, when one was
    /// consumed.
    pub remaining_sessions: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleDatesResponse {
    pub dates: Vec<NaiveDate>,
}

use chrono::{DateTime, NaiveDate, Utc};
use ptbook_core::errors::{ScheduleError, ScheduleResult};
use ptbook_core::models::matching::Matching;
use ptbook_core::models::schedule::{Origin, Schedule, Subject};
use ptbook_core::slot::SlotTime;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct DbSchedule {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub member_id: Option<Uuid>,
    pub display_name: String,
    pub date: NaiveDate,
    pub start_hour: i16,
    pub end_hour: i16,
    pub content: String,
    pub confirmed: bool,
    pub origin: String,
    pub created_at: DateTime<Utc>,
}

impl DbSchedule {
    pub fn into_domain(self) -> ScheduleResult<Schedule> {
        let subject = match self.member_id {
            Some(member_id) => Subject::Registered {
                member_id,
                display_name: self.display_name,
            },
            None => Subject::Adhoc {
                display_name: self.display_name,
            },
        };
        let origin = parse_origin(&self.origin)?;

        Ok(Schedule {
            id: self.id,
            trainer_id: self.trainer_id,
            subject,
            date: self.date,
            start_time: SlotTime::new(self.start_hour as u8)?,
            end_time: SlotTime::new(self.end_hour as u8)?,
            content: self.content,
            confirmed: self.confirmed,
            origin,
        })
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct DbMatching {
    pub id: Uuid,
    pub trainer_id: Uuid,
    pub member_id: Uuid,
    pub total_sessions: i32,
    pub remaining_sessions: i32,
    pub complete: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DbMatching> for Matching {
    fn from(m: DbMatching) -> Self {
        Matching {
            id: m.id,
            trainer_id: m.trainer_id,
            member_id: m.member_id,
            total_sessions: m.total_sessions,
            remaining_sessions: m.remaining_sessions,
            complete: m.complete,
        }
    }
}

pub fn origin_to_str(origin: Origin) -> &'static str {
    match origin {
        Origin::Internal => "internal",
        Origin::External => "external",
    }
}

fn parse_origin(s: &str) -> ScheduleResult<Origin> {
    match s {
        "internal" => Ok(Origin::Internal),
        "external" => Ok(Origin::External),
        other => Err(ScheduleError::Internal(
            format!("unknown schedule origin {other:?}").into(),
        )),
    }
}

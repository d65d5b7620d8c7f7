//! Narrow interfaces over external collaborators. The engine consumes these
//! read-only; Postgres adapters live in the db crate and mocks in its `mock`
//! module.

use async_trait::async_trait;
use chrono::NaiveDate;
use uuid::Uuid;

use crate::errors::ScheduleResult;

#[async_trait]
pub trait MemberDirectory: Send + Sync {
    async fn resolve_display_name(&self, member_id: Uuid) -> ScheduleResult<String>;

    /// Whether the pair has a completed matching, per the onboarding flow.
    async fn is_active_pair(&self, trainer_id: Uuid, member_id: Uuid) -> ScheduleResult<bool>;
}

#[async_trait]
pub trait WorkoutRecordStore: Send + Sync {
    /// Distinct dates in the month on which the owner (trainer or member)
    /// logged a workout record. Input to the month grid's `record` tag.
    async fn list_record_dates(
        &self,
        owner_id: Uuid,
        year: i32,
        month: u32,
    ) -> ScheduleResult<Vec<NaiveDate>>;
}

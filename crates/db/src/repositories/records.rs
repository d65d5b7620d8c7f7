use async_trait::async_trait;
use chrono::NaiveDate;
use ptbook_core::collaborators::WorkoutRecordStore;
use ptbook_core::errors::ScheduleResult;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::{db_err, month_bounds};

/// Read-only adapter over the workout-record store owned by the wider
/// application. Feeds the month grid's `record` status tag.
pub struct PgWorkoutRecordStore {
    pool: Pool<Postgres>,
}

impl PgWorkoutRecordStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WorkoutRecordStore for PgWorkoutRecordStore {
    async fn list_record_dates(
        &self,
        owner_id: Uuid,
        year: i32,
        month: u32,
    ) -> ScheduleResult<Vec<NaiveDate>> {
        let (from, until) = month_bounds(year, month)?;
        sqlx::query_scalar::<_, NaiveDate>(
            r#"
            SELECT DISTINCT record_date
            FROM workout_records
            WHERE owner_id = $1 AND record_date >= $2 AND record_date < $3
            ORDER BY record_date
            "#,
        )
        .bind(owner_id)
        .bind(from)
        .bind(until)
        .fetch_all(&self.pool)
        .await
        .map_err(db_err)
    }
}

use async_trait::async_trait;
use ptbook_core::collaborators::MemberDirectory;
use ptbook_core::errors::{ScheduleError, ScheduleResult};
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::db_err;

/// Read-only adapter over the member directory owned by the wider
/// application.
pub struct PgMemberDirectory {
    pool: Pool<Postgres>,
}

impl PgMemberDirectory {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MemberDirectory for PgMemberDirectory {
    async fn resolve_display_name(&self, member_id: Uuid) -> ScheduleResult<String> {
        sqlx::query_scalar::<_, String>("SELECT name FROM members WHERE id = $1")
            .bind(member_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_err)?
            .ok_or_else(|| ScheduleError::NotFound(format!("Member with ID {member_id} not found")))
    }

    async fn is_active_pair(&self, trainer_id: Uuid, member_id: Uuid) -> ScheduleResult<bool> {
        sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM matchings
                WHERE trainer_id = $1 AND member_id = $2 AND complete = TRUE
            )
            "#,
        )
        .bind(trainer_id)
        .bind(member_id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_err)
    }
}

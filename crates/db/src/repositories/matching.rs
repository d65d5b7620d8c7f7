use ptbook_core::errors::{ScheduleError, ScheduleResult};
use ptbook_core::models::matching::Matching;
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use super::db_err;
use crate::models::DbMatching;

/// The confirmed (complete) matching for a trainer/member pair. The external
/// onboarding flow keeps at most one of these active per pair.
pub async fn get_active_matching(
    pool: &Pool<Postgres>,
    trainer_id: Uuid,
    member_id: Uuid,
) -> ScheduleResult<Option<Matching>> {
    let mut tx = pool.begin().await.map_err(db_err)?;
    let matching = get_active_matching_in_tx(&mut tx, trainer_id, member_id).await?;
    tx.commit().await.map_err(db_err)?;
    Ok(matching)
}

pub(crate) async fn get_active_matching_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    trainer_id: Uuid,
    member_id: Uuid,
) -> ScheduleResult<Option<Matching>> {
    let row = sqlx::query_as::<_, DbMatching>(
        r#"
        SELECT id, trainer_id, member_id, total_sessions, remaining_sessions, complete, created_at
        FROM matchings
        WHERE trainer_id = $1 AND member_id = $2 AND complete = TRUE
        ORDER BY created_at DESC
        LIMIT 1
        "#,
    )
    .bind(trainer_id)
    .bind(member_id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    Ok(row.map(Matching::from))
}

/// Burns exactly one prepaid session. The guarded UPDATE is the floor check:
/// zero rows touched means either the ledger is empty or the matching does
/// not exist, distinguished afterwards.
pub async fn consume_session(pool: &Pool<Postgres>, id: Uuid) -> ScheduleResult<Matching> {
    let mut tx = pool.begin().await.map_err(db_err)?;
    let matching = consume_session_in_tx(&mut tx, id).await?;
    tx.commit().await.map_err(db_err)?;
    Ok(matching)
}

pub(crate) async fn consume_session_in_tx(
    tx: &mut Transaction<'_, Postgres>,
    id: Uuid,
) -> ScheduleResult<Matching> {
    let row = sqlx::query_as::<_, DbMatching>(
        r#"
        UPDATE matchings
        SET remaining_sessions = remaining_sessions - 1
        WHERE id = $1 AND remaining_sessions > 0
        RETURNING id, trainer_id, member_id, total_sessions, remaining_sessions, complete, created_at
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await
    .map_err(db_err)?;

    let exists = match &row {
        Some(_) => true,
        None => sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM matchings WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&mut **tx)
        .await
        .map_err(db_err)?,
    };

    let matching = settle_consumption(id, row, exists)?;
    tracing::debug!(
        "Consumed session on matching {}: {} remaining",
        id, matching.remaining_sessions
    );
    Ok(matching)
}

/// Settles the guarded-UPDATE outcome. A returned row is the decremented
/// matching; no row means the guard skipped it, and whether the matching
/// exists decides between an exhausted ledger and an unknown id.
fn settle_consumption(
    id: Uuid,
    row: Option<DbMatching>,
    exists: bool,
) -> ScheduleResult<Matching> {
    match row {
        Some(row) => Ok(Matching::from(row)),
        None if exists => Err(ScheduleError::InsufficientSessions),
        None => Err(ScheduleError::NotFound(format!("Matching with ID {id} not found"))),
    }
}

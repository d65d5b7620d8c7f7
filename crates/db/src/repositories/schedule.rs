use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use chrono::NaiveDate;
use ptbook_core::confirmation::{self, ConfirmAction};
use ptbook_core::conflict;
use ptbook_core::errors::{ScheduleError, ScheduleResult};
use ptbook_core::models::matching::Matching;
use ptbook_core::models::schedule::{Origin, Schedule, Subject, UpdateScheduleRequest};
use ptbook_core::slot::{self, SlotTime};
use sqlx::{Pool, Postgres, Transaction};
use uuid::Uuid;

use super::{db_err, matching, month_bounds};

/// Bounded retries for the storage-level write race: a unique-index collision
/// between two concurrent inserts is an infrastructure artifact, so the
/// conflict check is re-evaluated before surfacing anything to the caller.
const WRITE_RETRY_ATTEMPTS: u32 = 3;

pub async fn create_schedule(
    pool: &Pool<Postgres>,
    trainer_id: Uuid,
    date: NaiveDate,
    start_time: SlotTime,
    end_time: SlotTime,
    subject: &Subject,
    content: &str,
    origin: Origin,
) -> ScheduleResult<Schedule> {
    slot::validate_block(start_time, end_time)?;

    tracing::debug!(
        "Creating schedule: trainer={}, date={}, block={}-{}",
        trainer_id, date, start_time, end_time
    );

    let mut attempt = 0;
    loop {
        attempt += 1;
        let result =
            try_create(pool, trainer_id, date, start_time, end_time, subject, content, origin)
                .await;
        match result {
            Err(ref e) if attempt < WRITE_RETRY_ATTEMPTS && is_unique_violation(e) => {
                tracing::debug!(
                    "Concurrent insert for trainer={} date={}, retrying (attempt {})",
                    trainer_id, date, attempt
                );
            }
            result => return result,
        }
    }
}

async fn try_create(
    pool: &Pool<Postgres>,
    trainer_id: Uuid,
    date: NaiveDate,
    start_time: SlotTime,
    end_time: SlotTime,
    subject: &Subject,
    content: &str,
    origin: Origin,
) -> ScheduleResult<Schedule> {
    let mut tx = pool.begin().await.map_err(db_err)?;
    lock_trainer_day(&mut tx, trainer_id, date).await?;

    let siblings = siblings_for_day(&mut tx, trainer_id, date).await?;
    let conflicting = conflict::find_conflicts(&siblings, start_time, end_time, None);
    if !conflicting.is_empty() {
        return Err(ScheduleError::Conflict { conflicting });
    }

    let row = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        INSERT INTO schedules (id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, FALSE, $9)
        RETURNING id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(trainer_id)
    .bind(subject.member_id())
    .bind(subject.display_name())
    .bind(date)
    .bind(start_time.hour() as i16)
    .bind(end_time.hour() as i16)
    .bind(content)
    .bind(crate::models::origin_to_str(origin))
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;

    let schedule = row.into_domain()?;
    tracing::debug!("Schedule created successfully: id={}", schedule.id);
    Ok(schedule)
}

pub async fn update_schedule(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &UpdateScheduleRequest,
) -> ScheduleResult<Schedule> {
    let mut attempt = 0;
    loop {
        attempt += 1;
        let result = try_update(pool, id, patch).await;
        match result {
            Err(ref e) if attempt < WRITE_RETRY_ATTEMPTS && is_unique_violation(e) => {
                tracing::debug!("Concurrent write on schedule {}, retrying (attempt {})", id, attempt);
            }
            result => return result,
        }
    }
}

async fn try_update(
    pool: &Pool<Postgres>,
    id: Uuid,
    patch: &UpdateScheduleRequest,
) -> ScheduleResult<Schedule> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let current = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        SELECT id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        FROM schedules
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| ScheduleError::NotFound(format!("Schedule with ID {id} not found")))?
    .into_domain()?;

    let date = patch.date.unwrap_or(current.date);
    let start_time = patch.start_time.unwrap_or(current.start_time);
    let end_time = patch.end_time.unwrap_or(current.end_time);
    let content = patch.content.as_deref().unwrap_or(&current.content);
    slot::validate_block(start_time, end_time)?;

    let time_changed = date != current.date
        || start_time != current.start_time
        || end_time != current.end_time;
    if time_changed {
        // Re-run the conflict check against the sibling set excluding this
        // schedule, on the (possibly new) target day.
        lock_trainer_day(&mut tx, current.trainer_id, date).await?;
        let siblings = siblings_for_day(&mut tx, current.trainer_id, date).await?;
        let conflicting = conflict::find_conflicts(&siblings, start_time, end_time, Some(id));
        if !conflicting.is_empty() {
            return Err(ScheduleError::Conflict { conflicting });
        }
    }

    let row = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        UPDATE schedules
        SET date = $2, start_hour = $3, end_hour = $4, content = $5
        WHERE id = $1
        RETURNING id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        "#,
    )
    .bind(id)
    .bind(date)
    .bind(start_time.hour() as i16)
    .bind(end_time.hour() as i16)
    .bind(content)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?;

    tx.commit().await.map_err(db_err)?;
    row.into_domain()
}

pub async fn delete_schedule(pool: &Pool<Postgres>, id: Uuid) -> ScheduleResult<()> {
    let deleted = sqlx::query("DELETE FROM schedules WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await
        .map_err(db_err)?;

    if deleted.rows_affected() == 0 {
        return Err(ScheduleError::NotFound(format!("Schedule with ID {id} not found")));
    }
    tracing::debug!("Schedule deleted: id={}", id);
    Ok(())
}

pub async fn get_schedule_by_id(
    pool: &Pool<Postgres>,
    id: Uuid,
) -> ScheduleResult<Option<Schedule>> {
    let row = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        SELECT id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        FROM schedules
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
    .map_err(db_err)?;

    row.map(crate::models::DbSchedule::into_domain).transpose()
}

pub async fn list_by_trainer_and_date(
    pool: &Pool<Postgres>,
    trainer_id: Uuid,
    date: NaiveDate,
) -> ScheduleResult<Vec<Schedule>> {
    let rows = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        SELECT id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        FROM schedules
        WHERE trainer_id = $1 AND date = $2
        ORDER BY start_hour
        "#,
    )
    .bind(trainer_id)
    .bind(date)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    rows.into_iter().map(crate::models::DbSchedule::into_domain).collect()
}

pub async fn list_by_trainer_and_range(
    pool: &Pool<Postgres>,
    trainer_id: Uuid,
    from: NaiveDate,
    until: NaiveDate,
) -> ScheduleResult<Vec<Schedule>> {
    let rows = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        SELECT id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        FROM schedules
        WHERE trainer_id = $1 AND date >= $2 AND date < $3
        ORDER BY date, start_hour
        "#,
    )
    .bind(trainer_id)
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    rows.into_iter().map(crate::models::DbSchedule::into_domain).collect()
}

pub async fn list_by_trainer_and_month(
    pool: &Pool<Postgres>,
    trainer_id: Uuid,
    year: i32,
    month: u32,
) -> ScheduleResult<BTreeMap<NaiveDate, Vec<Schedule>>> {
    let (from, until) = month_bounds(year, month)?;
    let schedules = list_by_trainer_and_range(pool, trainer_id, from, until).await?;
    Ok(group_by_date(schedules))
}

pub async fn list_by_member_and_date(
    pool: &Pool<Postgres>,
    member_id: Uuid,
    date: NaiveDate,
) -> ScheduleResult<Vec<Schedule>> {
    let rows = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        SELECT id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        FROM schedules
        WHERE member_id = $1 AND date = $2
        ORDER BY start_hour
        "#,
    )
    .bind(member_id)
    .bind(date)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    rows.into_iter().map(crate::models::DbSchedule::into_domain).collect()
}

pub async fn list_by_member_and_month(
    pool: &Pool<Postgres>,
    member_id: Uuid,
    year: i32,
    month: u32,
) -> ScheduleResult<BTreeMap<NaiveDate, Vec<Schedule>>> {
    let (from, until) = month_bounds(year, month)?;
    let rows = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        SELECT id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        FROM schedules
        WHERE member_id = $1 AND date >= $2 AND date < $3
        ORDER BY date, start_hour
        "#,
    )
    .bind(member_id)
    .bind(from)
    .bind(until)
    .fetch_all(pool)
    .await
    .map_err(db_err)?;

    let schedules: Vec<Schedule> = rows
        .into_iter()
        .map(crate::models::DbSchedule::into_domain)
        .collect::<ScheduleResult<_>>()?;
    Ok(group_by_date(schedules))
}

/// Distinct dates with at least one schedule for the member; lets the member
/// calendar render dots without loading full records.
pub async fn list_dates_by_member(
    pool: &Pool<Postgres>,
    member_id: Uuid,
) -> ScheduleResult<Vec<NaiveDate>> {
    sqlx::query_scalar::<_, NaiveDate>(
        r#"
        SELECT DISTINCT date
        FROM schedules
        WHERE member_id = $1
        ORDER BY date
        "#,
    )
    .bind(member_id)
    .fetch_all(pool)
    .await
    .map_err(db_err)
}

/// Applies the Scheduled -> Confirmed transition. Loads the schedule under a
/// row lock, runs the pure confirmation guard, consumes one ledger session
/// when the guard asks for it, and persists the flag — all in one
/// transaction, so a ledger failure leaves the schedule unconfirmed.
pub async fn confirm_attendance(
    pool: &Pool<Postgres>,
    id: Uuid,
    today: NaiveDate,
) -> ScheduleResult<(Schedule, Option<Matching>)> {
    let mut tx = pool.begin().await.map_err(db_err)?;

    let schedule = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        SELECT id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        FROM schedules
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await
    .map_err(db_err)?
    .ok_or_else(|| ScheduleError::NotFound(format!("Schedule with ID {id} not found")))?
    .into_domain()?;

    let consume_for = match confirmation::check_confirmable(&schedule, today)? {
        ConfirmAction::AlreadyConfirmed => {
            tracing::debug!("Schedule {} already confirmed, nothing to do", id);
            return Ok((schedule, None));
        }
        ConfirmAction::Proceed { consume_for } => consume_for,
    };

    let consumed = match consume_for {
        Some(member_id) => {
            let matching =
                matching::get_active_matching_in_tx(&mut tx, schedule.trainer_id, member_id)
                    .await?
                    .ok_or_else(|| {
                        ScheduleError::NotFound(format!(
                            "No active matching for trainer {} and member {}",
                            schedule.trainer_id, member_id
                        ))
                    })?;
            Some(matching::consume_session_in_tx(&mut tx, matching.id).await?)
        }
        None => None,
    };

    let confirmed = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        UPDATE schedules
        SET confirmed = TRUE
        WHERE id = $1
        RETURNING id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        "#,
    )
    .bind(id)
    .fetch_one(&mut *tx)
    .await
    .map_err(db_err)?
    .into_domain()?;

    tx.commit().await.map_err(db_err)?;

    tracing::debug!(
        "Schedule {} confirmed (session consumed: {})",
        id,
        consumed.is_some()
    );
    Ok((confirmed, consumed))
}

/// Serializes writers for one (trainer, date) so "check conflicts, then
/// insert" is atomic. Advisory locks release on commit or rollback.
async fn lock_trainer_day(
    tx: &mut Transaction<'_, Postgres>,
    trainer_id: Uuid,
    date: NaiveDate,
) -> ScheduleResult<()> {
    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(trainer_day_key(trainer_id, date))
        .execute(&mut **tx)
        .await
        .map_err(db_err)?;
    Ok(())
}

async fn siblings_for_day(
    tx: &mut Transaction<'_, Postgres>,
    trainer_id: Uuid,
    date: NaiveDate,
) -> ScheduleResult<Vec<Schedule>> {
    let rows = sqlx::query_as::<_, crate::models::DbSchedule>(
        r#"
        SELECT id, trainer_id, member_id, display_name, date, start_hour, end_hour, content, confirmed, origin, created_at
        FROM schedules
        WHERE trainer_id = $1 AND date = $2
        "#,
    )
    .bind(trainer_id)
    .bind(date)
    .fetch_all(&mut **tx)
    .await
    .map_err(db_err)?;

    rows.into_iter().map(crate::models::DbSchedule::into_domain).collect()
}

fn trainer_day_key(trainer_id: Uuid, date: NaiveDate) -> i64 {
    let mut hasher = DefaultHasher::new();
    trainer_id.hash(&mut hasher);
    date.hash(&mut hasher);
    hasher.finish() as i64
}

fn is_unique_violation(err: &ScheduleError) -> bool {
    let ScheduleError::Database(report) = err else {
        return false;
    };
    report
        .downcast_ref::<sqlx::Error>()
        .and_then(|e| e.as_database_error())
        .and_then(|d| d.code())
        .map(|code| code == "23505")
        .unwrap_or(false)
}

fn group_by_date(schedules: Vec<Schedule>) -> BTreeMap<NaiveDate, Vec<Schedule>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<Schedule>> = BTreeMap::new();
    for schedule in schedules {
        by_date.entry(schedule.date).or_default().push(schedule);
    }
    by_date
}

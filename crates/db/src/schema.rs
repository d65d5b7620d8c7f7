use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create schedules table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schedules (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            trainer_id UUID NOT NULL,
            member_id UUID NULL,
            display_name VARCHAR(255) NOT NULL,
            date DATE NOT NULL,
            start_hour SMALLINT NOT NULL,
            end_hour SMALLINT NOT NULL,
            content TEXT NOT NULL DEFAULT '',
            confirmed BOOLEAN NOT NULL DEFAULT FALSE,
            origin VARCHAR(16) NOT NULL DEFAULT 'internal',
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_hour_range CHECK (end_hour > start_hour),
            CONSTRAINT slot_bounds CHECK (start_hour >= 6 AND end_hour <= 24)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create matchings table (rows are written by the external matching
    // workflow; this engine only decrements remaining_sessions)
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS matchings (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            trainer_id UUID NOT NULL,
            member_id UUID NOT NULL,
            total_sessions INTEGER NOT NULL,
            remaining_sessions INTEGER NOT NULL,
            complete BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT session_floor CHECK (remaining_sessions >= 0 AND remaining_sessions <= total_sessions)
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Members and workout_records belong to the wider application; minimal
    // definitions here so local development bootstraps without it
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS members (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            name VARCHAR(255) NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS workout_records (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            owner_id UUID NOT NULL,
            record_date DATE NOT NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes. The unique index on (trainer_id, date, start_hour)
    // backs the write-race retry path: two concurrent inserts for the same
    // slot cannot both land even if they raced past the conflict check.
    sqlx::query(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_schedules_trainer_date_start ON schedules(trainer_id, date, start_hour);
        CREATE INDEX IF NOT EXISTS idx_schedules_trainer_date ON schedules(trainer_id, date);
        CREATE INDEX IF NOT EXISTS idx_schedules_member_date ON schedules(member_id, date);
        CREATE INDEX IF NOT EXISTS idx_matchings_pair ON matchings(trainer_id, member_id);
        CREATE INDEX IF NOT EXISTS idx_workout_records_owner_date ON workout_records(owner_id, record_date);
        "#,
    )
    .execute(pool)
    .await?;

    info!("Database schema initialized successfully.");
    Ok(())
}

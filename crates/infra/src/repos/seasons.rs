use chrono::NaiveDate;
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::SeasonRow;

#[derive(Debug, Clone)]
pub struct CreateSeason {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub season_round: i32,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateSeason) -> SqlxResult<SeasonRow> {
    sqlx::query_as::<_, SeasonRow>(
        r#"
        INSERT INTO seasons (name, start_date, end_date, season_round, is_draft)
        VALUES ($1, $2, $3, $4, true)
        RETURNING id, name, start_date, end_date, season_round, is_draft, created_at, updated_at
        "#,
    )
    .bind(data.name)
    .bind(data.start_date)
    .bind(data.end_date)
    .bind(data.season_round)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(
        r#"
        SELECT id, name, start_date, end_date, season_round, is_draft, created_at, updated_at
        FROM seasons
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Row-locks the season for the rest of the transaction.
pub async fn lock<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(
        r#"
        SELECT id, name, start_date, end_date, season_round, is_draft, created_at, updated_at
        FROM seasons
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn list<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Vec<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(
        r#"
        SELECT id, name, start_date, end_date, season_round, is_draft, created_at, updated_at
        FROM seasons
        ORDER BY start_date DESC
        "#,
    )
    .fetch_all(executor)
    .await
}

/// The season with the latest start date.
pub async fn get_latest<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Option<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(
        r#"
        SELECT id, name, start_date, end_date, season_round, is_draft, created_at, updated_at
        FROM seasons
        ORDER BY start_date DESC
        LIMIT 1
        "#,
    )
    .fetch_optional(executor)
    .await
}

/// The most recent season that started strictly before `start_date`.
pub async fn get_previous<'e>(
    executor: impl PgExecutor<'e>,
    start_date: NaiveDate,
) -> SqlxResult<Option<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(
        r#"
        SELECT id, name, start_date, end_date, season_round, is_draft, created_at, updated_at
        FROM seasons
        WHERE start_date < $1
        ORDER BY start_date DESC
        LIMIT 1
        "#,
    )
    .bind(start_date)
    .fetch_optional(executor)
    .await
}

pub async fn set_draft<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    is_draft: bool,
) -> SqlxResult<Option<SeasonRow>> {
    sqlx::query_as::<_, SeasonRow>(
        r#"
        UPDATE seasons
        SET is_draft = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, name, start_date, end_date, season_round, is_draft, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(is_draft)
    .fetch_optional(executor)
    .await
}

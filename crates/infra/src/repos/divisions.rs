use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::DivisionRow;

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    season_id: Uuid,
    division: i32,
) -> SqlxResult<DivisionRow> {
    sqlx::query_as::<_, DivisionRow>(
        r#"
        INSERT INTO divisions (season_id, division)
        VALUES ($1, $2)
        RETURNING id, season_id, division, created_at
        "#,
    )
    .bind(season_id)
    .bind(division)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<DivisionRow>> {
    sqlx::query_as::<_, DivisionRow>(
        r#"
        SELECT id, season_id, division, created_at
        FROM divisions
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Row-locks the division for the rest of the transaction. Every roster
/// mutation takes this lock first so concurrent writers on one division
/// serialise.
pub async fn lock<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<DivisionRow>> {
    sqlx::query_as::<_, DivisionRow>(
        r#"
        SELECT id, season_id, division, created_at
        FROM divisions
        WHERE id = $1
        FOR UPDATE
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_number<'e>(
    executor: impl PgExecutor<'e>,
    season_id: Uuid,
    division: i32,
) -> SqlxResult<Option<DivisionRow>> {
    sqlx::query_as::<_, DivisionRow>(
        r#"
        SELECT id, season_id, division, created_at
        FROM divisions
        WHERE season_id = $1 AND division = $2
        "#,
    )
    .bind(season_id)
    .bind(division)
    .fetch_optional(executor)
    .await
}

/// Divisions of a season, top division (lowest number) first.
pub async fn list_by_season<'e>(
    executor: impl PgExecutor<'e>,
    season_id: Uuid,
) -> SqlxResult<Vec<DivisionRow>> {
    sqlx::query_as::<_, DivisionRow>(
        r#"
        SELECT id, season_id, division, created_at
        FROM divisions
        WHERE season_id = $1
        ORDER BY division ASC
        "#,
    )
    .bind(season_id)
    .fetch_all(executor)
    .await
}

pub async fn max_number<'e>(executor: impl PgExecutor<'e>, season_id: Uuid) -> SqlxResult<Option<i32>> {
    sqlx::query_scalar::<_, Option<i32>>("SELECT MAX(division) FROM divisions WHERE season_id = $1")
        .bind(season_id)
        .fetch_one(executor)
        .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM divisions WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::{MembershipRow, MembershipWithPlayer, PlayerSeasonRow};

#[derive(Debug, Clone)]
pub struct CreateMembership {
    pub division_id: Uuid,
    pub season_id: Uuid,
    pub player_id: Uuid,
    pub sort_order: i32,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateMembership,
) -> SqlxResult<MembershipRow> {
    sqlx::query_as::<_, MembershipRow>(
        r#"
        INSERT INTO memberships (division_id, season_id, player_id, sort_order)
        VALUES ($1, $2, $3, $4)
        RETURNING id, division_id, season_id, player_id, sort_order, created_at, updated_at
        "#,
    )
    .bind(data.division_id)
    .bind(data.season_id)
    .bind(data.player_id)
    .bind(data.sort_order)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
) -> SqlxResult<Option<MembershipRow>> {
    sqlx::query_as::<_, MembershipRow>(
        r#"
        SELECT id, division_id, season_id, player_id, sort_order, created_at, updated_at
        FROM memberships
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// The player's membership anywhere in the season, if any.
pub async fn find_in_season<'e>(
    executor: impl PgExecutor<'e>,
    season_id: Uuid,
    player_id: Uuid,
) -> SqlxResult<Option<MembershipRow>> {
    sqlx::query_as::<_, MembershipRow>(
        r#"
        SELECT id, division_id, season_id, player_id, sort_order, created_at, updated_at
        FROM memberships
        WHERE season_id = $1 AND player_id = $2
        "#,
    )
    .bind(season_id)
    .bind(player_id)
    .fetch_optional(executor)
    .await
}

/// Members of a division in visual order: sort_order, then last name, then
/// first name, then id. Names compare byte-wise (`COLLATE "C"`) so the order
/// matches the one the roster engine computes when renumbering.
pub async fn list_by_division<'e>(
    executor: impl PgExecutor<'e>,
    division_id: Uuid,
) -> SqlxResult<Vec<MembershipWithPlayer>> {
    sqlx::query_as::<_, MembershipWithPlayer>(
        r#"
        SELECT m.id, m.division_id, m.season_id, m.player_id, m.sort_order,
               p.first_name, p.last_name, p.user_id
        FROM memberships m
        JOIN players p ON p.id = m.player_id
        WHERE m.division_id = $1
        ORDER BY m.sort_order ASC, p.last_name COLLATE "C" ASC, p.first_name COLLATE "C" ASC, m.id ASC
        "#,
    )
    .bind(division_id)
    .fetch_all(executor)
    .await
}

pub async fn count_by_division<'e>(executor: impl PgExecutor<'e>, division_id: Uuid) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM memberships WHERE division_id = $1")
        .bind(division_id)
        .fetch_one(executor)
        .await
}

pub async fn count_by_season<'e>(executor: impl PgExecutor<'e>, season_id: Uuid) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM memberships WHERE season_id = $1")
        .bind(season_id)
        .fetch_one(executor)
        .await
}

/// Size of every division the player has ever been rostered in, one entry per membership.
pub async fn division_sizes_for_player<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
) -> SqlxResult<Vec<i64>> {
    sqlx::query_scalar::<_, i64>(
        r#"
        SELECT (SELECT COUNT(*) FROM memberships other WHERE other.division_id = m.division_id)
        FROM memberships m
        WHERE m.player_id = $1
        "#,
    )
    .bind(player_id)
    .fetch_all(executor)
    .await
}

/// Every season the player was rostered in, newest season first.
pub async fn seasons_for_player<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
) -> SqlxResult<Vec<PlayerSeasonRow>> {
    sqlx::query_as::<_, PlayerSeasonRow>(
        r#"
        SELECT m.id AS membership_id, s.id AS season_id, s.name AS season_name, s.season_round,
               s.start_date, s.end_date, d.id AS division_id, d.division,
               (SELECT COUNT(*) FROM memberships other WHERE other.division_id = d.id) AS division_size
        FROM memberships m
        JOIN divisions d ON d.id = m.division_id
        JOIN seasons s ON s.id = m.season_id
        WHERE m.player_id = $1
        ORDER BY s.start_date DESC
        "#,
    )
    .bind(player_id)
    .fetch_all(executor)
    .await
}

pub async fn set_sort_order<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    sort_order: i32,
) -> SqlxResult<bool> {
    let result = sqlx::query(
        "UPDATE memberships SET sort_order = $2, updated_at = NOW() WHERE id = $1",
    )
    .bind(id)
    .bind(sort_order)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn move_to_division<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    division_id: Uuid,
    sort_order: i32,
) -> SqlxResult<MembershipRow> {
    sqlx::query_as::<_, MembershipRow>(
        r#"
        UPDATE memberships
        SET division_id = $2, sort_order = $3, updated_at = NOW()
        WHERE id = $1
        RETURNING id, division_id, season_id, player_id, sort_order, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(division_id)
    .bind(sort_order)
    .fetch_one(executor)
    .await
}

pub async fn delete<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM memberships WHERE id = $1")
        .bind(id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete_by_division<'e>(executor: impl PgExecutor<'e>, division_id: Uuid) -> SqlxResult<u64> {
    let result = sqlx::query("DELETE FROM memberships WHERE division_id = $1")
        .bind(division_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected())
}

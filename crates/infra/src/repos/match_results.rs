use chrono::{DateTime, Utc};
use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use super::contains_pattern;
use crate::models::{MatchResultRow, OpponentCountRow};

#[derive(Debug, Clone)]
pub struct CreateMatchResult {
    pub division_id: Uuid,
    pub player_id: Uuid,
    pub opponent_id: Uuid,
    pub result: i32,
    pub date_added: DateTime<Utc>,
    pub inaccurate: bool,
}

pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    data: CreateMatchResult,
) -> SqlxResult<MatchResultRow> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        INSERT INTO match_results (division_id, player_id, opponent_id, result, date_added, inaccurate)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, division_id, player_id, opponent_id, result, date_added, inaccurate, created_at
        "#,
    )
    .bind(data.division_id)
    .bind(data.player_id)
    .bind(data.opponent_id)
    .bind(data.result)
    .bind(data.date_added)
    .bind(data.inaccurate)
    .fetch_one(executor)
    .await
}

/// Deletes both mirrored rows of the match between two players in a division.
pub async fn delete_pair<'e>(
    executor: impl PgExecutor<'e>,
    division_id: Uuid,
    player_a: Uuid,
    player_b: Uuid,
) -> SqlxResult<u64> {
    let result = sqlx::query(
        r#"
        DELETE FROM match_results
        WHERE division_id = $1
          AND ((player_id = $2 AND opponent_id = $3) OR (player_id = $3 AND opponent_id = $2))
        "#,
    )
    .bind(division_id)
    .bind(player_a)
    .bind(player_b)
    .execute(executor)
    .await?;

    Ok(result.rows_affected())
}

pub async fn list_by_division<'e>(
    executor: impl PgExecutor<'e>,
    division_id: Uuid,
) -> SqlxResult<Vec<MatchResultRow>> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        SELECT id, division_id, player_id, opponent_id, result, date_added, inaccurate, created_at
        FROM match_results
        WHERE division_id = $1
        ORDER BY date_added ASC, created_at ASC
        "#,
    )
    .bind(division_id)
    .fetch_all(executor)
    .await
}

pub async fn list_by_season<'e>(
    executor: impl PgExecutor<'e>,
    season_id: Uuid,
) -> SqlxResult<Vec<MatchResultRow>> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        SELECT r.id, r.division_id, r.player_id, r.opponent_id, r.result, r.date_added, r.inaccurate, r.created_at
        FROM match_results r
        JOIN divisions d ON d.id = r.division_id
        WHERE d.season_id = $1
        ORDER BY r.date_added ASC, r.created_at ASC
        "#,
    )
    .bind(season_id)
    .fetch_all(executor)
    .await
}

/// Rows where the player is the subject, restricted to one division of one season.
pub async fn list_for_player_in_division<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
    season_id: Uuid,
    division_id: Uuid,
) -> SqlxResult<Vec<MatchResultRow>> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        SELECT r.id, r.division_id, r.player_id, r.opponent_id, r.result, r.date_added, r.inaccurate, r.created_at
        FROM match_results r
        JOIN divisions d ON d.id = r.division_id
        WHERE r.player_id = $1 AND d.season_id = $2 AND r.division_id = $3
        ORDER BY r.date_added ASC
        "#,
    )
    .bind(player_id)
    .bind(season_id)
    .bind(division_id)
    .fetch_all(executor)
    .await
}

/// Every row the player is the subject of, across all seasons.
pub async fn list_by_player<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
) -> SqlxResult<Vec<MatchResultRow>> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        SELECT id, division_id, player_id, opponent_id, result, date_added, inaccurate, created_at
        FROM match_results
        WHERE player_id = $1
        ORDER BY date_added DESC
        "#,
    )
    .bind(player_id)
    .fetch_all(executor)
    .await
}

/// Rows of both players against each other, in either direction, latest
/// season first.
pub async fn list_between<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
    opponent_id: Uuid,
) -> SqlxResult<Vec<MatchResultRow>> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        SELECT r.id, r.division_id, r.player_id, r.opponent_id, r.result, r.date_added, r.inaccurate, r.created_at
        FROM match_results r
        JOIN divisions d ON d.id = r.division_id
        JOIN seasons s ON s.id = d.season_id
        WHERE (r.player_id = $1 AND r.opponent_id = $2) OR (r.player_id = $2 AND r.opponent_id = $1)
        ORDER BY s.end_date DESC, r.date_added DESC
        "#,
    )
    .bind(player_id)
    .bind(opponent_id)
    .fetch_all(executor)
    .await
}

/// Opponents the player has results against, most played first. When `query`
/// is given, every whitespace-separated term must match the opponent's first
/// or last name.
pub async fn opponents_for_player<'e>(
    executor: impl PgExecutor<'e>,
    player_id: Uuid,
    query: Option<&str>,
    limit: i64,
) -> SqlxResult<Vec<OpponentCountRow>> {
    let mut builder = sqlx::QueryBuilder::new(
        r#"
        SELECT r.opponent_id, p.first_name, p.last_name,
               COUNT(*) AS times_played, MAX(r.date_added) AS last_played
        FROM match_results r
        JOIN players p ON p.id = r.opponent_id
        WHERE r.player_id = "#,
    );
    builder.push_bind(player_id);

    for term in query.unwrap_or_default().split_whitespace() {
        let pattern = contains_pattern(term);
        builder.push(" AND (LOWER(p.first_name) LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR LOWER(p.last_name) LIKE ");
        builder.push_bind(pattern);
        builder.push(" ESCAPE '\\')");
    }

    builder.push(
        " GROUP BY r.opponent_id, p.first_name, p.last_name \
         ORDER BY times_played DESC, last_played DESC, p.last_name ASC, p.first_name ASC LIMIT ",
    );
    builder.push_bind(limit);

    builder.build_query_as::<OpponentCountRow>().fetch_all(executor).await
}

/// Most recent rows of a division, newest first.
pub async fn list_recent_by_division<'e>(
    executor: impl PgExecutor<'e>,
    division_id: Uuid,
    limit: i64,
) -> SqlxResult<Vec<MatchResultRow>> {
    sqlx::query_as::<_, MatchResultRow>(
        r#"
        SELECT id, division_id, player_id, opponent_id, result, date_added, inaccurate, created_at
        FROM match_results
        WHERE division_id = $1
        ORDER BY date_added DESC, created_at DESC
        LIMIT $2
        "#,
    )
    .bind(division_id)
    .bind(limit)
    .fetch_all(executor)
    .await
}

pub async fn count_by_division<'e>(executor: impl PgExecutor<'e>, division_id: Uuid) -> SqlxResult<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM match_results WHERE division_id = $1")
        .bind(division_id)
        .fetch_one(executor)
        .await
}

pub async fn exists_since<'e>(
    executor: impl PgExecutor<'e>,
    division_id: Uuid,
    since: DateTime<Utc>,
) -> SqlxResult<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM match_results WHERE division_id = $1 AND date_added >= $2)",
    )
    .bind(division_id)
    .bind(since)
    .fetch_one(executor)
    .await
}

//! A player's career: the seasons they played and the opponents they met.

use chrono::NaiveDate;
use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use crate::services::scoring::{self, PlayerTotals};
use infra::models::{OpponentCountRow, PlayerSeasonRow};
use infra::repos::{match_results, memberships, players};

/// Opponents listed on a player's history page.
pub const FREQUENT_OPPONENTS: i64 = 10;

#[derive(Debug, Clone, Serialize)]
pub struct SeasonEntry {
    pub membership_id: Uuid,
    pub season_id: Uuid,
    pub season_name: String,
    pub season_round: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub division_id: Uuid,
    pub division: i32,
    pub division_size: i64,
    pub totals: PlayerTotals,
}

impl SeasonEntry {
    fn new(row: PlayerSeasonRow, totals: PlayerTotals) -> Self {
        Self {
            membership_id: row.membership_id,
            season_id: row.season_id,
            season_name: row.season_name,
            season_round: row.season_round,
            start_date: row.start_date,
            end_date: row.end_date,
            division_id: row.division_id,
            division: row.division,
            division_size: row.division_size,
            totals,
        }
    }
}

async fn require_player(conn: &mut PgConnection, player_id: Uuid) -> LadderResult<()> {
    players::get_by_id(&mut *conn, player_id)
        .await?
        .ok_or(LadderError::NotFound("Player"))?;
    Ok(())
}

/// Every season the player was rostered in, newest first, with the points
/// they scored in that season's division.
pub async fn player_season_history(
    conn: &mut PgConnection,
    player_id: Uuid,
) -> LadderResult<Vec<SeasonEntry>> {
    require_player(conn, player_id).await?;

    let rows = memberships::seasons_for_player(&mut *conn, player_id).await?;
    let mut entries = Vec::with_capacity(rows.len());
    for row in rows {
        let totals = scoring::player_totals(conn, player_id, row.season_id, row.division_id).await?;
        entries.push(SeasonEntry::new(row, totals));
    }
    Ok(entries)
}

/// Opponents the player has met, most played first. A blank query lists
/// everyone; otherwise each term must match the opponent's name.
pub async fn frequent_opponents(
    conn: &mut PgConnection,
    player_id: Uuid,
    query: Option<&str>,
    limit: i64,
) -> LadderResult<Vec<OpponentCountRow>> {
    require_player(conn, player_id).await?;

    let query = query.map(str::trim).filter(|q| !q.is_empty());
    Ok(match_results::opponents_for_player(&mut *conn, player_id, query, limit).await?)
}

//! Data handed to the external notifier: which divisions have fresh results
//! and what those results were. Nothing here sends anything.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use crate::services::scoring::WIN;
use infra::models::{MatchResultRow, UserRow};
use infra::repos::{divisions, match_results, subscriptions};

/// Rows fetched per requested match; leaves room for orphaned rows.
const ROWS_PER_MATCH: i64 = 2;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletedMatch {
    pub winner_id: Uuid,
    pub loser_id: Uuid,
    pub loser_score: i32,
    pub date_added: DateTime<Utc>,
    pub inaccurate: bool,
}

/// Collapses mirrored rows into one entry per player pair, newest first.
/// Rows without their mirror are skipped.
pub fn collapse_matches(rows: &[MatchResultRow]) -> Vec<CompletedMatch> {
    let by_direction: HashMap<(Uuid, Uuid), &MatchResultRow> =
        rows.iter().map(|r| ((r.player_id, r.opponent_id), r)).collect();

    let mut seen: HashSet<(Uuid, Uuid)> = HashSet::new();
    let mut matches = Vec::new();

    for row in rows {
        let key = if row.player_id < row.opponent_id {
            (row.player_id, row.opponent_id)
        } else {
            (row.opponent_id, row.player_id)
        };
        if seen.contains(&key) {
            continue;
        }
        let Some(mirror) = by_direction.get(&(row.opponent_id, row.player_id)) else {
            continue;
        };

        let (winner, loser) = if row.result == WIN { (row, *mirror) } else { (*mirror, row) };
        seen.insert(key);
        matches.push(CompletedMatch {
            winner_id: winner.player_id,
            loser_id: loser.player_id,
            loser_score: loser.result,
            date_added: row.date_added.max(mirror.date_added),
            inaccurate: row.inaccurate || mirror.inaccurate,
        });
    }

    matches.sort_by(|a, b| b.date_added.cmp(&a.date_added));
    matches
}

pub async fn has_new_results_since(
    conn: &mut PgConnection,
    division_id: Uuid,
    since: DateTime<Utc>,
) -> LadderResult<bool> {
    Ok(match_results::exists_since(&mut *conn, division_id, since).await?)
}

pub async fn latest_matches(
    conn: &mut PgConnection,
    division_id: Uuid,
    limit: i64,
) -> LadderResult<Vec<CompletedMatch>> {
    divisions::get_by_id(&mut *conn, division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))?;

    let rows =
        match_results::list_recent_by_division(&mut *conn, division_id, limit.max(0) * ROWS_PER_MATCH)
            .await?;
    let mut matches = collapse_matches(&rows);
    matches.truncate(limit.max(0) as usize);
    Ok(matches)
}

pub async fn subscribers_for(conn: &mut PgConnection, division_id: Uuid) -> LadderResult<Vec<UserRow>> {
    Ok(subscriptions::list_subscribers(&mut *conn, division_id).await?)
}

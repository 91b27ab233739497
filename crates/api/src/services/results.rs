use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use crate::services::scoring::{MAX_LOSING_SCORE, WIN};
use infra::models::MatchResultRow;
use infra::repos::{divisions, match_results, match_results::CreateMatchResult, memberships};

/// A finished match as entered by the operator: the loser's score, the winner
/// implied.
#[derive(Debug, Clone)]
pub struct RecordMatch {
    pub division_id: Uuid,
    pub loser_id: Uuid,
    pub winner_id: Uuid,
    pub loser_score: i32,
    pub inaccurate: bool,
    pub date_added: DateTime<Utc>,
}

impl RecordMatch {
    pub fn validate(&self) -> LadderResult<()> {
        if self.loser_id == self.winner_id {
            return Err(LadderError::validation(
                "Invalid result: player and opponent cannot be the same person",
            ));
        }
        if !(0..=MAX_LOSING_SCORE).contains(&self.loser_score) {
            return Err(LadderError::validation(format!(
                "Invalid result: losing score must be between 0 and {MAX_LOSING_SCORE}"
            )));
        }
        Ok(())
    }

    /// The mirrored pair: loser row first, winner row second.
    pub fn rows(&self) -> [CreateMatchResult; 2] {
        [
            CreateMatchResult {
                division_id: self.division_id,
                player_id: self.loser_id,
                opponent_id: self.winner_id,
                result: self.loser_score,
                date_added: self.date_added,
                inaccurate: self.inaccurate,
            },
            CreateMatchResult {
                division_id: self.division_id,
                player_id: self.winner_id,
                opponent_id: self.loser_id,
                result: WIN,
                date_added: self.date_added,
                inaccurate: self.inaccurate,
            },
        ]
    }
}

/// Records a match, replacing any earlier result between the same two
/// players in the division.
pub async fn record_match(pool: &PgPool, data: RecordMatch) -> LadderResult<[MatchResultRow; 2]> {
    data.validate()?;

    let mut tx = pool.begin().await?;

    let division = divisions::lock(&mut *tx, data.division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))?;

    for player_id in [data.loser_id, data.winner_id] {
        let membership = memberships::find_in_season(&mut *tx, division.season_id, player_id).await?;
        if membership.map(|m| m.division_id) != Some(division.id) {
            return Err(LadderError::validation(
                "Both players must be members of this division",
            ));
        }
    }

    let replaced =
        match_results::delete_pair(&mut *tx, division.id, data.loser_id, data.winner_id).await?;

    let [loser_row, winner_row] = data.rows();
    let loser = match_results::create(&mut *tx, loser_row).await?;
    let winner = match_results::create(&mut *tx, winner_row).await?;

    tx.commit().await?;

    tracing::info!(
        division_id = %division.id,
        replaced,
        "Recorded match {} beat {} (9-{})",
        data.winner_id,
        data.loser_id,
        data.loser_score
    );

    Ok([loser, winner])
}

pub async fn list_division_results(pool: &PgPool, division_id: Uuid) -> LadderResult<Vec<MatchResultRow>> {
    divisions::get_by_id(pool, division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))?;
    Ok(match_results::list_by_division(pool, division_id).await?)
}

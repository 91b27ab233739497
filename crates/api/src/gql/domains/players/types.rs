use async_graphql::{SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};

use crate::gql::types::MatchResult;
use crate::services::{history, scoring};
use infra::models::{display_name, OpponentCountRow};

/// All-time record. Rates and average are null until a match is played.
#[derive(SimpleObject, Clone)]
pub struct PlayerHistory {
    pub played: i64,
    pub wins: i64,
    pub win_rate: Option<f64>,
    pub completion_rate: Option<f64>,
    pub average: Option<f64>,
    /// Newest season first.
    pub seasons: Vec<PlayerSeason>,
    pub frequent_opponents: Vec<Opponent>,
}

impl PlayerHistory {
    pub fn new(
        stats: scoring::PlayerHistoricalStats,
        seasons: Vec<history::SeasonEntry>,
        opponents: Vec<OpponentCountRow>,
    ) -> Self {
        Self {
            played: stats.played,
            wins: stats.wins,
            win_rate: stats.win_rate,
            completion_rate: stats.completion_rate,
            average: stats.average,
            seasons: seasons.into_iter().map(PlayerSeason::from).collect(),
            frequent_opponents: opponents.into_iter().map(Opponent::from).collect(),
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct PlayerSeason {
    pub membership_id: ID,
    pub season_id: ID,
    pub season_name: String,
    pub season_round: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub division_id: ID,
    pub division: i32,
    pub division_size: i64,
    pub total_points: f64,
    pub matches_played: i64,
    pub points_per_game: f64,
}

impl From<history::SeasonEntry> for PlayerSeason {
    fn from(e: history::SeasonEntry) -> Self {
        Self {
            membership_id: e.membership_id.into(),
            season_id: e.season_id.into(),
            season_name: e.season_name,
            season_round: e.season_round,
            start_date: e.start_date,
            end_date: e.end_date,
            division_id: e.division_id.into(),
            division: e.division,
            division_size: e.division_size,
            total_points: e.totals.total,
            matches_played: e.totals.matches_played,
            points_per_game: e.totals.average,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Opponent {
    pub player_id: ID,
    pub name: String,
    pub times_played: i64,
    pub last_played: DateTime<Utc>,
}

impl From<OpponentCountRow> for Opponent {
    fn from(row: OpponentCountRow) -> Self {
        Self {
            player_id: row.opponent_id.into(),
            name: display_name(&row.first_name, &row.last_name),
            times_played: row.times_played,
            last_played: row.last_played,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct HeadToHead {
    pub won: i64,
    pub lost: i64,
    pub played: i64,
    /// Loser-side result of every meeting, latest season first.
    pub results: Vec<MatchResult>,
}

impl From<scoring::HeadToHead> for HeadToHead {
    fn from(h: scoring::HeadToHead) -> Self {
        Self {
            won: h.won,
            lost: h.lost,
            played: h.played,
            results: h.results.into_iter().map(MatchResult::from).collect(),
        }
    }
}

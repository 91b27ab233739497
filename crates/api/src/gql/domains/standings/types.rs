use async_graphql::{SimpleObject, ID};
use chrono::NaiveDate;

use crate::services::progress::SeasonProgress as Progress;
use crate::services::scoring;

#[derive(SimpleObject, Clone)]
pub struct PlayerTotals {
    pub total: f64,
    pub average: f64,
    pub matches_played: i64,
    pub wins: i64,
}

impl From<scoring::PlayerTotals> for PlayerTotals {
    fn from(t: scoring::PlayerTotals) -> Self {
        Self {
            total: t.total,
            average: t.average,
            matches_played: t.matches_played,
            wins: t.wins,
        }
    }
}

/// Division leader; `player_id` is null and `name` reads "No Results" when
/// nothing has been played.
#[derive(SimpleObject, Clone)]
pub struct DivisionLeader {
    pub division: i32,
    pub player_id: Option<ID>,
    pub name: String,
    pub total: f64,
    pub played_percent: f64,
}

impl DivisionLeader {
    pub fn new(division: i32, leader: scoring::DivisionLeader) -> Self {
        let name = leader.name().to_string();
        match leader {
            scoring::DivisionLeader::Leader {
                player_id,
                total,
                played_percent,
                ..
            } => Self {
                division,
                player_id: Some(player_id.into()),
                name,
                total,
                played_percent,
            },
            scoring::DivisionLeader::NoResults => Self {
                division,
                player_id: None,
                name,
                total: 0.0,
                played_percent: 0.0,
            },
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct SeasonStats {
    pub divisions: i64,
    pub percentage_played: f64,
    pub total_possible_games: i64,
    pub games_played: i64,
    pub player_count: i64,
}

impl From<scoring::SeasonAggregateStats> for SeasonStats {
    fn from(s: scoring::SeasonAggregateStats) -> Self {
        Self {
            divisions: s.divisions,
            percentage_played: s.percentage_played,
            total_possible_games: s.total_possible_games,
            games_played: s.games_played,
            player_count: s.player_count,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct DivisionStats {
    pub matches_played: i64,
    pub total_matches: i64,
    pub percent_played: f64,
}

impl From<scoring::DivisionStats> for DivisionStats {
    fn from(s: scoring::DivisionStats) -> Self {
        Self {
            matches_played: s.matches_played,
            total_matches: s.total_matches,
            percent_played: s.percent_played,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Standing {
    pub membership_id: ID,
    pub player_id: ID,
    pub name: String,
    pub sort_order: i32,
    pub total_points: f64,
    pub games: i64,
    pub points_per_game: f64,
    pub wins: i64,
    pub played_percent: f64,
}

impl From<scoring::Standing> for Standing {
    fn from(s: scoring::Standing) -> Self {
        Self {
            membership_id: s.membership_id.into(),
            player_id: s.player_id.into(),
            name: s.name,
            sort_order: s.sort_order,
            total_points: s.total_points,
            games: s.games,
            points_per_game: s.points_per_game,
            wins: s.wins,
            played_percent: s.played_percent,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct SeasonProgress {
    pub season_length_days: i64,
    pub total_possible_matches: i64,
    pub played_days: Vec<i64>,
    pub played_counts: Vec<i64>,
    pub played_cumulative: Vec<f64>,
    pub latest_result_date: Option<NaiveDate>,
    pub today_offset_day: i64,
}

impl From<Progress> for SeasonProgress {
    fn from(p: Progress) -> Self {
        Self {
            season_length_days: p.season_length_days,
            total_possible_matches: p.total_possible_matches,
            played_days: p.played_days,
            played_counts: p.played_counts,
            played_cumulative: p.played_cumulative,
            latest_result_date: p.latest_result_date,
            today_offset_day: p.today_offset_day,
        }
    }
}

//! Standings and scoring over recorded match results.
//!
//! Two points systems coexist here and must stay separate:
//! division totals use [`points_for`] (a win is worth 12, anything else
//! `result + 1`), while [`PlayerHistoricalStats`] averages the raw result and
//! adds a participation/win bonus.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use infra::models::{display_name, MatchResultRow, MembershipWithPlayer};
use infra::repos::{divisions, match_results, memberships, players, seasons};

/// Result value recorded for the winner of a match.
pub const WIN: i32 = 9;

/// Highest score a loser can record.
pub const MAX_LOSING_SCORE: i32 = 8;

pub fn points_for(result: i32) -> f64 {
    if result == WIN {
        12.0
    } else {
        result as f64 + 1.0
    }
}

/// Number of games in a full round robin of `players` players.
pub fn possible_matches(players: i64) -> i64 {
    if players < 2 {
        0
    } else {
        players * (players - 1) / 2
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn percent(part: f64, whole: f64) -> f64 {
    if whole > 0.0 {
        round2(part / whole * 100.0)
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerTotals {
    pub total: f64,
    pub average: f64,
    pub matches_played: i64,
    pub wins: i64,
}

impl PlayerTotals {
    /// Sums points over the results the player recorded as subject.
    pub fn from_results(results: impl IntoIterator<Item = i32>) -> Self {
        let mut total = 0.0;
        let mut matches_played = 0;
        let mut wins = 0;
        for result in results {
            total += points_for(result);
            matches_played += 1;
            if result == WIN {
                wins += 1;
            }
        }

        let average = if matches_played > 0 {
            round2(total / matches_played as f64)
        } else {
            0.0
        };

        Self {
            total,
            average,
            matches_played,
            wins,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DivisionLeader {
    Leader {
        player_id: Uuid,
        name: String,
        total: f64,
        played_percent: f64,
    },
    NoResults,
}

impl DivisionLeader {
    pub const NO_RESULTS: &'static str = "No Results";

    pub fn name(&self) -> &str {
        match self {
            DivisionLeader::Leader { name, .. } => name,
            DivisionLeader::NoResults => Self::NO_RESULTS,
        }
    }
}

/// Name used for tie-breaking and display of a scored player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerName {
    pub first_name: String,
    pub last_name: String,
}

/// Highest total wins. Equal totals fall back to last name, first name, then
/// the lowest player id, so the answer never depends on iteration order.
pub fn leader_from_rows(
    rows: &[MatchResultRow],
    names: &HashMap<Uuid, PlayerName>,
    member_count: i64,
) -> DivisionLeader {
    if rows.is_empty() {
        return DivisionLeader::NoResults;
    }

    let mut totals: HashMap<Uuid, f64> = HashMap::new();
    for row in rows {
        *totals.entry(row.player_id).or_insert(0.0) += points_for(row.result);
    }

    let blank = PlayerName {
        first_name: String::new(),
        last_name: String::new(),
    };
    let mut ranked: Vec<(Uuid, f64)> = totals.into_iter().collect();
    ranked.sort_by(|(a_id, a_total), (b_id, b_total)| {
        let a_name = names.get(a_id).unwrap_or(&blank);
        let b_name = names.get(b_id).unwrap_or(&blank);
        b_total
            .total_cmp(a_total)
            .then_with(|| a_name.last_name.cmp(&b_name.last_name))
            .then_with(|| a_name.first_name.cmp(&b_name.first_name))
            .then_with(|| a_id.cmp(b_id))
    });

    let (player_id, total) = ranked[0];
    let name = names
        .get(&player_id)
        .map(|n| display_name(&n.first_name, &n.last_name))
        .unwrap_or_else(|| player_id.to_string());
    let matches_played = rows.len() as f64 / 2.0;

    DivisionLeader::Leader {
        player_id,
        name,
        total,
        played_percent: percent(matches_played, possible_matches(member_count) as f64),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAggregateStats {
    pub divisions: i64,
    pub percentage_played: f64,
    pub total_possible_games: i64,
    pub games_played: i64,
    pub player_count: i64,
}

impl SeasonAggregateStats {
    pub fn compute(division_sizes: &[i64], result_rows: i64) -> Self {
        let player_count = division_sizes.iter().sum();
        let total_possible_games = division_sizes.iter().map(|n| possible_matches(*n)).sum();
        let games_played = result_rows / 2;

        Self {
            divisions: division_sizes.len() as i64,
            percentage_played: percent(games_played as f64, total_possible_games as f64),
            total_possible_games,
            games_played,
            player_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivisionStats {
    pub matches_played: i64,
    pub total_matches: i64,
    pub percent_played: f64,
}

impl DivisionStats {
    pub fn compute(member_count: i64, result_rows: i64) -> Self {
        let matches_played = result_rows / 2;
        let total_matches = possible_matches(member_count);
        Self {
            matches_played,
            total_matches,
            percent_played: percent(matches_played as f64, total_matches as f64),
        }
    }
}

/// All-time record of a player. Rates are `None` when nothing has been played.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerHistoricalStats {
    pub played: i64,
    pub wins: i64,
    pub win_rate: Option<f64>,
    pub completion_rate: Option<f64>,
    pub average: Option<f64>,
}

impl PlayerHistoricalStats {
    /// `division_sizes` holds the size of each division the player was rostered in.
    pub fn compute(results: &[i32], division_sizes: &[i64]) -> Self {
        let played = results.len() as i64;
        if played == 0 {
            return Self {
                played: 0,
                wins: 0,
                win_rate: None,
                completion_rate: None,
                average: None,
            };
        }

        let wins = results.iter().filter(|r| **r == WIN).count() as i64;
        let played_f = played as f64;
        let win_rate = round2(wins as f64 / played_f * 100.0);

        // two bonus points per win, one per match played
        let bonus = (wins as f64 * 2.0 + played_f) / played_f;
        let mean_result = results.iter().map(|r| *r as f64).sum::<f64>() / played_f;

        let opportunities: i64 = division_sizes.iter().map(|n| (n - 1).max(0)).sum();
        let completion_rate = if opportunities > 0 {
            Some(round2(played_f / opportunities as f64 * 100.0))
        } else {
            None
        };

        Self {
            played,
            wins,
            win_rate: Some(win_rate),
            completion_rate,
            average: Some(round2(mean_result + bonus)),
        }
    }
}

/// One row of a division table, in roster display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Standing {
    pub membership_id: Uuid,
    pub player_id: Uuid,
    pub name: String,
    pub sort_order: i32,
    pub total_points: f64,
    pub games: i64,
    pub points_per_game: f64,
    pub wins: i64,
    pub played_percent: f64,
}

pub fn standings_from_rows(members: &[MembershipWithPlayer], rows: &[MatchResultRow]) -> Vec<Standing> {
    let mut by_player: HashMap<Uuid, Vec<i32>> = HashMap::new();
    for row in rows {
        by_player.entry(row.player_id).or_default().push(row.result);
    }

    let opponents = (members.len() as f64 - 1.0).max(0.0);
    members
        .iter()
        .map(|member| {
            let results = by_player.get(&member.player_id).cloned().unwrap_or_default();
            let totals = PlayerTotals::from_results(results);
            Standing {
                membership_id: member.id,
                player_id: member.player_id,
                name: display_name(&member.first_name, &member.last_name),
                sort_order: member.sort_order,
                total_points: totals.total,
                games: totals.matches_played,
                points_per_game: totals.average,
                wins: totals.wins,
                played_percent: percent(totals.matches_played as f64, opponents),
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct HeadToHead {
    pub won: i64,
    pub lost: i64,
    pub played: i64,
    /// Loser-side row of every meeting, in the order given.
    pub results: Vec<MatchResultRow>,
}

impl HeadToHead {
    /// Counts from the loser rows: the player's own loss rows are defeats,
    /// the opponent's loss rows are victories.
    pub fn compute(player_id: Uuid, opponent_id: Uuid, rows: &[MatchResultRow]) -> Self {
        let mut won = 0;
        let mut lost = 0;
        let mut results = Vec::new();
        for row in rows.iter().filter(|r| r.result < WIN) {
            if row.player_id == player_id && row.opponent_id == opponent_id {
                lost += 1;
            } else if row.player_id == opponent_id && row.opponent_id == player_id {
                won += 1;
            } else {
                continue;
            }
            results.push(row.clone());
        }
        Self {
            won,
            lost,
            played: won + lost,
            results,
        }
    }
}

// --- Store-backed queries ---

pub async fn player_totals(
    conn: &mut PgConnection,
    player_id: Uuid,
    season_id: Uuid,
    division_id: Uuid,
) -> LadderResult<PlayerTotals> {
    let division = divisions::get_by_id(&mut *conn, division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))?;
    if division.season_id != season_id {
        return Err(LadderError::NotFound("Division"));
    }

    let rows =
        match_results::list_for_player_in_division(&mut *conn, player_id, season_id, division_id)
            .await?;
    Ok(PlayerTotals::from_results(rows.iter().map(|r| r.result)))
}

pub async fn division_leader(conn: &mut PgConnection, division_id: Uuid) -> LadderResult<DivisionLeader> {
    divisions::get_by_id(&mut *conn, division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))?;

    let rows = match_results::list_by_division(&mut *conn, division_id).await?;
    let members = memberships::list_by_division(&mut *conn, division_id).await?;

    let mut names: HashMap<Uuid, PlayerName> = members
        .iter()
        .map(|m| {
            (
                m.player_id,
                PlayerName {
                    first_name: m.first_name.clone(),
                    last_name: m.last_name.clone(),
                },
            )
        })
        .collect();

    // results may outlive a membership when a player was removed mid-season
    let missing: HashSet<Uuid> = rows
        .iter()
        .map(|r| r.player_id)
        .filter(|id| !names.contains_key(id))
        .collect();
    for player_id in missing {
        if let Some(player) = players::get_by_id(&mut *conn, player_id).await? {
            names.insert(
                player_id,
                PlayerName {
                    first_name: player.first_name,
                    last_name: player.last_name,
                },
            );
        }
    }

    Ok(leader_from_rows(&rows, &names, members.len() as i64))
}

pub async fn season_leaders(
    conn: &mut PgConnection,
    season_id: Uuid,
) -> LadderResult<Vec<(i32, DivisionLeader)>> {
    seasons::get_by_id(&mut *conn, season_id)
        .await?
        .ok_or(LadderError::NotFound("Season"))?;

    let mut leaders = Vec::new();
    for division in divisions::list_by_season(&mut *conn, season_id).await? {
        let leader = division_leader(&mut *conn, division.id).await?;
        leaders.push((division.division, leader));
    }
    Ok(leaders)
}

pub async fn season_aggregate_stats(
    conn: &mut PgConnection,
    season_id: Uuid,
) -> LadderResult<SeasonAggregateStats> {
    seasons::get_by_id(&mut *conn, season_id)
        .await?
        .ok_or(LadderError::NotFound("Season"))?;

    let mut sizes = Vec::new();
    let mut result_rows = 0;
    for division in divisions::list_by_season(&mut *conn, season_id).await? {
        sizes.push(memberships::count_by_division(&mut *conn, division.id).await?);
        result_rows += match_results::count_by_division(&mut *conn, division.id).await?;
    }

    Ok(SeasonAggregateStats::compute(&sizes, result_rows))
}

pub async fn division_stats(conn: &mut PgConnection, division_id: Uuid) -> LadderResult<DivisionStats> {
    divisions::get_by_id(&mut *conn, division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))?;

    let members = memberships::count_by_division(&mut *conn, division_id).await?;
    let rows = match_results::count_by_division(&mut *conn, division_id).await?;
    Ok(DivisionStats::compute(members, rows))
}

pub async fn division_standings(conn: &mut PgConnection, division_id: Uuid) -> LadderResult<Vec<Standing>> {
    divisions::get_by_id(&mut *conn, division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))?;

    let members = memberships::list_by_division(&mut *conn, division_id).await?;
    let rows = match_results::list_by_division(&mut *conn, division_id).await?;
    Ok(standings_from_rows(&members, &rows))
}

pub async fn player_historical_stats(
    conn: &mut PgConnection,
    player_id: Uuid,
) -> LadderResult<PlayerHistoricalStats> {
    players::get_by_id(&mut *conn, player_id)
        .await?
        .ok_or(LadderError::NotFound("Player"))?;

    let rows = match_results::list_by_player(&mut *conn, player_id).await?;
    let sizes = memberships::division_sizes_for_player(&mut *conn, player_id).await?;
    let results: Vec<i32> = rows.iter().map(|r| r.result).collect();
    Ok(PlayerHistoricalStats::compute(&results, &sizes))
}

pub async fn head_to_head(
    conn: &mut PgConnection,
    player_id: Uuid,
    opponent_id: Uuid,
) -> LadderResult<HeadToHead> {
    for id in [player_id, opponent_id] {
        players::get_by_id(&mut *conn, id)
            .await?
            .ok_or(LadderError::NotFound("Player"))?;
    }

    let rows = match_results::list_between(&mut *conn, player_id, opponent_id).await?;
    Ok(HeadToHead::compute(player_id, opponent_id, &rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(player: Uuid, opponent: Uuid, result: i32) -> MatchResultRow {
        MatchResultRow {
            id: Uuid::new_v4(),
            division_id: Uuid::nil(),
            player_id: player,
            opponent_id: opponent,
            result,
            date_added: Utc.with_ymd_and_hms(2024, 5, 1, 18, 0, 0).unwrap(),
            inaccurate: false,
            created_at: Utc::now(),
        }
    }

    /// Mirrored pair: loser scored `score`, winner gets 9.
    fn game(winner: Uuid, loser: Uuid, score: i32) -> Vec<MatchResultRow> {
        vec![row(loser, winner, score), row(winner, loser, WIN)]
    }

    fn member(player: Uuid, first: &str, last: &str, sort_order: i32) -> MembershipWithPlayer {
        MembershipWithPlayer {
            id: Uuid::new_v4(),
            division_id: Uuid::nil(),
            season_id: Uuid::nil(),
            player_id: player,
            sort_order,
            first_name: first.to_string(),
            last_name: last.to_string(),
            user_id: None,
        }
    }

    fn name(first: &str, last: &str) -> PlayerName {
        PlayerName {
            first_name: first.to_string(),
            last_name: last.to_string(),
        }
    }

    #[test]
    fn win_scores_twelve_and_loss_scores_result_plus_one() {
        assert_eq!(points_for(9), 12.0);
        assert_eq!(points_for(0), 1.0);
        assert_eq!(points_for(8), 9.0);
    }

    #[test]
    fn totals_average_is_rounded_and_zero_without_matches() {
        let totals = PlayerTotals::from_results([9, 3, 4]);
        assert_eq!(totals.total, 12.0 + 4.0 + 5.0);
        assert_eq!(totals.matches_played, 3);
        assert_eq!(totals.wins, 1);
        assert_eq!(totals.average, 7.0);

        let totals = PlayerTotals::from_results([9, 0, 0]);
        assert_eq!(totals.average, 4.67);

        let empty = PlayerTotals::from_results(Vec::<i32>::new());
        assert_eq!(empty.total, 0.0);
        assert_eq!(empty.average, 0.0);
        assert_eq!(empty.matches_played, 0);
    }

    #[test]
    fn totals_are_additive_over_disjoint_windows() {
        let early = [9, 2, 7];
        let late = [9, 9, 0];
        let union: Vec<i32> = early.iter().chain(late.iter()).copied().collect();

        let sum = PlayerTotals::from_results(early).total + PlayerTotals::from_results(late).total;
        assert_eq!(PlayerTotals::from_results(union).total, sum);
    }

    #[test]
    fn leader_of_empty_division_is_sentinel() {
        let leader = leader_from_rows(&[], &HashMap::new(), 4);
        assert_eq!(leader, DivisionLeader::NoResults);
        assert_eq!(leader.name(), "No Results");
    }

    #[test]
    fn leader_has_highest_total_and_division_played_percent() {
        let (a, b, c, d) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut rows = game(a, b, 5);
        rows.extend(game(a, c, 8));
        rows.extend(game(c, d, 2));

        let names = HashMap::from([
            (a, name("Ann", "Adams")),
            (b, name("Ben", "Baker")),
            (c, name("Cat", "Cole")),
            (d, name("Dan", "Dunn")),
        ]);

        match leader_from_rows(&rows, &names, 4) {
            DivisionLeader::Leader {
                player_id,
                name,
                total,
                played_percent,
            } => {
                assert_eq!(player_id, a);
                assert_eq!(name, "Ann A.");
                assert_eq!(total, 24.0);
                assert_eq!(played_percent, 50.0);
            }
            DivisionLeader::NoResults => panic!("expected a leader"),
        }
    }

    #[test]
    fn leader_tie_breaks_on_last_name_then_first_name() {
        let (zed, amy, x) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let mut rows = game(zed, x, 0);
        rows.extend(game(amy, x, 0));
        let names = HashMap::from([
            (zed, name("Aaron", "Zimmer")),
            (amy, name("Amy", "Abbott")),
            (x, name("Xavier", "Xu")),
        ]);

        for _ in 0..10 {
            match leader_from_rows(&rows, &names, 3) {
                DivisionLeader::Leader { player_id, .. } => assert_eq!(player_id, amy),
                DivisionLeader::NoResults => panic!("expected a leader"),
            }
        }
    }

    #[test]
    fn season_stats_collapse_mirrored_rows() {
        // one division of four members with three matches played
        let stats = SeasonAggregateStats::compute(&[4], 6);
        assert_eq!(stats.games_played, 3);
        assert_eq!(stats.total_possible_games, 6);
        assert_eq!(stats.percentage_played, 50.0);
        assert_eq!(stats.player_count, 4);
        assert_eq!(stats.divisions, 1);
    }

    #[test]
    fn season_stats_without_possible_games_report_zero() {
        let stats = SeasonAggregateStats::compute(&[1, 0], 0);
        assert_eq!(stats.total_possible_games, 0);
        assert_eq!(stats.percentage_played, 0.0);

        let stats = SeasonAggregateStats::compute(&[], 0);
        assert_eq!(stats.divisions, 0);
        assert_eq!(stats.percentage_played, 0.0);
    }

    #[test]
    fn division_stats_percent() {
        let stats = DivisionStats::compute(5, 8);
        assert_eq!(stats.matches_played, 4);
        assert_eq!(stats.total_matches, 10);
        assert_eq!(stats.percent_played, 40.0);
        assert_eq!(DivisionStats::compute(1, 0).percent_played, 0.0);
    }

    #[test]
    fn historical_average_adds_win_and_play_bonus() {
        // results 9, 4, 2 -> mean 5.0; bonus (1*2 + 3)/3 = 1.666..
        let stats = PlayerHistoricalStats::compute(&[9, 4, 2], &[4, 5]);
        assert_eq!(stats.played, 3);
        assert_eq!(stats.wins, 1);
        assert_eq!(stats.win_rate, Some(33.33));
        assert_eq!(stats.average, Some(6.67));
        // opportunities: (4-1) + (5-1) = 7
        assert_eq!(stats.completion_rate, Some(42.86));
    }

    #[test]
    fn historical_average_agrees_with_points_per_game() {
        // different formulas, same per-game value: mean + (2w + p)/p == sum(points)/p
        let results = [9, 9];
        let history = PlayerHistoricalStats::compute(&results, &[3]);
        let division = PlayerTotals::from_results(results);
        // mean 9 + bonus (4 + 2)/2 = 12, versus 12 points per win averaged
        assert_eq!(history.average, Some(12.0));
        assert_eq!(division.average, 12.0);

        let results = [0, 0];
        let history = PlayerHistoricalStats::compute(&results, &[3]);
        let division = PlayerTotals::from_results(results);
        assert_eq!(history.average, Some(1.0));
        assert_eq!(division.average, 1.0);

        let results = [9, 0];
        let history = PlayerHistoricalStats::compute(&results, &[3]);
        let division = PlayerTotals::from_results(results);
        assert_eq!(history.average, Some(6.5));
        assert_eq!(division.average, 6.5);

        let results = [5];
        let history = PlayerHistoricalStats::compute(&results, &[3]);
        let division = PlayerTotals::from_results(results);
        assert_eq!(history.average, Some(6.0));
        assert_eq!(division.average, 6.0);
    }

    #[test]
    fn historical_stats_for_new_player_are_empty() {
        let stats = PlayerHistoricalStats::compute(&[], &[6]);
        assert_eq!(stats.played, 0);
        assert_eq!(stats.win_rate, None);
        assert_eq!(stats.average, None);
        assert_eq!(stats.completion_rate, None);
    }

    #[test]
    fn standings_follow_roster_order() {
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());
        let members = vec![
            member(b, "Ben", "Baker", 10),
            member(a, "Ann", "Adams", 20),
            member(c, "Cat", "Cole", 30),
        ];
        let rows = game(a, b, 6);

        let table = standings_from_rows(&members, &rows);
        assert_eq!(table.len(), 3);
        assert_eq!(table[0].player_id, b);
        assert_eq!(table[0].total_points, 7.0);
        assert_eq!(table[0].games, 1);
        assert_eq!(table[0].played_percent, 50.0);
        assert_eq!(table[1].player_id, a);
        assert_eq!(table[1].total_points, 12.0);
        assert_eq!(table[1].wins, 1);
        assert_eq!(table[2].games, 0);
        assert_eq!(table[2].points_per_game, 0.0);
    }

    #[test]
    fn head_to_head_counts_from_loser_rows() {
        let (p, o) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rows = game(p, o, 3);
        rows.extend(game(o, p, 7));
        rows.extend(game(p, o, 8));

        let h2h = HeadToHead::compute(p, o, &rows);
        assert_eq!((h2h.won, h2h.lost, h2h.played), (2, 1, 3));

        let scores: Vec<i32> = h2h.results.iter().map(|r| r.result).collect();
        assert_eq!(scores, vec![3, 7, 8]);
        assert!(h2h.results.iter().all(|r| r.result < WIN));
    }
}

use std::collections::BTreeMap;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use crate::services::scoring::possible_matches;
use infra::models::SeasonRow;
use infra::repos::{divisions, match_results, memberships, seasons};

/// Matches played over the life of a season, bucketed by calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonProgress {
    pub season_length_days: i64,
    pub total_possible_matches: i64,
    /// Day offsets from the season start, ascending.
    pub played_days: Vec<i64>,
    /// Result rows recorded on each of `played_days` (two per match).
    pub played_counts: Vec<i64>,
    /// Running total of matches, i.e. rows halved.
    pub played_cumulative: Vec<f64>,
    pub latest_result_date: Option<NaiveDate>,
    pub today_offset_day: i64,
}

impl SeasonProgress {
    pub fn compute(
        start_date: NaiveDate,
        end_date: NaiveDate,
        result_dates: impl IntoIterator<Item = NaiveDate>,
        division_sizes: &[i64],
        today: NaiveDate,
    ) -> Self {
        let mut per_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
        for date in result_dates {
            *per_day.entry(date).or_insert(0) += 1;
        }

        let mut played_days = Vec::with_capacity(per_day.len());
        let mut played_counts = Vec::with_capacity(per_day.len());
        let mut played_cumulative = Vec::with_capacity(per_day.len());
        let mut running = 0.0;
        for (date, rows) in &per_day {
            played_days.push((*date - start_date).num_days());
            played_counts.push(*rows);
            running += *rows as f64 / 2.0;
            played_cumulative.push(running);
        }

        let season_length_days = (end_date - start_date).num_days().max(0);
        let today_offset_day = (today - start_date).num_days().clamp(0, season_length_days);

        Self {
            season_length_days,
            total_possible_matches: division_sizes.iter().map(|n| possible_matches(*n)).sum(),
            played_days,
            played_counts,
            played_cumulative,
            latest_result_date: per_day.keys().next_back().copied(),
            today_offset_day,
        }
    }
}

pub async fn season_progress(conn: &mut PgConnection, season_id: Uuid) -> LadderResult<SeasonProgress> {
    let season = seasons::get_by_id(&mut *conn, season_id)
        .await?
        .ok_or(LadderError::NotFound("Season"))?;

    season_progress_on(conn, &season, Utc::now().date_naive()).await
}

pub async fn season_progress_on(
    conn: &mut PgConnection,
    season: &SeasonRow,
    today: NaiveDate,
) -> LadderResult<SeasonProgress> {
    let rows = match_results::list_by_season(&mut *conn, season.id).await?;

    let mut sizes = Vec::new();
    for division in divisions::list_by_season(&mut *conn, season.id).await? {
        sizes.push(memberships::count_by_division(&mut *conn, division.id).await?);
    }

    Ok(SeasonProgress::compute(
        season.start_date,
        season.end_date,
        rows.iter().map(|r| r.date_added.date_naive()),
        &sizes,
        today,
    ))
}

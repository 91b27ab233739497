use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use infra::models::SeasonRow;
use infra::repos::{seasons, CreateSeason};

pub fn validate_new_season(data: &CreateSeason) -> LadderResult<()> {
    if data.name.trim().is_empty() {
        return Err(LadderError::validation("Season name is required"));
    }
    if data.end_date < data.start_date {
        return Err(LadderError::validation("Season cannot end before it starts"));
    }
    if data.season_round < 1 {
        return Err(LadderError::validation("Season round must be at least 1"));
    }
    Ok(())
}

/// New seasons start as drafts.
pub async fn create_season(
    pool: &PgPool,
    name: String,
    start_date: NaiveDate,
    end_date: NaiveDate,
    season_round: i32,
) -> LadderResult<SeasonRow> {
    let data = CreateSeason {
        name: name.trim().to_string(),
        start_date,
        end_date,
        season_round,
    };
    validate_new_season(&data)?;

    let season = seasons::create(pool, data).await?;
    tracing::info!(season_id = %season.id, "Created draft season {}", season.label());
    Ok(season)
}

pub async fn publish_season(pool: &PgPool, season_id: Uuid) -> LadderResult<SeasonRow> {
    let season = seasons::get_by_id(pool, season_id)
        .await?
        .ok_or(LadderError::NotFound("Season"))?;
    if !season.is_draft {
        return Err(LadderError::conflict(format!("{} is already published", season.label())));
    }

    let season = seasons::set_draft(pool, season_id, false)
        .await?
        .ok_or(LadderError::NotFound("Season"))?;
    tracing::info!(season_id = %season.id, "Published season {}", season.label());
    Ok(season)
}

pub async fn list_seasons(pool: &PgPool) -> LadderResult<Vec<SeasonRow>> {
    Ok(seasons::list(pool).await?)
}

pub async fn current_season(pool: &PgPool) -> LadderResult<Option<SeasonRow>> {
    Ok(seasons::get_latest(pool).await?)
}

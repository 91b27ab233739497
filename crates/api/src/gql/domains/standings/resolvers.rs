use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::gql::error::LadderResultExt;
use crate::services::{progress, scoring};
use crate::state::AppState;
use infra::repos::divisions;

use super::types::{
    DivisionLeader, DivisionStats, PlayerTotals, SeasonProgress, SeasonStats, Standing,
};

#[derive(Default)]
pub struct StandingsQuery;

#[Object]
impl StandingsQuery {
    /// Points for one player within one division of a season.
    async fn player_totals(
        &self,
        ctx: &Context<'_>,
        player_id: Uuid,
        season_id: Uuid,
        division_id: Uuid,
    ) -> Result<PlayerTotals> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let totals = scoring::player_totals(&mut conn, player_id, season_id, division_id)
            .await
            .gql()?;
        Ok(totals.into())
    }

    async fn division_leader(&self, ctx: &Context<'_>, division_id: Uuid) -> Result<DivisionLeader> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let division = divisions::get_by_id(&mut *conn, division_id)
            .await?
            .ok_or_else(|| async_graphql::Error::new("Division not found"))?;
        let leader = scoring::division_leader(&mut conn, division_id).await.gql()?;
        Ok(DivisionLeader::new(division.division, leader))
    }

    /// Leader of every division in the season, top division first.
    async fn season_leaders(&self, ctx: &Context<'_>, season_id: Uuid) -> Result<Vec<DivisionLeader>> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let leaders = scoring::season_leaders(&mut conn, season_id).await.gql()?;
        Ok(leaders
            .into_iter()
            .map(|(division, leader)| DivisionLeader::new(division, leader))
            .collect())
    }

    async fn season_stats(&self, ctx: &Context<'_>, season_id: Uuid) -> Result<SeasonStats> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let stats = scoring::season_aggregate_stats(&mut conn, season_id).await.gql()?;
        Ok(stats.into())
    }

    async fn division_stats(&self, ctx: &Context<'_>, division_id: Uuid) -> Result<DivisionStats> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let stats = scoring::division_stats(&mut conn, division_id).await.gql()?;
        Ok(stats.into())
    }

    /// Members in display order with their points.
    async fn division_standings(&self, ctx: &Context<'_>, division_id: Uuid) -> Result<Vec<Standing>> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let rows = scoring::division_standings(&mut conn, division_id).await.gql()?;
        Ok(rows.into_iter().map(Standing::from).collect())
    }

    async fn season_progress(&self, ctx: &Context<'_>, season_id: Uuid) -> Result<SeasonProgress> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let progress = progress::season_progress(&mut conn, season_id).await.gql()?;
        Ok(progress.into())
    }
}

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::gql::error::LadderResultExt;
use crate::gql::types::{Division, Season};
use crate::services::seasons;
use crate::state::AppState;
use infra::repos::divisions;

use super::types::CreateSeasonInput;

#[derive(Default)]
pub struct SeasonQuery;

#[Object]
impl SeasonQuery {
    /// All seasons, newest first.
    async fn seasons(&self, ctx: &Context<'_>) -> Result<Vec<Season>> {
        let state = ctx.data::<AppState>()?;
        let rows = seasons::list_seasons(&state.db).await.gql()?;
        Ok(rows.into_iter().map(Season::from).collect())
    }

    async fn season(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Season>> {
        let state = ctx.data::<AppState>()?;
        let row = infra::repos::seasons::get_by_id(&state.db, id).await.gql()?;
        Ok(row.map(Season::from))
    }

    /// The season with the latest start date.
    async fn current_season(&self, ctx: &Context<'_>) -> Result<Option<Season>> {
        let state = ctx.data::<AppState>()?;
        let row = seasons::current_season(&state.db).await.gql()?;
        Ok(row.map(Season::from))
    }

    async fn divisions(&self, ctx: &Context<'_>, season_id: Uuid) -> Result<Vec<Division>> {
        let state = ctx.data::<AppState>()?;
        let rows = divisions::list_by_season(&state.db, season_id).await.gql()?;
        Ok(rows.into_iter().map(Division::from).collect())
    }
}

#[derive(Default)]
pub struct SeasonMutation;

#[Object]
impl SeasonMutation {
    /// Creates a season in draft mode.
    async fn create_season(&self, ctx: &Context<'_>, input: CreateSeasonInput) -> Result<Season> {
        let state = ctx.data::<AppState>()?;
        let row = seasons::create_season(
            &state.db,
            input.name,
            input.start_date,
            input.end_date,
            input.season_round,
        )
        .await
        .gql()?;
        Ok(row.into())
    }

    async fn publish_season(&self, ctx: &Context<'_>, season_id: Uuid) -> Result<Season> {
        let state = ctx.data::<AppState>()?;
        let row = seasons::publish_season(&state.db, season_id).await.gql()?;
        Ok(row.into())
    }
}

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::gql::error::LadderResultExt;
use crate::gql::types::MatchResult;
use crate::services::results;
use crate::state::AppState;

use super::types::RecordMatchInput;

#[derive(Default)]
pub struct ResultQuery;

#[Object]
impl ResultQuery {
    /// Every result row in the division, both sides of each match.
    async fn division_results(&self, ctx: &Context<'_>, division_id: Uuid) -> Result<Vec<MatchResult>> {
        let state = ctx.data::<AppState>()?;
        let rows = results::list_division_results(&state.db, division_id).await.gql()?;
        Ok(rows.into_iter().map(MatchResult::from).collect())
    }
}

#[derive(Default)]
pub struct ResultMutation;

#[Object]
impl ResultMutation {
    /// Records a match, replacing any earlier result between the two players
    /// in that division. Returns the loser's row then the winner's.
    async fn record_match(&self, ctx: &Context<'_>, input: RecordMatchInput) -> Result<Vec<MatchResult>> {
        let state = ctx.data::<AppState>()?;
        let rows = results::record_match(&state.db, input.into()).await.gql()?;
        Ok(rows.into_iter().map(MatchResult::from).collect())
    }
}

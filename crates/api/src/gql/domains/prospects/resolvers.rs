use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::gql::error::LadderResultExt;
use crate::services::prospects;
use crate::state::AppState;

use super::types::{Prospect, ProspectStatus};

#[derive(Default)]
pub struct ProspectQuery;

#[Object]
impl ProspectQuery {
    /// Prospects not yet added or rejected.
    async fn prospect_candidates(&self, ctx: &Context<'_>) -> Result<Vec<Prospect>> {
        let state = ctx.data::<AppState>()?;
        let rows = prospects::list_candidates(&state.db).await.gql()?;
        Ok(rows.into_iter().map(Prospect::from).collect())
    }
}

#[derive(Default)]
pub struct ProspectMutation;

#[Object]
impl ProspectMutation {
    async fn create_prospect(
        &self,
        ctx: &Context<'_>,
        email: String,
        first_name: String,
        last_name: String,
    ) -> Result<Prospect> {
        let state = ctx.data::<AppState>()?;
        let row = prospects::create_prospect(&state.db, &email, &first_name, &last_name)
            .await
            .gql()?;
        Ok(row.into())
    }

    /// Manual lifecycle change. ADDED is set by inviting the prospect instead.
    async fn set_prospect_status(
        &self,
        ctx: &Context<'_>,
        prospect_id: Uuid,
        status: ProspectStatus,
    ) -> Result<Prospect> {
        let state = ctx.data::<AppState>()?;
        let row = prospects::set_prospect_status(&state.db, prospect_id, status.into())
            .await
            .gql()?;
        Ok(row.into())
    }
}

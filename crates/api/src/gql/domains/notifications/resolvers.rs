use async_graphql::{Context, Object, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::gql::error::LadderResultExt;
use crate::services::digest;
use crate::state::AppState;

use super::types::{CompletedMatch, Subscriber};

/// Reads for the external notifier. Nothing is sent from here.
#[derive(Default)]
pub struct NotificationQuery;

#[Object]
impl NotificationQuery {
    async fn has_new_results_since(
        &self,
        ctx: &Context<'_>,
        division_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<bool> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        digest::has_new_results_since(&mut conn, division_id, since).await.gql()
    }

    /// Most recent matches in the division, newest first.
    async fn latest_matches(
        &self,
        ctx: &Context<'_>,
        division_id: Uuid,
        limit: Option<i64>,
    ) -> Result<Vec<CompletedMatch>> {
        let state = ctx.data::<AppState>()?;
        let limit = limit.unwrap_or(10).clamp(1, 100);
        let mut conn = state.db.acquire().await.gql()?;
        let matches = digest::latest_matches(&mut conn, division_id, limit).await.gql()?;
        Ok(matches.into_iter().map(CompletedMatch::from).collect())
    }

    async fn division_subscribers(&self, ctx: &Context<'_>, division_id: Uuid) -> Result<Vec<Subscriber>> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let users = digest::subscribers_for(&mut conn, division_id).await.gql()?;
        Ok(users.into_iter().map(Subscriber::from).collect())
    }
}

use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::gql::error::LadderResultExt;
use crate::gql::types::Player;
use crate::services::{history, scoring};
use crate::state::AppState;
use infra::repos::players;

use super::types::{HeadToHead, Opponent, PlayerHistory};

#[derive(Default)]
pub struct PlayerQuery;

#[Object]
impl PlayerQuery {
    async fn player(&self, ctx: &Context<'_>, id: Uuid) -> Result<Option<Player>> {
        let state = ctx.data::<AppState>()?;
        let row = players::get_by_id(&state.db, id).await.gql()?;
        Ok(row.map(Player::from))
    }

    /// Every whitespace-separated term must match a first or last name.
    async fn search_players(
        &self,
        ctx: &Context<'_>,
        query: String,
        limit: Option<i64>,
    ) -> Result<Vec<Player>> {
        let state = ctx.data::<AppState>()?;
        let limit = limit.unwrap_or(20).clamp(1, 100);
        let rows = players::search(&state.db, &query, limit).await.gql()?;
        Ok(rows.into_iter().map(Player::from).collect())
    }

    async fn player_history(&self, ctx: &Context<'_>, player_id: Uuid) -> Result<PlayerHistory> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let stats = scoring::player_historical_stats(&mut conn, player_id).await.gql()?;
        let seasons = history::player_season_history(&mut conn, player_id).await.gql()?;
        let opponents =
            history::frequent_opponents(&mut conn, player_id, None, history::FREQUENT_OPPONENTS)
                .await
                .gql()?;
        Ok(PlayerHistory::new(stats, seasons, opponents))
    }

    /// Opponents the player has met, filtered by name, most played first.
    async fn frequent_opponents(
        &self,
        ctx: &Context<'_>,
        player_id: Uuid,
        query: Option<String>,
        limit: Option<i64>,
    ) -> Result<Vec<Opponent>> {
        let state = ctx.data::<AppState>()?;
        let limit = limit.unwrap_or(history::FREQUENT_OPPONENTS).clamp(1, 100);
        let mut conn = state.db.acquire().await.gql()?;
        let rows = history::frequent_opponents(&mut conn, player_id, query.as_deref(), limit)
            .await
            .gql()?;
        Ok(rows.into_iter().map(Opponent::from).collect())
    }

    async fn head_to_head(
        &self,
        ctx: &Context<'_>,
        player_id: Uuid,
        opponent_id: Uuid,
    ) -> Result<HeadToHead> {
        let state = ctx.data::<AppState>()?;
        let mut conn = state.db.acquire().await.gql()?;
        let record = scoring::head_to_head(&mut conn, player_id, opponent_id).await.gql()?;
        Ok(record.into())
    }
}

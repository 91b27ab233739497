use async_graphql::{ComplexObject, Context, Result, SimpleObject, ID};
use chrono::{DateTime, Utc};

use crate::gql::types::{load_player, Player};
use crate::services::digest;
use infra::models::UserRow;

/// One match, both result rows collapsed.
#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct CompletedMatch {
    pub winner_id: ID,
    pub loser_id: ID,
    pub loser_score: i32,
    pub date_added: DateTime<Utc>,
    pub inaccurate: bool,
}

impl From<digest::CompletedMatch> for CompletedMatch {
    fn from(m: digest::CompletedMatch) -> Self {
        Self {
            winner_id: m.winner_id.into(),
            loser_id: m.loser_id.into(),
            loser_score: m.loser_score,
            date_added: m.date_added,
            inaccurate: m.inaccurate,
        }
    }
}

#[ComplexObject]
impl CompletedMatch {
    async fn winner(&self, ctx: &Context<'_>) -> Result<Option<Player>> {
        load_player(ctx, &self.winner_id).await
    }

    async fn loser(&self, ctx: &Context<'_>) -> Result<Option<Player>> {
        load_player(ctx, &self.loser_id).await
    }
}

#[derive(SimpleObject, Clone)]
pub struct Subscriber {
    pub user_id: ID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl From<UserRow> for Subscriber {
    fn from(row: UserRow) -> Self {
        Self {
            user_id: row.id.into(),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

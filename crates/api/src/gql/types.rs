use async_graphql::dataloader::DataLoader;
use async_graphql::{ComplexObject, Context, Enum, Result, SimpleObject, ID};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::gql::error::ResultExt;
use crate::gql::loaders::PlayerLoader;
use crate::services::{DraftOutcome, OutcomeStatus};
use infra::models::{DivisionRow, MatchResultRow, MembershipWithPlayer, PlayerRow, SeasonRow};

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum CommandStatus {
    #[graphql(name = "SUCCESS")]
    Success,
    #[graphql(name = "WARNING")]
    Warning,
    #[graphql(name = "ERROR")]
    Error,
}

impl From<OutcomeStatus> for CommandStatus {
    fn from(status: OutcomeStatus) -> Self {
        match status {
            OutcomeStatus::Success => CommandStatus::Success,
            OutcomeStatus::Warning => CommandStatus::Warning,
            OutcomeStatus::Error => CommandStatus::Error,
        }
    }
}

/// Result of an operator command, ready to show as a flash message.
#[derive(SimpleObject, Clone)]
pub struct CommandOutcome {
    pub status: CommandStatus,
    pub message: String,
}

impl From<DraftOutcome> for CommandOutcome {
    fn from(outcome: DraftOutcome) -> Self {
        Self {
            status: outcome.status.into(),
            message: outcome.message,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Season {
    pub id: ID,
    pub name: String,
    pub label: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub season_round: i32,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
}

impl From<SeasonRow> for Season {
    fn from(row: SeasonRow) -> Self {
        Self {
            id: row.id.into(),
            label: row.label(),
            name: row.name,
            start_date: row.start_date,
            end_date: row.end_date,
            season_round: row.season_round,
            is_draft: row.is_draft,
            created_at: row.created_at,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Division {
    pub id: ID,
    pub season_id: ID,
    pub division: i32,
}

impl From<DivisionRow> for Division {
    fn from(row: DivisionRow) -> Self {
        Self {
            id: row.id.into(),
            season_id: row.season_id.into(),
            division: row.division,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Player {
    pub id: ID,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub has_account: bool,
}

impl From<PlayerRow> for Player {
    fn from(row: PlayerRow) -> Self {
        Self {
            id: row.id.into(),
            display_name: row.display_name(),
            has_account: row.user_id.is_some(),
            first_name: row.first_name,
            last_name: row.last_name,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Membership {
    pub id: ID,
    pub division_id: ID,
    pub season_id: ID,
    pub player_id: ID,
    pub sort_order: i32,
    pub display_name: String,
}

impl From<MembershipWithPlayer> for Membership {
    fn from(row: MembershipWithPlayer) -> Self {
        Self {
            id: row.id.into(),
            division_id: row.division_id.into(),
            season_id: row.season_id.into(),
            player_id: row.player_id.into(),
            sort_order: row.sort_order,
            display_name: infra::models::display_name(&row.first_name, &row.last_name),
        }
    }
}

/// One side of a recorded match.
#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct MatchResult {
    pub id: ID,
    pub division_id: ID,
    pub player_id: ID,
    pub opponent_id: ID,
    pub result: i32,
    pub is_win: bool,
    pub date_added: DateTime<Utc>,
    pub inaccurate: bool,
}

impl From<MatchResultRow> for MatchResult {
    fn from(row: MatchResultRow) -> Self {
        Self {
            id: row.id.into(),
            division_id: row.division_id.into(),
            player_id: row.player_id.into(),
            opponent_id: row.opponent_id.into(),
            result: row.result,
            is_win: row.result == crate::services::scoring::WIN,
            date_added: row.date_added,
            inaccurate: row.inaccurate,
        }
    }
}

#[ComplexObject]
impl MatchResult {
    async fn player(&self, ctx: &Context<'_>) -> Result<Option<Player>> {
        load_player(ctx, &self.player_id).await
    }

    async fn opponent(&self, ctx: &Context<'_>) -> Result<Option<Player>> {
        load_player(ctx, &self.opponent_id).await
    }
}

pub async fn load_player(ctx: &Context<'_>, id: &ID) -> Result<Option<Player>> {
    let id = Uuid::parse_str(id.as_str()).gql_err("Invalid player ID")?;
    let loader = ctx.data::<DataLoader<PlayerLoader>>()?;
    let player = loader.load_one(id).await.gql_err("Data loading failed")?;
    Ok(player.map(Player::from))
}

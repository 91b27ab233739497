use async_graphql::{Context, Object, Result};
use uuid::Uuid;

use crate::gql::error::LadderResultExt;
use crate::gql::types::{CommandOutcome, Membership};
use crate::services::roster_order::SwapOutcome;
use crate::services::DraftOutcome;
use crate::state::AppState;
use infra::repos::memberships;

#[derive(Default)]
pub struct DraftQuery;

#[Object]
impl DraftQuery {
    /// Members of a division in display order.
    async fn division_roster(&self, ctx: &Context<'_>, division_id: Uuid) -> Result<Vec<Membership>> {
        let state = ctx.data::<AppState>()?;
        let rows = memberships::list_by_division(&state.db, division_id).await.gql()?;
        Ok(rows.into_iter().map(Membership::from).collect())
    }
}

fn swap_outcome(outcome: SwapOutcome) -> DraftOutcome {
    match outcome {
        SwapOutcome::Swapped { .. } => DraftOutcome::success("Player moved"),
        SwapOutcome::AlreadyAtTop => DraftOutcome::warning("Player is already at the top"),
        SwapOutcome::AlreadyAtBottom => DraftOutcome::warning("Player is already at the bottom"),
    }
}

/// Roster commands. Each returns an outcome instead of failing the request,
/// so the client can always render a message.
#[derive(Default)]
pub struct DraftMutation;

#[Object]
impl DraftMutation {
    async fn add_player(
        &self,
        ctx: &Context<'_>,
        division_id: Uuid,
        player_id: Uuid,
    ) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let result = state.draft().add_player(division_id, player_id).await;
        Ok(DraftOutcome::from_result(result, |_| "Player added".to_string()).into())
    }

    async fn remove_player(&self, ctx: &Context<'_>, membership_id: Uuid) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let result = state.draft().remove_player(membership_id).await;
        Ok(DraftOutcome::from_result(result, |player| {
            format!("{} removed", player.display_name())
        })
        .into())
    }

    async fn promote(&self, ctx: &Context<'_>, membership_id: Uuid) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let result = state.draft().promote(membership_id).await;
        Ok(DraftOutcome::from_result(result, |moved| {
            format!("Promoted to division {}", moved.to_division)
        })
        .into())
    }

    async fn demote(&self, ctx: &Context<'_>, membership_id: Uuid) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let result = state.draft().demote(membership_id).await;
        Ok(DraftOutcome::from_result(result, |moved| {
            format!("Demoted to division {}", moved.to_division)
        })
        .into())
    }

    async fn move_up(&self, ctx: &Context<'_>, membership_id: Uuid) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let outcome = match state.draft().move_up(membership_id).await {
            Ok(swap) => swap_outcome(swap),
            Err(err) => DraftOutcome::from(err),
        };
        Ok(outcome.into())
    }

    async fn move_down(&self, ctx: &Context<'_>, membership_id: Uuid) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let outcome = match state.draft().move_down(membership_id).await {
            Ok(swap) => swap_outcome(swap),
            Err(err) => DraftOutcome::from(err),
        };
        Ok(outcome.into())
    }

    async fn add_division(&self, ctx: &Context<'_>, season_id: Uuid) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let result = state.draft().add_division(season_id).await;
        Ok(DraftOutcome::from_result(result, |division| {
            format!("Division {} added", division.division)
        })
        .into())
    }

    async fn delete_division(&self, ctx: &Context<'_>, division_id: Uuid) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let result = state.draft().delete_division(division_id).await;
        Ok(DraftOutcome::from_result(result, |division| {
            format!("Division {} deleted", division.division)
        })
        .into())
    }

    /// Seeds an empty draft season from the previous season's standings.
    async fn populate_from_previous(&self, ctx: &Context<'_>, season_id: Uuid) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let result = state.draft().populate_from_previous(season_id).await;
        Ok(DraftOutcome::from_result(result, |summary| {
            format!(
                "Copied {} players into {} divisions",
                summary.players, summary.divisions
            )
        })
        .into())
    }

    async fn invite_player_from_prospect(
        &self,
        ctx: &Context<'_>,
        division_id: Uuid,
        prospect_id: Uuid,
    ) -> Result<CommandOutcome> {
        let state = ctx.data::<AppState>()?;
        let result = state
            .draft()
            .invite_player_from_prospect(division_id, prospect_id)
            .await;
        Ok(DraftOutcome::from_result(result, |invite| {
            if invite.created_user {
                format!("{} invited with a new account", invite.player.display_name())
            } else {
                format!("{} added", invite.player.display_name())
            }
        })
        .into())
    }
}

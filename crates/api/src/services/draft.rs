//! Roster mutations for the draft phase of a season.
//!
//! Every command runs in its own transaction and row-locks the divisions it
//! touches, lowest division number first. Commands that enrol a player or
//! reshape a season lock the season row before any division. Errors roll the
//! whole command back; resolvers turn them into a `DraftOutcome`.

use std::cmp::Ordering;

use serde::Serialize;
use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use crate::services::identity::{backfill_names, is_plausible_email, normalize_email, IdentityNames};
use crate::services::roster_order::{Direction, Placement, RosterOrderingEngine, SwapOutcome};
use crate::services::scoring;
use infra::models::{DivisionRow, MembershipRow, PlayerRow, SeasonRow, UserRow};
use infra::repos::{
    divisions, match_results, memberships, players, prospects, seasons, subscriptions, users,
    CreatePlayer, CreateUser, ProspectStatus,
};

/// Role granted to every account invited onto a roster.
pub const PLAYER_ROLE: &str = "player";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shift {
    Promote,
    Demote,
}

impl Shift {
    fn target_number(self, current: i32) -> i32 {
        match self {
            Shift::Promote => current - 1,
            Shift::Demote => current + 1,
        }
    }

    /// Promoted players start at the bottom of the higher division, demoted
    /// players lead the lower one.
    fn placement(self) -> Placement {
        match self {
            Shift::Promote => Placement::Bottom,
            Shift::Demote => Placement::Top,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransferSummary {
    pub membership: MembershipRow,
    pub from_division: i32,
    pub to_division: i32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PopulateSummary {
    pub previous_season_id: Uuid,
    pub divisions: usize,
    pub players: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct InviteSummary {
    pub membership: MembershipRow,
    pub player: PlayerRow,
    pub user: UserRow,
    pub created_user: bool,
}

/// A previous-season member with the points used to seed the next season.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedCandidate {
    pub player_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub total: f64,
}

/// Seeding order for a carried-forward division: highest previous total
/// first, ties by last name then first name, then player id.
pub fn seeding_order(mut candidates: Vec<SeedCandidate>) -> Vec<Uuid> {
    candidates.sort_by(|a, b| {
        b.total
            .partial_cmp(&a.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.last_name.cmp(&b.last_name))
            .then_with(|| a.first_name.cmp(&b.first_name))
            .then_with(|| a.player_id.cmp(&b.player_id))
    });
    candidates.into_iter().map(|c| c.player_id).collect()
}

#[derive(Clone)]
pub struct DraftWorkspace {
    pool: PgPool,
}

impl DraftWorkspace {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn add_player(&self, division_id: Uuid, player_id: Uuid) -> LadderResult<MembershipRow> {
        let mut tx = self.pool.begin().await?;

        let division = lock_enrolling_division(&mut tx, division_id).await?;
        let player = players::get_by_id(&mut *tx, player_id)
            .await?
            .ok_or(LadderError::NotFound("Player"))?;

        let membership = enroll(&mut tx, &division, &player).await?;

        tx.commit().await?;

        tracing::info!(
            division_id = %division.id,
            player_id = %player.id,
            "Added {} to division {}",
            player.display_name(),
            division.division
        );
        Ok(membership)
    }

    pub async fn remove_player(&self, membership_id: Uuid) -> LadderResult<PlayerRow> {
        let mut tx = self.pool.begin().await?;

        let (membership, division) = lock_membership(&mut tx, membership_id).await?;
        let player = players::get_by_id(&mut *tx, membership.player_id)
            .await?
            .ok_or(LadderError::NotFound("Player"))?;

        if let Some(user_id) = player.user_id {
            subscriptions::delete(&mut *tx, user_id, division.id).await?;
        }
        RosterOrderingEngine::new(&mut tx).remove(&membership).await?;

        tx.commit().await?;

        tracing::info!(
            division_id = %division.id,
            player_id = %player.id,
            "Removed {} from division {}",
            player.display_name(),
            division.division
        );
        Ok(player)
    }

    pub async fn promote(&self, membership_id: Uuid) -> LadderResult<TransferSummary> {
        self.shift(membership_id, Shift::Promote).await
    }

    pub async fn demote(&self, membership_id: Uuid) -> LadderResult<TransferSummary> {
        self.shift(membership_id, Shift::Demote).await
    }

    async fn shift(&self, membership_id: Uuid, shift: Shift) -> LadderResult<TransferSummary> {
        let mut tx = self.pool.begin().await?;

        let current = memberships::get_by_id(&mut *tx, membership_id)
            .await?
            .ok_or(LadderError::NotFound("Membership"))?;
        let source = divisions::get_by_id(&mut *tx, current.division_id)
            .await?
            .ok_or(LadderError::NotFound("Division"))?;

        let target_number = shift.target_number(source.division);
        let target = divisions::get_by_number(&mut *tx, source.season_id, target_number)
            .await?
            .ok_or_else(|| {
                LadderError::conflict(format!(
                    "Division {target_number} does not exist; add it first"
                ))
            })?;

        // Lock in division-number order so concurrent moves cannot deadlock.
        let (first, second) = if source.division < target.division {
            (source.id, target.id)
        } else {
            (target.id, source.id)
        };
        lock_division(&mut tx, first).await?;
        lock_division(&mut tx, second).await?;

        let membership = memberships::get_by_id(&mut *tx, membership_id)
            .await?
            .ok_or(LadderError::NotFound("Membership"))?;
        if membership.division_id != source.id {
            return Err(LadderError::conflict(
                "Player was moved by another change; reload and try again",
            ));
        }

        let player = players::get_by_id(&mut *tx, membership.player_id)
            .await?
            .ok_or(LadderError::NotFound("Player"))?;

        let moved = RosterOrderingEngine::new(&mut tx)
            .transfer(&membership, &target, shift.placement())
            .await?;

        if let Some(user_id) = player.user_id {
            move_subscription(&mut tx, user_id, source.id, target.id).await?;
        }

        tx.commit().await?;

        tracing::info!(
            player_id = %player.id,
            "{} {} from division {} to {}",
            match shift {
                Shift::Promote => "Promoted",
                Shift::Demote => "Demoted",
            },
            player.display_name(),
            source.division,
            target.division
        );

        Ok(TransferSummary {
            membership: moved,
            from_division: source.division,
            to_division: target.division,
        })
    }

    pub async fn move_up(&self, membership_id: Uuid) -> LadderResult<SwapOutcome> {
        self.swap(membership_id, Direction::Up).await
    }

    pub async fn move_down(&self, membership_id: Uuid) -> LadderResult<SwapOutcome> {
        self.swap(membership_id, Direction::Down).await
    }

    async fn swap(&self, membership_id: Uuid, direction: Direction) -> LadderResult<SwapOutcome> {
        let mut tx = self.pool.begin().await?;

        let (membership, division) = lock_membership(&mut tx, membership_id).await?;
        let outcome = RosterOrderingEngine::new(&mut tx)
            .swap_adjacent(division.id, membership.id, direction)
            .await?;

        tx.commit().await?;

        tracing::debug!(
            division_id = %division.id,
            membership_id = %membership.id,
            ?direction,
            ?outcome,
            "Reordered division"
        );
        Ok(outcome)
    }

    pub async fn add_division(&self, season_id: Uuid) -> LadderResult<DivisionRow> {
        let mut tx = self.pool.begin().await?;

        let season = lock_season(&mut tx, season_id).await?;
        require_draft(&season)?;

        let number = divisions::max_number(&mut *tx, season.id).await?.map_or(1, |max| max + 1);
        let division = divisions::create(&mut *tx, season.id, number).await?;

        tx.commit().await?;

        tracing::info!(season_id = %season.id, "Added division {number} to {}", season.label());
        Ok(division)
    }

    pub async fn delete_division(&self, division_id: Uuid) -> LadderResult<DivisionRow> {
        let mut tx = self.pool.begin().await?;

        let division = lock_division(&mut tx, division_id).await?;

        if match_results::count_by_division(&mut *tx, division.id).await? > 0 {
            return Err(LadderError::conflict(format!(
                "Cannot delete division {}: it has results",
                division.division
            )));
        }

        let removed = memberships::delete_by_division(&mut *tx, division.id).await?;
        divisions::delete(&mut *tx, division.id).await?;

        tx.commit().await?;

        tracing::info!(
            division_id = %division.id,
            removed,
            "Deleted division {}",
            division.division
        );
        Ok(division)
    }

    /// Seeds an empty draft season from the most recent earlier season, each
    /// division ordered by the previous season's points.
    pub async fn populate_from_previous(&self, season_id: Uuid) -> LadderResult<PopulateSummary> {
        let mut tx = self.pool.begin().await?;

        let season = lock_season(&mut tx, season_id).await?;
        require_draft(&season)?;

        let previous = seasons::get_previous(&mut *tx, season.start_date)
            .await?
            .ok_or_else(|| LadderError::conflict("No earlier season to copy from; nothing changed"))?;

        if memberships::count_by_season(&mut *tx, season.id).await? > 0 {
            return Err(LadderError::conflict(format!(
                "{} already has players; nothing changed",
                season.label()
            )));
        }

        let mut division_count = 0;
        let mut player_count = 0;

        for old in divisions::list_by_season(&mut *tx, previous.id).await? {
            let members = memberships::list_by_division(&mut *tx, old.id).await?;

            let mut candidates = Vec::with_capacity(members.len());
            for member in &members {
                let totals = scoring::player_totals(&mut tx, member.player_id, previous.id, old.id).await?;
                candidates.push(SeedCandidate {
                    player_id: member.player_id,
                    first_name: member.first_name.clone(),
                    last_name: member.last_name.clone(),
                    total: totals.total,
                });
            }
            let order = seeding_order(candidates);

            let target = match divisions::get_by_number(&mut *tx, season.id, old.division).await? {
                Some(existing) => existing,
                None => divisions::create(&mut *tx, season.id, old.division).await?,
            };
            RosterOrderingEngine::new(&mut tx).seed(&target, &order).await?;

            for user_id in members.iter().filter_map(|m| m.user_id) {
                subscriptions::create(&mut *tx, user_id, target.id).await?;
            }

            division_count += 1;
            player_count += order.len();
        }

        tx.commit().await?;

        tracing::info!(
            season_id = %season.id,
            previous_season_id = %previous.id,
            "Populated {} from {}: {player_count} players in {division_count} divisions",
            season.label(),
            previous.label()
        );

        Ok(PopulateSummary {
            previous_season_id: previous.id,
            divisions: division_count,
            players: player_count,
        })
    }

    /// Turns a prospect into a rostered player, creating the account and
    /// player record when they do not exist yet.
    pub async fn invite_player_from_prospect(
        &self,
        division_id: Uuid,
        prospect_id: Uuid,
    ) -> LadderResult<InviteSummary> {
        let mut tx = self.pool.begin().await?;

        let division = lock_enrolling_division(&mut tx, division_id).await?;
        let prospect = prospects::get_by_id(&mut *tx, prospect_id)
            .await?
            .ok_or(LadderError::NotFound("Prospect"))?;

        let invitable = prospect.status != ProspectStatus::Added
            && prospect.status.can_transition_to(ProspectStatus::Added);
        if !invitable {
            return Err(LadderError::conflict(format!(
                "Prospect {} is already {}",
                prospect.email,
                prospect.status.as_str()
            )));
        }

        let email = normalize_email(&prospect.email);
        if !is_plausible_email(&email) {
            return Err(LadderError::validation(format!(
                "Prospect has an invalid e-mail address: {}",
                prospect.email
            )));
        }

        let offered = IdentityNames {
            first_name: prospect.first_name.clone(),
            last_name: prospect.last_name.clone(),
        };

        // Resolve or create the account
        let (user, created_user) = match users::find_by_email(&mut *tx, &email).await? {
            Some(existing) => {
                let patch = backfill_names(&existing, &offered);
                if patch.is_empty() {
                    (existing, false)
                } else {
                    let updated = users::update_names(&mut *tx, existing.id, patch)
                        .await?
                        .ok_or(LadderError::NotFound("User"))?;
                    (updated, false)
                }
            }
            None => {
                let created = users::create(
                    &mut *tx,
                    CreateUser {
                        email: email.clone(),
                        first_name: offered.first_name.trim().to_string(),
                        last_name: offered.last_name.trim().to_string(),
                    },
                )
                .await?;
                (created, true)
            }
        };
        users::add_to_role(&mut *tx, user.id, PLAYER_ROLE).await?;

        // Resolve or create the player
        let player = match players::get_by_user_id(&mut *tx, user.id).await? {
            Some(player) => player,
            None => {
                players::create(
                    &mut *tx,
                    CreatePlayer {
                        first_name: user.first_name.clone(),
                        last_name: user.last_name.clone(),
                        user_id: Some(user.id),
                    },
                )
                .await?
            }
        };

        let membership = enroll(&mut tx, &division, &player).await.map_err(|err| match err {
            LadderError::Validation(msg) => LadderError::Conflict(msg),
            other => other,
        })?;

        prospects::set_status(&mut *tx, prospect.id, ProspectStatus::Added).await?;

        tx.commit().await?;

        tracing::info!(
            division_id = %division.id,
            player_id = %player.id,
            created_user,
            "Invited {} into division {}",
            player.display_name(),
            division.division
        );

        Ok(InviteSummary {
            membership,
            player,
            user,
            created_user,
        })
    }
}

async fn lock_division(conn: &mut PgConnection, division_id: Uuid) -> LadderResult<DivisionRow> {
    divisions::lock(&mut *conn, division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))
}

async fn lock_season(conn: &mut PgConnection, season_id: Uuid) -> LadderResult<SeasonRow> {
    seasons::lock(&mut *conn, season_id)
        .await?
        .ok_or(LadderError::NotFound("Season"))
}

/// Locks the season before the division so two enrolments of the same player
/// into different divisions of one season run one after the other.
async fn lock_enrolling_division(conn: &mut PgConnection, division_id: Uuid) -> LadderResult<DivisionRow> {
    let seen = divisions::get_by_id(&mut *conn, division_id)
        .await?
        .ok_or(LadderError::NotFound("Division"))?;
    lock_season(conn, seen.season_id).await?;
    lock_division(conn, division_id).await
}

/// Locks the membership's division, then re-reads the membership so the row
/// cannot have moved between the lookup and the lock.
async fn lock_membership(
    conn: &mut PgConnection,
    membership_id: Uuid,
) -> LadderResult<(MembershipRow, DivisionRow)> {
    let seen = memberships::get_by_id(&mut *conn, membership_id)
        .await?
        .ok_or(LadderError::NotFound("Membership"))?;
    let division = lock_division(conn, seen.division_id).await?;

    let membership = memberships::get_by_id(&mut *conn, membership_id)
        .await?
        .ok_or(LadderError::NotFound("Membership"))?;
    if membership.division_id != division.id {
        return Err(LadderError::conflict(
            "Player was moved by another change; reload and try again",
        ));
    }
    Ok((membership, division))
}

fn require_draft(season: &SeasonRow) -> LadderResult<()> {
    if season.is_draft {
        Ok(())
    } else {
        Err(LadderError::conflict(format!(
            "{} is published; divisions can only be changed while it is a draft",
            season.label()
        )))
    }
}

/// Adds the player at the bottom of the division and subscribes their
/// account. Fails when the player already plays somewhere this season.
async fn enroll(
    conn: &mut PgConnection,
    division: &DivisionRow,
    player: &PlayerRow,
) -> LadderResult<MembershipRow> {
    if let Some(existing) = memberships::find_in_season(&mut *conn, division.season_id, player.id).await? {
        let number = divisions::get_by_id(&mut *conn, existing.division_id)
            .await?
            .map(|d| d.division);
        return Err(LadderError::validation(match number {
            Some(n) => format!(
                "{} is already in division {n} this season",
                player.display_name()
            ),
            None => format!("{} is already rostered this season", player.display_name()),
        }));
    }

    let membership = RosterOrderingEngine::new(&mut *conn)
        .insert(division, player.id, Placement::Bottom)
        .await?;

    if let Some(user_id) = player.user_id {
        subscriptions::create(&mut *conn, user_id, division.id).await?;
    }
    Ok(membership)
}

/// Re-points the account's subscription at the target division without
/// leaving a duplicate behind.
async fn move_subscription(
    conn: &mut PgConnection,
    user_id: Uuid,
    from_division_id: Uuid,
    to_division_id: Uuid,
) -> LadderResult<()> {
    if subscriptions::exists(&mut *conn, user_id, to_division_id).await? {
        subscriptions::delete(&mut *conn, user_id, from_division_id).await?;
    } else if !subscriptions::move_to_division(&mut *conn, user_id, from_division_id, to_division_id)
        .await?
    {
        subscriptions::create(&mut *conn, user_id, to_division_id).await?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(first: &str, last: &str, total: f64) -> SeedCandidate {
        SeedCandidate {
            player_id: Uuid::new_v4(),
            first_name: first.to_string(),
            last_name: last.to_string(),
            total,
        }
    }

    #[test]
    fn seeds_by_total_then_surname() {
        let c = candidate("Cara", "Clark", 15.0);
        let b = candidate("Ben", "Baker", 20.0);
        let a = candidate("Ann", "Adams", 20.0);
        let expected = vec![a.player_id, b.player_id, c.player_id];

        assert_eq!(seeding_order(vec![c, b, a]), expected);
    }

    #[test]
    fn first_name_breaks_surname_ties() {
        let zed = candidate("Zed", "Smith", 12.0);
        let amy = candidate("Amy", "Smith", 12.0);
        let expected = vec![amy.player_id, zed.player_id];

        assert_eq!(seeding_order(vec![zed, amy]), expected);
    }

    #[test]
    fn players_without_results_seed_last() {
        let idle = candidate("Ian", "Able", 0.0);
        let active = candidate("Zoe", "Zane", 3.0);
        let expected = vec![active.player_id, idle.player_id];

        assert_eq!(seeding_order(vec![idle, active]), expected);
    }

    #[test]
    fn promote_goes_up_to_the_bottom_demote_goes_down_to_the_top() {
        assert_eq!(Shift::Promote.target_number(3), 2);
        assert_eq!(Shift::Promote.placement(), Placement::Bottom);
        assert_eq!(Shift::Demote.target_number(3), 4);
        assert_eq!(Shift::Demote.placement(), Placement::Top);
    }
}

//! Display order of the members of a division.
//!
//! `sort_order` is only ever written from this module. Values are not unique
//! while an operation is in flight; every structural change finishes with a
//! renumber that rewrites the division to 10, 20, 30, ... in visual order
//! (sort_order, last name, first name, id). Names compare byte-wise, the same
//! way `memberships::list_by_division` orders them.

use std::cmp::Ordering;

use serde::Serialize;
use sqlx::PgConnection;
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use infra::models::{DivisionRow, MembershipRow, MembershipWithPlayer};
use infra::repos::{memberships, memberships::CreateMembership};

pub const STEP: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Direction {
    Up,
    Down,
}

/// Where a player lands when entering a division.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SwapOutcome {
    Swapped { with: Uuid },
    AlreadyAtTop,
    AlreadyAtBottom,
}

fn visual_cmp(a: &MembershipWithPlayer, b: &MembershipWithPlayer) -> Ordering {
    a.sort_order
        .cmp(&b.sort_order)
        .then_with(|| a.last_name.cmp(&b.last_name))
        .then_with(|| a.first_name.cmp(&b.first_name))
        .then_with(|| a.id.cmp(&b.id))
}

pub fn sort_visual(members: &mut [MembershipWithPlayer]) {
    members.sort_by(visual_cmp);
}

/// Slot below the current last member.
pub fn next_sort_order(members: &[MembershipWithPlayer]) -> i32 {
    members
        .iter()
        .map(|m| m.sort_order)
        .max()
        .map_or(STEP, |last| last + STEP)
}

/// Slot above the current first member.
pub fn top_sort_order(members: &[MembershipWithPlayer]) -> i32 {
    members
        .iter()
        .map(|m| m.sort_order)
        .min()
        .map_or(STEP, |first| first - STEP)
}

/// Writes needed to bring the division to 10, 20, 30, ... in visual order.
/// Members already holding their target value are left out.
pub fn renumber_plan(members: &[MembershipWithPlayer]) -> Vec<(Uuid, i32)> {
    let mut ordered = members.to_vec();
    sort_visual(&mut ordered);

    ordered
        .iter()
        .enumerate()
        .filter_map(|(index, member)| {
            let target = (index as i32 + 1) * STEP;
            (member.sort_order != target).then_some((member.id, target))
        })
        .collect()
}

/// Final writes for swapping a member with its visual neighbour. The division
/// is normalised first so ties cannot hide the neighbour.
pub fn swap_plan(
    members: &[MembershipWithPlayer],
    membership_id: Uuid,
    direction: Direction,
) -> LadderResult<(SwapOutcome, Vec<(Uuid, i32)>)> {
    let mut ordered = members.to_vec();
    sort_visual(&mut ordered);

    let index = ordered
        .iter()
        .position(|m| m.id == membership_id)
        .ok_or(LadderError::NotFound("Membership"))?;

    let neighbour = match direction {
        Direction::Up if index == 0 => return Ok((SwapOutcome::AlreadyAtTop, Vec::new())),
        Direction::Down if index + 1 == ordered.len() => {
            return Ok((SwapOutcome::AlreadyAtBottom, Vec::new()))
        }
        Direction::Up => index - 1,
        Direction::Down => index + 1,
    };

    let with = ordered[neighbour].id;
    ordered.swap(index, neighbour);

    let writes = ordered
        .iter()
        .enumerate()
        .filter_map(|(position, member)| {
            let target = (position as i32 + 1) * STEP;
            (member.sort_order != target).then_some((member.id, target))
        })
        .collect();

    Ok((SwapOutcome::Swapped { with }, writes))
}

/// Checks the renumbered invariant: strictly increasing multiples of STEP.
pub fn verify_renumbered(sort_orders: &[i32]) -> LadderResult<()> {
    for (index, value) in sort_orders.iter().enumerate() {
        let expected = (index as i32 + 1) * STEP;
        if *value != expected {
            return Err(LadderError::invariant(format!(
                "sort_order {value} at position {} (expected {expected})",
                index + 1
            )));
        }
    }
    Ok(())
}

/// Store-backed ordering operations. Borrow the transaction's connection so
/// every write lands in the caller's transaction.
pub struct RosterOrderingEngine<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> RosterOrderingEngine<'c> {
    pub fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    pub async fn next_sort_order(&mut self, division_id: Uuid) -> LadderResult<i32> {
        let members = memberships::list_by_division(&mut *self.conn, division_id).await?;
        Ok(next_sort_order(&members))
    }

    pub async fn top_sort_order(&mut self, division_id: Uuid) -> LadderResult<i32> {
        let members = memberships::list_by_division(&mut *self.conn, division_id).await?;
        Ok(top_sort_order(&members))
    }

    /// Returns the number of rows rewritten.
    pub async fn renumber(&mut self, division_id: Uuid) -> LadderResult<usize> {
        let members = memberships::list_by_division(&mut *self.conn, division_id).await?;
        let plan = renumber_plan(&members);
        self.apply(&plan).await?;
        self.verify(division_id).await?;
        Ok(plan.len())
    }

    pub async fn swap_adjacent(
        &mut self,
        division_id: Uuid,
        membership_id: Uuid,
        direction: Direction,
    ) -> LadderResult<SwapOutcome> {
        let members = memberships::list_by_division(&mut *self.conn, division_id).await?;
        let (outcome, plan) = swap_plan(&members, membership_id, direction)?;
        if matches!(outcome, SwapOutcome::Swapped { .. }) {
            self.apply(&plan).await?;
            self.renumber(division_id).await?;
        }
        Ok(outcome)
    }

    /// Adds a player to the division at the top or bottom slot.
    pub async fn insert(
        &mut self,
        division: &DivisionRow,
        player_id: Uuid,
        placement: Placement,
    ) -> LadderResult<MembershipRow> {
        let sort_order = self.slot(division.id, placement).await?;
        let membership = memberships::create(
            &mut *self.conn,
            CreateMembership {
                division_id: division.id,
                season_id: division.season_id,
                player_id,
                sort_order,
            },
        )
        .await?;
        self.renumber(division.id).await?;
        Ok(membership)
    }

    /// Moves a membership into another division of the same season.
    pub async fn transfer(
        &mut self,
        membership: &MembershipRow,
        target: &DivisionRow,
        placement: Placement,
    ) -> LadderResult<MembershipRow> {
        if membership.season_id != target.season_id {
            return Err(LadderError::invariant("transfer across seasons"));
        }

        let sort_order = self.slot(target.id, placement).await?;
        let moved =
            memberships::move_to_division(&mut *self.conn, membership.id, target.id, sort_order).await?;
        self.renumber(membership.division_id).await?;
        self.renumber(target.id).await?;
        Ok(moved)
    }

    pub async fn remove(&mut self, membership: &MembershipRow) -> LadderResult<()> {
        memberships::delete(&mut *self.conn, membership.id).await?;
        self.renumber(membership.division_id).await?;
        Ok(())
    }

    /// Fills an empty division with players already in final order.
    pub async fn seed(
        &mut self,
        division: &DivisionRow,
        ordered_players: &[Uuid],
    ) -> LadderResult<Vec<MembershipRow>> {
        let mut created = Vec::with_capacity(ordered_players.len());
        for (index, player_id) in ordered_players.iter().enumerate() {
            let row = memberships::create(
                &mut *self.conn,
                CreateMembership {
                    division_id: division.id,
                    season_id: division.season_id,
                    player_id: *player_id,
                    sort_order: (index as i32 + 1) * STEP,
                },
            )
            .await?;
            created.push(row);
        }
        self.verify(division.id).await?;
        Ok(created)
    }

    async fn slot(&mut self, division_id: Uuid, placement: Placement) -> LadderResult<i32> {
        match placement {
            Placement::Top => self.top_sort_order(division_id).await,
            Placement::Bottom => self.next_sort_order(division_id).await,
        }
    }

    async fn apply(&mut self, plan: &[(Uuid, i32)]) -> LadderResult<()> {
        for (membership_id, sort_order) in plan {
            memberships::set_sort_order(&mut *self.conn, *membership_id, *sort_order).await?;
        }
        Ok(())
    }

    async fn verify(&mut self, division_id: Uuid) -> LadderResult<()> {
        let members = memberships::list_by_division(&mut *self.conn, division_id).await?;
        let orders: Vec<i32> = members.iter().map(|m| m.sort_order).collect();
        verify_renumbered(&orders)
    }
}

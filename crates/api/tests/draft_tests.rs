mod common;

use chrono::{Duration, Utc};
use common::*;

use api::error::LadderError;
use api::services::results::{record_match, RecordMatch};
use api::services::roster_order::SwapOutcome;
use infra::repos::{
    divisions, match_results, memberships, prospects, subscriptions, users, CreateProspect,
    ProspectStatus,
};

fn sort_orders(rows: &[infra::models::MembershipWithPlayer]) -> Vec<i32> {
    rows.iter().map(|m| m.sort_order).collect()
}

#[tokio::test]
async fn add_player_appends_and_subscribes_linked_players() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let division = create_division(&state, season.id, 1).await;

    let first = create_player(&state, "Ann", "Zeta").await;
    let (second, user) = create_linked_player(&state, "Bob", "Alpha").await;

    let draft = state.draft();
    draft.add_player(division.id, first.id).await.unwrap();
    let added = draft.add_player(division.id, second.id).await.unwrap();

    let roster = memberships::list_by_division(&state.db, division.id).await.unwrap();
    assert_eq!(sort_orders(&roster), vec![10, 20]);
    assert_eq!(roster[1].id, added.id, "new players go to the bottom");

    assert!(subscriptions::exists(&state.db, user.id, division.id).await.unwrap());
}

#[tokio::test]
async fn add_player_rejects_second_membership_in_season() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let top = create_division(&state, season.id, 1).await;
    let lower = create_division(&state, season.id, 2).await;
    let player = create_player(&state, "Cara", "Clark").await;

    let draft = state.draft();
    draft.add_player(top.id, player.id).await.unwrap();

    let err = draft.add_player(lower.id, player.id).await.unwrap_err();
    assert!(matches!(err, LadderError::Validation(_)), "got {err:?}");

    assert_eq!(memberships::count_by_division(&state.db, lower.id).await.unwrap(), 0);
    assert_eq!(memberships::count_by_season(&state.db, season.id).await.unwrap(), 1);
}

#[tokio::test]
async fn remove_player_renumbers_and_drops_subscription() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let division = create_division(&state, season.id, 1).await;

    let draft = state.draft();
    let a = create_player(&state, "A", "Able").await;
    let (b, user) = create_linked_player(&state, "B", "Baker").await;
    let c = create_player(&state, "C", "Cole").await;
    draft.add_player(division.id, a.id).await.unwrap();
    let middle = draft.add_player(division.id, b.id).await.unwrap();
    draft.add_player(division.id, c.id).await.unwrap();

    draft.remove_player(middle.id).await.unwrap();

    let roster = memberships::list_by_division(&state.db, division.id).await.unwrap();
    assert_eq!(sort_orders(&roster), vec![10, 20]);
    assert_eq!(roster[1].player_id, c.id);
    assert!(!subscriptions::exists(&state.db, user.id, division.id).await.unwrap());
}

#[tokio::test]
async fn promote_then_demote_round_trips() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let top = create_division(&state, season.id, 1).await;
    let lower = create_division(&state, season.id, 2).await;

    let draft = state.draft();
    for (first, last) in [("Top", "One"), ("Top", "Two")] {
        let p = create_player(&state, first, last).await;
        draft.add_player(top.id, p.id).await.unwrap();
    }
    let (mover, user) = create_linked_player(&state, "Moe", "Mover").await;
    let membership = draft.add_player(lower.id, mover.id).await.unwrap();
    let other = create_player(&state, "Low", "Other").await;
    draft.add_player(lower.id, other.id).await.unwrap();

    let promoted = draft.promote(membership.id).await.unwrap();
    assert_eq!((promoted.from_division, promoted.to_division), (2, 1));

    let top_roster = memberships::list_by_division(&state.db, top.id).await.unwrap();
    assert_eq!(top_roster.len(), 3);
    assert_eq!(top_roster.last().map(|m| m.player_id), Some(mover.id), "promoted to the bottom");
    assert_eq!(sort_orders(&top_roster), vec![10, 20, 30]);
    assert_eq!(sort_orders(&memberships::list_by_division(&state.db, lower.id).await.unwrap()), vec![10]);
    assert!(subscriptions::exists(&state.db, user.id, top.id).await.unwrap());
    assert!(!subscriptions::exists(&state.db, user.id, lower.id).await.unwrap());

    let demoted = draft.demote(membership.id).await.unwrap();
    assert_eq!((demoted.from_division, demoted.to_division), (1, 2));

    let lower_roster = memberships::list_by_division(&state.db, lower.id).await.unwrap();
    assert_eq!(lower_roster.len(), 2);
    assert_eq!(lower_roster[0].player_id, mover.id, "demoted to the top");
    assert_eq!(memberships::count_by_division(&state.db, top.id).await.unwrap(), 2);
    assert!(subscriptions::exists(&state.db, user.id, lower.id).await.unwrap());
    assert!(!subscriptions::exists(&state.db, user.id, top.id).await.unwrap());
}

#[tokio::test]
async fn promote_from_top_division_is_a_conflict() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let top = create_division(&state, season.id, 1).await;
    let player = create_player(&state, "Solo", "Top").await;

    let draft = state.draft();
    let membership = draft.add_player(top.id, player.id).await.unwrap();

    let err = draft.promote(membership.id).await.unwrap_err();
    assert!(matches!(err, LadderError::Conflict(_)), "got {err:?}");

    let unchanged = memberships::get_by_id(&state.db, membership.id).await.unwrap().unwrap();
    assert_eq!(unchanged.division_id, top.id);
}

#[tokio::test]
async fn move_up_and_down_swap_neighbours() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let division = create_division(&state, season.id, 1).await;

    let draft = state.draft();
    let mut ids = Vec::new();
    for last in ["Ash", "Birch", "Cedar"] {
        let p = create_player(&state, "Tree", last).await;
        ids.push(draft.add_player(division.id, p.id).await.unwrap().id);
    }

    assert_eq!(draft.move_up(ids[0]).await.unwrap(), SwapOutcome::AlreadyAtTop);
    assert_eq!(draft.move_down(ids[2]).await.unwrap(), SwapOutcome::AlreadyAtBottom);

    let outcome = draft.move_up(ids[2]).await.unwrap();
    assert_eq!(outcome, SwapOutcome::Swapped { with: ids[1] });

    let roster = memberships::list_by_division(&state.db, division.id).await.unwrap();
    let order: Vec<_> = roster.iter().map(|m| m.id).collect();
    assert_eq!(order, vec![ids[0], ids[2], ids[1]]);
    assert_eq!(sort_orders(&roster), vec![10, 20, 30]);
}

#[tokio::test]
async fn add_division_numbers_after_the_last_and_needs_a_draft() {
    let Some(state) = setup_test_db().await else { return };
    let draft = state.draft();

    let season = create_season(&state, isolated_start_date(), true).await;
    assert_eq!(draft.add_division(season.id).await.unwrap().division, 1);
    create_division(&state, season.id, 5).await;
    assert_eq!(draft.add_division(season.id).await.unwrap().division, 6);

    let published = create_season(&state, isolated_start_date(), false).await;
    let err = draft.add_division(published.id).await.unwrap_err();
    assert!(matches!(err, LadderError::Conflict(_)), "got {err:?}");
}

#[tokio::test]
async fn delete_division_with_results_is_refused() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let division = create_division(&state, season.id, 1).await;

    let draft = state.draft();
    let a = create_player(&state, "Win", "Ner").await;
    let b = create_player(&state, "Lo", "Ser").await;
    draft.add_player(division.id, a.id).await.unwrap();
    draft.add_player(division.id, b.id).await.unwrap();

    record_match(
        &state.db,
        RecordMatch {
            division_id: division.id,
            loser_id: b.id,
            winner_id: a.id,
            loser_score: 5,
            inaccurate: false,
            date_added: Utc::now(),
        },
    )
    .await
    .unwrap();

    let err = draft.delete_division(division.id).await.unwrap_err();
    assert!(matches!(err, LadderError::Conflict(_)), "got {err:?}");

    assert!(divisions::get_by_id(&state.db, division.id).await.unwrap().is_some());
    assert_eq!(memberships::count_by_division(&state.db, division.id).await.unwrap(), 2);
    assert_eq!(match_results::count_by_division(&state.db, division.id).await.unwrap(), 2);
}

#[tokio::test]
async fn delete_empty_division_removes_its_members() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let division = create_division(&state, season.id, 1).await;
    let player = create_player(&state, "Gone", "Soon").await;

    let draft = state.draft();
    draft.add_player(division.id, player.id).await.unwrap();
    draft.delete_division(division.id).await.unwrap();

    assert!(divisions::get_by_id(&state.db, division.id).await.unwrap().is_none());
    assert_eq!(memberships::count_by_season(&state.db, season.id).await.unwrap(), 0);
}

#[tokio::test]
async fn populate_orders_by_previous_points_then_surname() {
    let Some(state) = setup_test_db().await else { return };
    let start = isolated_start_date();
    let previous = create_season(&state, start, false).await;
    let old_division = create_division(&state, previous.id, 1).await;

    let a = create_player(&state, "Amy", "Adams").await;
    let b = create_player(&state, "Ben", "Baker").await;
    let c = create_player(&state, "Cal", "Clark").await;
    let d = create_player(&state, "Dan", "Dunn").await;
    for p in [&c, &b, &a, &d] {
        memberships::create(
            &state.db,
            infra::repos::CreateMembership {
                division_id: old_division.id,
                season_id: previous.id,
                player_id: p.id,
                sort_order: 10,
            },
        )
        .await
        .unwrap();
    }

    // A: 12 + 8 = 20, B: 12 + 8 = 20, C: 12 + 3 = 15, D: 1 + 12 = 13.
    for (winner, loser, score) in [(&a, &d, 0), (&b, &a, 7), (&c, &b, 7), (&d, &c, 2)] {
        record_match(
            &state.db,
            RecordMatch {
                division_id: old_division.id,
                loser_id: loser.id,
                winner_id: winner.id,
                loser_score: score,
                inaccurate: false,
                date_added: Utc::now(),
            },
        )
        .await
        .unwrap();
    }

    let next = create_season(&state, start + Duration::days(1), true).await;
    let summary = state.draft().populate_from_previous(next.id).await.unwrap();
    assert_eq!(summary.previous_season_id, previous.id);
    assert_eq!((summary.divisions, summary.players), (1, 4));

    let new_division = divisions::get_by_number(&state.db, next.id, 1).await.unwrap().unwrap();
    let roster = memberships::list_by_division(&state.db, new_division.id).await.unwrap();
    let order: Vec<_> = roster.iter().map(|m| m.player_id).collect();
    assert_eq!(order, vec![a.id, b.id, c.id, d.id]);
    assert_eq!(sort_orders(&roster), vec![10, 20, 30, 40]);
}

#[tokio::test]
async fn populate_refuses_when_season_has_players() {
    let Some(state) = setup_test_db().await else { return };
    let start = isolated_start_date();
    let previous = create_season(&state, start, false).await;
    create_division(&state, previous.id, 1).await;

    let next = create_season(&state, start + Duration::days(1), true).await;
    let division = create_division(&state, next.id, 1).await;
    let player = create_player(&state, "Early", "Bird").await;
    state.draft().add_player(division.id, player.id).await.unwrap();

    let err = state.draft().populate_from_previous(next.id).await.unwrap_err();
    assert!(matches!(err, LadderError::Conflict(_)), "got {err:?}");
    assert_eq!(memberships::count_by_season(&state.db, next.id).await.unwrap(), 1);
}

#[tokio::test]
async fn invite_prospect_backfills_account_and_marks_added() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let division = create_division(&state, season.id, 1).await;

    let existing = create_user(&state, "", "Known").await;
    let prospect = prospects::create(
        &state.db,
        CreateProspect {
            email: existing.email.to_uppercase(),
            first_name: "Pat".to_string(),
            last_name: "Different".to_string(),
        },
    )
    .await
    .unwrap();

    let invite = state
        .draft()
        .invite_player_from_prospect(division.id, prospect.id)
        .await
        .unwrap();

    assert!(!invite.created_user);
    assert_eq!(invite.user.id, existing.id);
    assert_eq!(invite.user.first_name, "Pat", "blank name is filled");
    assert_eq!(invite.user.last_name, "Known", "existing name is kept");
    assert_eq!(invite.player.user_id, Some(existing.id));

    let roles = users::list_roles(&state.db, existing.id).await.unwrap();
    assert!(roles.iter().any(|r| r == "player"));
    assert!(subscriptions::exists(&state.db, existing.id, division.id).await.unwrap());

    let prospect = prospects::get_by_id(&state.db, prospect.id).await.unwrap().unwrap();
    assert_eq!(prospect.status, ProspectStatus::Added);
    let candidates = prospects::list_candidates(&state.db).await.unwrap();
    assert!(candidates.iter().all(|p| p.id != prospect.id));
}

#[tokio::test]
async fn invite_of_rostered_player_changes_nothing() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let top = create_division(&state, season.id, 1).await;
    let lower = create_division(&state, season.id, 2).await;

    let (player, user) = create_linked_player(&state, "Already", "Here").await;
    state.draft().add_player(top.id, player.id).await.unwrap();

    let prospect = prospects::create(
        &state.db,
        CreateProspect {
            email: user.email.clone(),
            first_name: "Already".to_string(),
            last_name: "Here".to_string(),
        },
    )
    .await
    .unwrap();

    let err = state
        .draft()
        .invite_player_from_prospect(lower.id, prospect.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LadderError::Conflict(_)), "got {err:?}");

    assert_eq!(memberships::count_by_division(&state.db, lower.id).await.unwrap(), 0);
    let prospect = prospects::get_by_id(&state.db, prospect.id).await.unwrap().unwrap();
    assert_eq!(prospect.status, ProspectStatus::New);
}

#[tokio::test]
async fn renumbering_keeps_tied_members_in_displayed_order() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let division = create_division(&state, season.id, 1).await;

    let draft = state.draft();
    for (first, last) in [("Dirk", "de Vries"), ("Sam", "Smith")] {
        let p = create_player(&state, first, last).await;
        draft.add_player(division.id, p.id).await.unwrap();
    }

    let roster = memberships::list_by_division(&state.db, division.id).await.unwrap();
    for m in &roster {
        memberships::set_sort_order(&state.db, m.id, 10).await.unwrap();
    }
    let before: Vec<String> = memberships::list_by_division(&state.db, division.id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.last_name)
        .collect();

    let zane = create_player(&state, "Zed", "Zane").await;
    draft.add_player(division.id, zane.id).await.unwrap();

    let after = memberships::list_by_division(&state.db, division.id).await.unwrap();
    let names: Vec<&str> = after.iter().map(|m| m.last_name.as_str()).collect();
    assert_eq!(&names[..2], &[before[0].as_str(), before[1].as_str()]);
    assert_eq!(names[2], "Zane");
    assert_eq!(sort_orders(&after), vec![10, 20, 30]);
}

#[tokio::test]
async fn concurrent_enrolments_of_one_player_report_validation() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let top = create_division(&state, season.id, 1).await;
    let lower = create_division(&state, season.id, 2).await;
    let draft = state.draft();

    for _ in 0..10 {
        let player = create_player(&state, "Race", &unique()).await;
        let (a, b) = tokio::join!(
            draft.add_player(top.id, player.id),
            draft.add_player(lower.id, player.id)
        );

        let results = [a, b];
        assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
        for err in results.into_iter().filter_map(Result::err) {
            assert!(matches!(err, LadderError::Validation(_)), "got {err:?}");
        }
    }
}

#[tokio::test]
async fn rejected_prospect_cannot_be_invited() {
    let Some(state) = setup_test_db().await else { return };
    let season = create_season(&state, isolated_start_date(), true).await;
    let division = create_division(&state, season.id, 1).await;

    let prospect = prospects::create(
        &state.db,
        CreateProspect {
            email: format!("gone_{}@ladder.test", unique()),
            first_name: "Gone".to_string(),
            last_name: "Away".to_string(),
        },
    )
    .await
    .unwrap();
    prospects::set_status(&state.db, prospect.id, ProspectStatus::Rejected)
        .await
        .unwrap();

    let err = state
        .draft()
        .invite_player_from_prospect(division.id, prospect.id)
        .await
        .unwrap_err();
    assert!(matches!(err, LadderError::Conflict(_)), "got {err:?}");
    assert_eq!(memberships::count_by_division(&state.db, division.id).await.unwrap(), 0);
}

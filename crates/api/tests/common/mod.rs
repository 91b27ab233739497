#![allow(dead_code)]

use std::env;

use api::config::AppConfig;
use api::gql::LadderSchema;
use api::AppState;
use async_graphql::{Request, Variables};
use chrono::{Duration, NaiveDate};
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use infra::models::{DivisionRow, PlayerRow, SeasonRow, UserRow};
use infra::repos::{divisions, players, seasons, users, CreatePlayer, CreateSeason, CreateUser};

/// Connects to `TEST_DATABASE_URL` and applies migrations. Returns `None`
/// when the variable is unset so database tests can skip.
pub async fn setup_test_db() -> Option<AppState> {
    let Ok(database_url) = env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await
        .expect("Failed to connect to test database");

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    Some(AppState::new(pool, AppConfig::for_database(database_url)))
}

/// Helper function to execute GraphQL queries and mutations
pub async fn execute_graphql(
    schema: &LadderSchema,
    query: &str,
    variables: Option<Variables>,
) -> async_graphql::Response {
    let mut request = Request::new(query);

    if let Some(vars) = variables {
        request = request.variables(vars);
    }

    schema.execute(request).await
}

pub fn unique() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// A start date no other test is likely to use, so "previous season"
/// lookups stay inside the test's own fixtures.
pub fn isolated_start_date() -> NaiveDate {
    let offset = (Uuid::new_v4().as_u128() % 700_000) as i64;
    NaiveDate::from_ymd_opt(3000, 1, 1).expect("valid date") + Duration::days(offset)
}

pub async fn create_season(state: &AppState, start_date: NaiveDate, is_draft: bool) -> SeasonRow {
    let season = seasons::create(
        &state.db,
        CreateSeason {
            name: format!("Test season {}", unique()),
            start_date,
            end_date: start_date + Duration::days(60),
            season_round: 1,
        },
    )
    .await
    .expect("Failed to create season");

    if is_draft {
        season
    } else {
        seasons::set_draft(&state.db, season.id, false)
            .await
            .expect("Failed to publish season")
            .expect("season exists")
    }
}

pub async fn create_division(state: &AppState, season_id: Uuid, number: i32) -> DivisionRow {
    divisions::create(&state.db, season_id, number)
        .await
        .expect("Failed to create division")
}

pub async fn create_user(state: &AppState, first: &str, last: &str) -> UserRow {
    users::create(
        &state.db,
        CreateUser {
            email: format!("{}_{}@ladder.test", first.to_lowercase(), unique()),
            first_name: first.to_string(),
            last_name: last.to_string(),
        },
    )
    .await
    .expect("Failed to create user")
}

pub async fn create_player(state: &AppState, first: &str, last: &str) -> PlayerRow {
    players::create(
        &state.db,
        CreatePlayer {
            first_name: first.to_string(),
            last_name: last.to_string(),
            user_id: None,
        },
    )
    .await
    .expect("Failed to create player")
}

pub async fn create_linked_player(state: &AppState, first: &str, last: &str) -> (PlayerRow, UserRow) {
    let user = create_user(state, first, last).await;
    let player = players::create(
        &state.db,
        CreatePlayer {
            first_name: first.to_string(),
            last_name: last.to_string(),
            user_id: Some(user.id),
        },
    )
    .await
    .expect("Failed to create player");
    (player, user)
}

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::repos::prospects::ProspectStatus;

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct SeasonRow {
    pub id: Uuid,
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub season_round: i32,
    pub is_draft: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SeasonRow {
    /// Display label, e.g. "2024 Round 2".
    pub fn label(&self) -> String {
        use chrono::Datelike;
        format!("{} Round {}", self.start_date.year(), self.season_round)
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct DivisionRow {
    pub id: Uuid,
    pub season_id: Uuid,
    pub division: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MembershipRow {
    pub id: Uuid,
    pub division_id: Uuid,
    pub season_id: Uuid,
    pub player_id: Uuid,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Membership joined with the player's name, which the visual order needs.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MembershipWithPlayer {
    pub id: Uuid,
    pub division_id: Uuid,
    pub season_id: Uuid,
    pub player_id: Uuid,
    pub sort_order: i32,
    pub first_name: String,
    pub last_name: String,
    pub user_id: Option<Uuid>,
}

/// One season of a player's career: the membership with its division and season.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerSeasonRow {
    pub membership_id: Uuid,
    pub season_id: Uuid,
    pub season_name: String,
    pub season_round: i32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub division_id: Uuid,
    pub division: i32,
    pub division_size: i64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PlayerRow {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub user_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PlayerRow {
    /// First name plus abbreviated last name, e.g. "Anna K.".
    pub fn display_name(&self) -> String {
        display_name(&self.first_name, &self.last_name)
    }
}

/// Shortens the final surname to an initial: "Mary Ann Van Dyke" -> "Mary Ann Van D.".
pub fn display_name(first_name: &str, last_name: &str) -> String {
    let mut name = first_name.trim().to_string();
    let mut parts: Vec<String> = last_name.split_whitespace().map(str::to_string).collect();
    if let Some(last) = parts.last_mut() {
        let initial: String = last.chars().take(1).flat_map(char::to_uppercase).collect();
        *last = format!("{initial}.");
    }
    if !parts.is_empty() {
        name.push(' ');
        name.push_str(&parts.join(" "));
    }
    name
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct MatchResultRow {
    pub id: Uuid,
    pub division_id: Uuid,
    pub player_id: Uuid,
    pub opponent_id: Uuid,
    pub result: i32,
    pub date_added: DateTime<Utc>,
    pub inaccurate: bool,
    pub created_at: DateTime<Utc>,
}

/// How often a player has met one opponent, counted from the player's own rows.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct OpponentCountRow {
    pub opponent_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub times_played: i64,
    pub last_played: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct ProspectRow {
    pub id: Uuid,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: ProspectStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

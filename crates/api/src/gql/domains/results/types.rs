use async_graphql::InputObject;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::services::results::RecordMatch;

#[derive(InputObject)]
pub struct RecordMatchInput {
    pub division_id: Uuid,
    pub loser_id: Uuid,
    pub winner_id: Uuid,
    /// Games won by the loser, 0 to 8.
    pub loser_score: i32,
    #[graphql(default)]
    pub inaccurate: bool,
    /// Defaults to now.
    pub date_added: Option<DateTime<Utc>>,
}

impl From<RecordMatchInput> for RecordMatch {
    fn from(input: RecordMatchInput) -> Self {
        Self {
            division_id: input.division_id,
            loser_id: input.loser_id,
            winner_id: input.winner_id,
            loser_score: input.loser_score,
            inaccurate: input.inaccurate,
            date_added: input.date_added.unwrap_or_else(Utc::now),
        }
    }
}

use async_graphql::InputObject;
use chrono::NaiveDate;

#[derive(InputObject)]
pub struct CreateSeasonInput {
    pub name: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub season_round: i32,
}

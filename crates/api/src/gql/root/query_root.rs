use async_graphql::MergedObject;

use crate::gql::domains::draft::DraftQuery;
use crate::gql::domains::notifications::NotificationQuery;
use crate::gql::domains::players::PlayerQuery;
use crate::gql::domains::prospects::ProspectQuery;
use crate::gql::domains::results::ResultQuery;
use crate::gql::domains::seasons::SeasonQuery;
use crate::gql::domains::standings::StandingsQuery;

#[derive(MergedObject, Default)]
pub struct QueryRoot(
    DraftQuery,
    NotificationQuery,
    PlayerQuery,
    ProspectQuery,
    ResultQuery,
    SeasonQuery,
    StandingsQuery,
);

use async_graphql::MergedObject;

use crate::gql::domains::draft::DraftMutation;
use crate::gql::domains::prospects::ProspectMutation;
use crate::gql::domains::results::ResultMutation;
use crate::gql::domains::seasons::SeasonMutation;

#[derive(MergedObject, Default)]
pub struct MutationRoot(DraftMutation, ProspectMutation, ResultMutation, SeasonMutation);

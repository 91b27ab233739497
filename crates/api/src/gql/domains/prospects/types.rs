use async_graphql::{Enum, SimpleObject, ID};
use chrono::{DateTime, Utc};

use infra::models::ProspectRow;
use infra::repos::ProspectStatus as Status;

#[derive(Enum, Copy, Clone, Eq, PartialEq, Debug)]
pub enum ProspectStatus {
    #[graphql(name = "NEW")]
    New,
    #[graphql(name = "CONTACTED")]
    Contacted,
    #[graphql(name = "READY")]
    Ready,
    #[graphql(name = "ADDED")]
    Added,
    #[graphql(name = "REJECTED")]
    Rejected,
}

impl From<Status> for ProspectStatus {
    fn from(status: Status) -> Self {
        match status {
            Status::New => ProspectStatus::New,
            Status::Contacted => ProspectStatus::Contacted,
            Status::Ready => ProspectStatus::Ready,
            Status::Added => ProspectStatus::Added,
            Status::Rejected => ProspectStatus::Rejected,
        }
    }
}

impl From<ProspectStatus> for Status {
    fn from(status: ProspectStatus) -> Self {
        match status {
            ProspectStatus::New => Status::New,
            ProspectStatus::Contacted => Status::Contacted,
            ProspectStatus::Ready => Status::Ready,
            ProspectStatus::Added => Status::Added,
            ProspectStatus::Rejected => Status::Rejected,
        }
    }
}

#[derive(SimpleObject, Clone)]
pub struct Prospect {
    pub id: ID,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub status: ProspectStatus,
    pub created_at: DateTime<Utc>,
}

impl From<ProspectRow> for Prospect {
    fn from(row: ProspectRow) -> Self {
        Self {
            id: row.id.into(),
            email: row.email,
            first_name: row.first_name,
            last_name: row.last_name,
            status: row.status.into(),
            created_at: row.created_at,
        }
    }
}

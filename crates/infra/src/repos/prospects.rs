use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::ProspectRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type, serde::Serialize, serde::Deserialize)]
#[sqlx(type_name = "prospect_status", rename_all = "snake_case")]
pub enum ProspectStatus {
    New,
    Contacted,
    Ready,
    Added,
    Rejected,
}

impl ProspectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProspectStatus::New => "new",
            ProspectStatus::Contacted => "contacted",
            ProspectStatus::Ready => "ready",
            ProspectStatus::Added => "added",
            ProspectStatus::Rejected => "rejected",
        }
    }

    /// Added and rejected prospects are no longer candidates.
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProspectStatus::Added | ProspectStatus::Rejected)
    }

    /// Lifecycle: new -> contacted -> ready -> added | rejected.
    /// Any open prospect may be rejected or added; staying put is always
    /// allowed. `Added` is only ever set by inviting the prospect onto a
    /// roster, never by a manual status change.
    pub fn can_transition_to(&self, next: ProspectStatus) -> bool {
        use ProspectStatus::*;

        if *self == next {
            return true;
        }
        match next {
            Added | Rejected => !self.is_terminal(),
            Contacted => *self == New,
            Ready => *self == Contacted,
            New => false,
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateProspect {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateProspect) -> SqlxResult<ProspectRow> {
    sqlx::query_as::<_, ProspectRow>(
        r#"
        INSERT INTO prospects (email, first_name, last_name, status)
        VALUES ($1, $2, $3, 'new')
        RETURNING id, email, first_name, last_name, status, created_at, updated_at
        "#,
    )
    .bind(data.email.trim())
    .bind(data.first_name)
    .bind(data.last_name)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<ProspectRow>> {
    sqlx::query_as::<_, ProspectRow>(
        r#"
        SELECT id, email, first_name, last_name, status, created_at, updated_at
        FROM prospects
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

/// Prospects that can still be onboarded, oldest first.
pub async fn list_candidates<'e>(executor: impl PgExecutor<'e>) -> SqlxResult<Vec<ProspectRow>> {
    sqlx::query_as::<_, ProspectRow>(
        r#"
        SELECT id, email, first_name, last_name, status, created_at, updated_at
        FROM prospects
        WHERE status NOT IN ('added', 'rejected')
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(executor)
    .await
}

pub async fn set_status<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    status: ProspectStatus,
) -> SqlxResult<Option<ProspectRow>> {
    sqlx::query_as::<_, ProspectRow>(
        r#"
        UPDATE prospects
        SET status = $2, updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, first_name, last_name, status, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(status)
    .fetch_optional(executor)
    .await
}

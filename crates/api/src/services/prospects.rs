use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{LadderError, LadderResult};
use crate::services::identity::{is_plausible_email, normalize_email};
use infra::models::ProspectRow;
use infra::repos::{prospects, CreateProspect, ProspectStatus};

pub async fn create_prospect(
    pool: &PgPool,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> LadderResult<ProspectRow> {
    let email = normalize_email(email);
    if !is_plausible_email(&email) {
        return Err(LadderError::validation(format!("Invalid e-mail address: {email}")));
    }

    let prospect = prospects::create(
        pool,
        CreateProspect {
            email,
            first_name: first_name.trim().to_string(),
            last_name: last_name.trim().to_string(),
        },
    )
    .await?;

    tracing::info!(prospect_id = %prospect.id, "Registered prospect {}", prospect.email);
    Ok(prospect)
}

pub async fn list_candidates(pool: &PgPool) -> LadderResult<Vec<ProspectRow>> {
    Ok(prospects::list_candidates(pool).await?)
}

/// Checks a manual status change. `Added` is only set by inviting the
/// prospect onto a roster.
pub fn check_transition(current: ProspectStatus, next: ProspectStatus) -> LadderResult<()> {
    if next == ProspectStatus::Added && current != ProspectStatus::Added {
        return Err(LadderError::validation(
            "Prospects are marked added by inviting them into a division",
        ));
    }
    if !current.can_transition_to(next) {
        return Err(LadderError::validation(format!(
            "Cannot move prospect from {} to {}",
            current.as_str(),
            next.as_str()
        )));
    }
    Ok(())
}

pub async fn set_prospect_status(
    pool: &PgPool,
    prospect_id: Uuid,
    status: ProspectStatus,
) -> LadderResult<ProspectRow> {
    let prospect = prospects::get_by_id(pool, prospect_id)
        .await?
        .ok_or(LadderError::NotFound("Prospect"))?;
    check_transition(prospect.status, status)?;

    let updated = prospects::set_status(pool, prospect_id, status)
        .await?
        .ok_or(LadderError::NotFound("Prospect"))?;

    tracing::info!(
        prospect_id = %updated.id,
        "Prospect {} moved from {} to {}",
        updated.email,
        prospect.status.as_str(),
        updated.status.as_str()
    );
    Ok(updated)
}

use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::UserRow;

/// Subscribes the account to the division. Re-subscribing is a no-op.
pub async fn create<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    division_id: Uuid,
) -> SqlxResult<bool> {
    let result = sqlx::query(
        r#"
        INSERT INTO ladder_subscriptions (user_id, division_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id, division_id) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(division_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn delete<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    division_id: Uuid,
) -> SqlxResult<bool> {
    let result = sqlx::query("DELETE FROM ladder_subscriptions WHERE user_id = $1 AND division_id = $2")
        .bind(user_id)
        .bind(division_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Re-points an existing subscription at another division. Returns false when
/// the account had no subscription on the source division.
pub async fn move_to_division<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    from_division_id: Uuid,
    to_division_id: Uuid,
) -> SqlxResult<bool> {
    let result = sqlx::query(
        r#"
        UPDATE ladder_subscriptions
        SET division_id = $3
        WHERE user_id = $1 AND division_id = $2
        "#,
    )
    .bind(user_id)
    .bind(from_division_id)
    .bind(to_division_id)
    .execute(executor)
    .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn list_subscribers<'e>(
    executor: impl PgExecutor<'e>,
    division_id: Uuid,
) -> SqlxResult<Vec<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT u.id, u.email, u.first_name, u.last_name, u.is_active, u.created_at, u.updated_at
        FROM ladder_subscriptions s
        JOIN users u ON u.id = s.user_id
        WHERE s.division_id = $1 AND u.is_active = true
        ORDER BY u.email ASC
        "#,
    )
    .bind(division_id)
    .fetch_all(executor)
    .await
}

pub async fn exists<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
    division_id: Uuid,
) -> SqlxResult<bool> {
    sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM ladder_subscriptions WHERE user_id = $1 AND division_id = $2)",
    )
    .bind(user_id)
    .bind(division_id)
    .fetch_one(executor)
    .await
}

use sqlx::{PgExecutor, PgPool, Result as SqlxResult};
use uuid::Uuid;

use super::contains_pattern;
use crate::models::PlayerRow;

#[derive(Debug, Clone)]
pub struct CreatePlayer {
    pub first_name: String,
    pub last_name: String,
    pub user_id: Option<Uuid>,
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreatePlayer) -> SqlxResult<PlayerRow> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        INSERT INTO players (first_name, last_name, user_id)
        VALUES ($1, $2, $3)
        RETURNING id, first_name, last_name, user_id, created_at, updated_at
        "#,
    )
    .bind(data.first_name)
    .bind(data.last_name)
    .bind(data.user_id)
    .fetch_one(executor)
    .await
}

pub async fn get_by_id<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        SELECT id, first_name, last_name, user_id, created_at, updated_at
        FROM players
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub async fn get_by_user_id<'e>(
    executor: impl PgExecutor<'e>,
    user_id: Uuid,
) -> SqlxResult<Option<PlayerRow>> {
    sqlx::query_as::<_, PlayerRow>(
        r#"
        SELECT id, first_name, last_name, user_id, created_at, updated_at
        FROM players
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await
}

/// Every whitespace-separated term must match the first or last name (case-insensitive).
/// Builds its query dynamically so requires &PgPool.
pub async fn search(pool: &PgPool, query: &str, limit: i64) -> SqlxResult<Vec<PlayerRow>> {
    let mut builder = sqlx::QueryBuilder::new(
        "SELECT id, first_name, last_name, user_id, created_at, updated_at FROM players WHERE 1=1",
    );

    for term in query.split_whitespace() {
        let pattern = contains_pattern(term);
        builder.push(" AND (LOWER(first_name) LIKE ");
        builder.push_bind(pattern.clone());
        builder.push(" ESCAPE '\\' OR LOWER(last_name) LIKE ");
        builder.push_bind(pattern);
        builder.push(" ESCAPE '\\')");
    }

    builder.push(" ORDER BY last_name ASC, first_name ASC LIMIT ");
    builder.push_bind(limit);

    builder.build_query_as::<PlayerRow>().fetch_all(pool).await
}

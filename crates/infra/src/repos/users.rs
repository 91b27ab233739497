use sqlx::{PgExecutor, Result as SqlxResult};
use uuid::Uuid;

use crate::models::UserRow;

#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateUserNames {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl UpdateUserNames {
    pub fn is_empty(&self) -> bool {
        self.first_name.is_none() && self.last_name.is_none()
    }
}

pub async fn create<'e>(executor: impl PgExecutor<'e>, data: CreateUser) -> SqlxResult<UserRow> {
    sqlx::query_as::<_, UserRow>(
        r#"
        INSERT INTO users (email, first_name, last_name, is_active)
        VALUES ($1, $2, $3, true)
        RETURNING id, email, first_name, last_name, is_active, created_at, updated_at
        "#,
    )
    .bind(data.email.trim())
    .bind(data.first_name)
    .bind(data.last_name)
    .fetch_one(executor)
    .await
}

/// Case-insensitive e-mail lookup.
pub async fn find_by_email<'e>(
    executor: impl PgExecutor<'e>,
    email: &str,
) -> SqlxResult<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, email, first_name, last_name, is_active, created_at, updated_at
        FROM users
        WHERE LOWER(email) = LOWER($1)
        "#,
    )
    .bind(email.trim())
    .fetch_optional(executor)
    .await
}

pub async fn update_names<'e>(
    executor: impl PgExecutor<'e>,
    id: Uuid,
    data: UpdateUserNames,
) -> SqlxResult<Option<UserRow>> {
    sqlx::query_as::<_, UserRow>(
        r#"
        UPDATE users
        SET first_name = COALESCE($2, first_name),
            last_name = COALESCE($3, last_name),
            updated_at = NOW()
        WHERE id = $1
        RETURNING id, email, first_name, last_name, is_active, created_at, updated_at
        "#,
    )
    .bind(id)
    .bind(data.first_name)
    .bind(data.last_name)
    .fetch_optional(executor)
    .await
}

/// Grants a role. Granting an already held role is a no-op.
pub async fn add_to_role<'e>(executor: impl PgExecutor<'e>, id: Uuid, role: &str) -> SqlxResult<()> {
    sqlx::query(
        r#"
        INSERT INTO user_roles (user_id, role)
        VALUES ($1, $2)
        ON CONFLICT (user_id, role) DO NOTHING
        "#,
    )
    .bind(id)
    .bind(role)
    .execute(executor)
    .await?;

    Ok(())
}

pub async fn list_roles<'e>(executor: impl PgExecutor<'e>, id: Uuid) -> SqlxResult<Vec<String>> {
    sqlx::query_scalar::<_, String>("SELECT role FROM user_roles WHERE user_id = $1 ORDER BY role")
        .bind(id)
        .fetch_all(executor)
        .await
}

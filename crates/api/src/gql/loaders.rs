use async_graphql::dataloader::Loader;
use infra::models::PlayerRow;
use sqlx::PgPool;
use std::{collections::HashMap, future::Future, sync::Arc};
use uuid::Uuid;

// PlayerLoader - batch load players by ID
#[derive(Clone)]
pub struct PlayerLoader {
    pool: PgPool,
}

impl PlayerLoader {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl Loader<Uuid> for PlayerLoader {
    type Value = PlayerRow;
    type Error = Arc<sqlx::Error>;

    fn load(
        &self,
        keys: &[Uuid],
    ) -> impl Future<Output = std::result::Result<HashMap<Uuid, Self::Value>, Self::Error>> + Send
    {
        let pool = self.pool.clone();
        let ids: Vec<Uuid> = keys.to_vec();

        async move {
            if ids.is_empty() {
                return Ok(HashMap::new());
            }

            let rows: Vec<PlayerRow> = sqlx::query_as::<_, PlayerRow>(
                r#"
                SELECT id, first_name, last_name, user_id, created_at, updated_at
                FROM players
                WHERE id = ANY($1::uuid[])
                "#,
            )
            .bind(&ids)
            .fetch_all(&pool)
            .await
            .map_err(Arc::new)?;

            Ok(rows.into_iter().map(|r| (r.id, r)).collect())
        }
    }
}

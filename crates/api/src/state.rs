use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::DraftWorkspace;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(db: PgPool, config: AppConfig) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn draft(&self) -> DraftWorkspace {
        DraftWorkspace::new(self.db.clone())
    }
}

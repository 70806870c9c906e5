use std::sync::Arc;

use crate::{
    config::Config,
    content::ContentKind,
    core::IdGenerator,
    error::AppResult,
    infrastructure::Database,
    services::{ContentService, InboxService},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub ids: Arc<IdGenerator>,
    pub config: Config,
}

impl AppState {
    pub async fn new(config: Config) -> AppResult<Self> {
        // Initialize database
        let db = Database::connect(&config.database).await?;
        db.init().await?;

        Ok(Self::with_database(db, config))
    }

    /// State over an already initialized database
    pub fn with_database(db: Database, config: Config) -> Self {
        let ids = Arc::new(IdGenerator::new(config.content.node_id));
        Self { db, ids, config }
    }

    pub fn content<K: ContentKind>(&self) -> ContentService<K> {
        ContentService::new(
            self.db.clone(),
            self.ids.clone(),
            self.config.content.default_language,
        )
    }

    pub fn inbox(&self) -> InboxService {
        InboxService::new(self.db.clone())
    }
}

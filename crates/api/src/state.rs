use std::sync::Arc;

use kb_db::store::{PgResourceCleaner, PgTopicStore};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: kb_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(pool: kb_db::DbPool, config: ServerConfig) -> Self {
        Self {
            pool,
            config: Arc::new(config),
        }
    }

    /// Topic store over this state's pool.
    pub fn topic_store(&self) -> PgTopicStore {
        PgTopicStore::new(self.pool.clone())
    }

    /// Resource cleanup collaborator over this state's pool.
    pub fn resource_cleaner(&self) -> PgResourceCleaner {
        PgResourceCleaner::new(self.pool.clone())
    }
}

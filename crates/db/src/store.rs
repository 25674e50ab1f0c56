//! Postgres-backed implementations of the `kb_core` store traits.

use async_trait::async_trait;
use kb_core::error::CoreError;
use kb_core::store::{ResourceCleaner, TopicStore};
use kb_core::topic::{Topic, TopicHistory};
use kb_core::types::DbId;

use crate::repositories::{ResourceRepo, TopicHistoryRepo, TopicRepo};
use crate::DbPool;

/// [`TopicStore`] over the `topics` and `topic_history` tables.
#[derive(Clone)]
pub struct PgTopicStore {
    pool: DbPool,
}

impl PgTopicStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TopicStore for PgTopicStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Topic>, CoreError> {
        TopicRepo::find_by_id(&self.pool, id)
            .await
            .map_err(CoreError::store)
    }

    async fn find_by_parent_id(&self, parent_id: DbId) -> Result<Vec<Topic>, CoreError> {
        TopicRepo::find_by_parent_id(&self.pool, parent_id)
            .await
            .map_err(CoreError::store)
    }

    async fn find_sub_topics(&self, id: DbId) -> Result<Vec<Topic>, CoreError> {
        TopicRepo::find_sub_topics(&self.pool, id)
            .await
            .map_err(CoreError::store)
    }

    async fn get_topic_version(
        &self,
        topic_id: DbId,
        version: i32,
    ) -> Result<Option<TopicHistory>, CoreError> {
        TopicHistoryRepo::find_by_topic_and_version(&self.pool, topic_id, version)
            .await
            .map_err(CoreError::store)
    }

    /// A child inserted after the caller's children check makes the row
    /// delete trip `fk_topics_parent`; that is reported as `HasChildren`.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        match TopicRepo::delete(&self.pool, id).await {
            Ok(removed) => Ok(removed),
            Err(err) if violates_constraint(&err, "fk_topics_parent") => {
                let child_count = TopicRepo::find_by_parent_id(&self.pool, id)
                    .await
                    .map_err(CoreError::store)?
                    .len();
                Err(CoreError::HasChildren { id, child_count })
            }
            Err(err) => Err(CoreError::store(err)),
        }
    }
}

fn violates_constraint(err: &sqlx::Error, constraint: &str) -> bool {
    err.as_database_error()
        .and_then(|db_err| db_err.constraint())
        .is_some_and(|name| name == constraint)
}

/// [`ResourceCleaner`] over the `resources` table.
#[derive(Clone)]
pub struct PgResourceCleaner {
    pool: DbPool,
}

impl PgResourceCleaner {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ResourceCleaner for PgResourceCleaner {
    async fn delete_resources_by_topic_id(&self, topic_id: DbId) -> Result<(), CoreError> {
        let removed = ResourceRepo::delete_by_topic_id(&self.pool, topic_id)
            .await
            .map_err(CoreError::store)?;
        tracing::debug!(topic_id = %topic_id, removed, "Deleted topic resources");
        Ok(())
    }
}

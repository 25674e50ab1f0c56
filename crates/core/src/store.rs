//! Persistence seams used by the hierarchy and versioning algorithms.
//!
//! The Postgres implementations live in `kb_db::store`; tests use an
//! in-memory fake.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::topic::{Topic, TopicHistory};
use crate::types::DbId;

/// Read/delete access to topics and their history.
#[async_trait]
pub trait TopicStore: Send + Sync {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Topic>, CoreError>;

    /// Direct children only, in whatever order the store returns them.
    async fn find_by_parent_id(&self, parent_id: DbId) -> Result<Vec<Topic>, CoreError>;

    /// Children lookup used by the traversal algorithms.
    async fn find_sub_topics(&self, id: DbId) -> Result<Vec<Topic>, CoreError> {
        self.find_by_parent_id(id).await
    }

    async fn get_topic_version(
        &self,
        topic_id: DbId,
        version: i32,
    ) -> Result<Option<TopicHistory>, CoreError>;

    /// Remove the topic row. Returns `false` if nothing was deleted.
    async fn delete(&self, id: DbId) -> Result<bool, CoreError>;
}

/// Collaborator that owns the resources attached to a topic.
#[async_trait]
pub trait ResourceCleaner: Send + Sync {
    async fn delete_resources_by_topic_id(&self, topic_id: DbId) -> Result<(), CoreError>;
}

//! Topic history row model.
//!
//! History rows are immutable snapshots written just before each topic
//! update. They are never deleted, even after their topic is.

use kb_core::topic::TopicHistory;
use kb_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `topic_history` table.
#[derive(Debug, Clone, FromRow)]
pub struct TopicHistoryRow {
    pub id: DbId,
    pub topic_id: DbId,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub parent_topic_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl From<TopicHistoryRow> for TopicHistory {
    fn from(row: TopicHistoryRow) -> Self {
        TopicHistory {
            id: row.id,
            topic_id: row.topic_id,
            name: row.name,
            content: row.content,
            version: row.version,
            parent_topic_id: row.parent_topic_id,
            created_at: row.created_at,
        }
    }
}

//! Topic row and DTO models.

use kb_core::topic::{deserialize_present, Topic, TopicChanges};
use kb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `topics` table.
#[derive(Debug, Clone, FromRow)]
pub struct TopicRow {
    pub id: DbId,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub parent_topic_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

impl From<TopicRow> for Topic {
    fn from(row: TopicRow) -> Self {
        Topic {
            id: row.id,
            name: row.name,
            content: row.content,
            version: row.version,
            parent_topic_id: row.parent_topic_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// DTO for creating a new topic.
#[derive(Debug, Deserialize)]
pub struct CreateTopic {
    pub name: String,
    pub content: String,
    pub created_by: DbId,
    pub parent_topic_id: Option<DbId>,
}

/// DTO for updating an existing topic. Absent fields are left unchanged;
/// `"parent_topic_id": null` moves the topic to the root.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTopic {
    pub name: Option<String>,
    pub content: Option<String>,
    pub updated_by: DbId,
    #[serde(default, deserialize_with = "deserialize_present")]
    pub parent_topic_id: Option<Option<DbId>>,
}

impl UpdateTopic {
    pub fn changes(&self) -> TopicChanges {
        TopicChanges {
            name: self.name.clone(),
            content: self.content.clone(),
            parent_topic_id: self.parent_topic_id,
        }
    }
}

/// One page of topics plus the unpaginated total.
#[derive(Debug, Serialize)]
pub struct TopicPage {
    pub items: Vec<Topic>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

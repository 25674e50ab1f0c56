//! Resource model: flat records attached to a topic.

use kb_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `resources` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Resource {
    pub id: DbId,
    pub topic_id: DbId,
    pub name: String,
    pub url: String,
    pub created_at: Timestamp,
}

/// DTO for attaching a resource to a topic.
#[derive(Debug, Deserialize)]
pub struct CreateResource {
    pub topic_id: DbId,
    pub name: String,
    pub url: String,
}

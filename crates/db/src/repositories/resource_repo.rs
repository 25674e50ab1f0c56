//! Repository for the `resources` table.
//!
//! Only what topic deletion and its tests need: attach, list, and bulk
//! removal by topic.

use kb_core::types::{new_id, DbId};
use sqlx::PgPool;

use crate::models::resource::{CreateResource, Resource};

/// Column list for resources queries.
const COLUMNS: &str = "id, topic_id, name, url, created_at";

/// Provides the resource operations used by the topic engine.
pub struct ResourceRepo;

impl ResourceRepo {
    /// Attach a new resource to a topic.
    pub async fn create(pool: &PgPool, input: &CreateResource) -> Result<Resource, sqlx::Error> {
        let query = format!(
            "INSERT INTO resources (id, topic_id, name, url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(new_id())
            .bind(input.topic_id)
            .bind(&input.name)
            .bind(&input.url)
            .fetch_one(pool)
            .await
    }

    /// List the resources attached to a topic, oldest first.
    pub async fn list_by_topic(
        pool: &PgPool,
        topic_id: DbId,
    ) -> Result<Vec<Resource>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM resources
             WHERE topic_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        sqlx::query_as::<_, Resource>(&query)
            .bind(topic_id)
            .fetch_all(pool)
            .await
    }

    /// Delete every resource attached to a topic. Returns the number removed.
    pub async fn delete_by_topic_id(pool: &PgPool, topic_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM resources WHERE topic_id = $1")
            .bind(topic_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}

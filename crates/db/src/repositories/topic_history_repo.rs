//! Repository for the `topic_history` table.
//!
//! Append-only: rows are inserted and read, never updated or deleted.

use kb_core::topic::TopicHistory;
use kb_core::types::DbId;
use sqlx::{PgExecutor, PgPool};

use crate::models::topic_history::TopicHistoryRow;

/// Column list for topic_history queries.
const COLUMNS: &str = "id, topic_id, name, content, version, parent_topic_id, created_at";

/// Provides append and read operations for topic snapshots.
pub struct TopicHistoryRepo;

impl TopicHistoryRepo {
    /// Insert a snapshot.
    pub async fn create<'e, E>(
        executor: E,
        entry: &TopicHistory,
    ) -> Result<TopicHistory, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO topic_history
                (id, topic_id, name, content, version, parent_topic_id, created_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TopicHistoryRow>(&query)
            .bind(entry.id)
            .bind(entry.topic_id)
            .bind(&entry.name)
            .bind(&entry.content)
            .bind(entry.version)
            .bind(entry.parent_topic_id)
            .bind(entry.created_at)
            .fetch_one(executor)
            .await?;
        Ok(row.into())
    }

    /// List all snapshots of a topic, newest version first.
    pub async fn list_by_topic(
        pool: &PgPool,
        topic_id: DbId,
    ) -> Result<Vec<TopicHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topic_history
             WHERE topic_id = $1
             ORDER BY version DESC"
        );
        let rows = sqlx::query_as::<_, TopicHistoryRow>(&query)
            .bind(topic_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(TopicHistory::from).collect())
    }

    /// Find the snapshot of a topic at a specific version.
    pub async fn find_by_topic_and_version(
        pool: &PgPool,
        topic_id: DbId,
        version: i32,
    ) -> Result<Option<TopicHistory>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topic_history
             WHERE topic_id = $1 AND version = $2"
        );
        let row = sqlx::query_as::<_, TopicHistoryRow>(&query)
            .bind(topic_id)
            .bind(version)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(TopicHistory::from))
    }
}

//! Repository for the `topics` table.
//!
//! Also owns the transactional update path that snapshots the pre-update
//! row into `topic_history` before writing the new version.

use std::collections::HashSet;

use kb_core::ancestry::HIERARCHY_LOCK_ID;
use kb_core::error::CoreError;
use kb_core::pagination::TopicPageRequest;
use kb_core::topic::{Topic, TopicChanges, TopicHistory};
use kb_core::types::{new_id, DbId};
use sqlx::{PgConnection, PgExecutor, PgPool};

use crate::models::topic::TopicRow;
use crate::repositories::TopicHistoryRepo;

/// Column list for topics queries.
const COLUMNS: &str = "id, name, content, version, parent_topic_id, created_at, updated_at";

/// Provides CRUD and structural queries for topics.
pub struct TopicRepo;

impl TopicRepo {
    /// Insert a topic built by [`Topic::create`].
    pub async fn create<'e, E>(executor: E, topic: &Topic) -> Result<Topic, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "INSERT INTO topics
                (id, name, content, version, parent_topic_id, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TopicRow>(&query)
            .bind(topic.id)
            .bind(&topic.name)
            .bind(&topic.content)
            .bind(topic.version)
            .bind(topic.parent_topic_id)
            .bind(topic.created_at)
            .bind(topic.updated_at)
            .fetch_one(executor)
            .await?;
        Ok(row.into())
    }

    /// Find a topic by ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics WHERE id = $1");
        let row = sqlx::query_as::<_, TopicRow>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await?;
        Ok(row.map(Topic::from))
    }

    /// List every topic, oldest first.
    pub async fn find_all(pool: &PgPool) -> Result<Vec<Topic>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM topics ORDER BY created_at ASC, id ASC");
        let rows = sqlx::query_as::<_, TopicRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Topic::from).collect())
    }

    /// List topics without a parent, oldest first.
    pub async fn find_roots(pool: &PgPool) -> Result<Vec<Topic>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topics
             WHERE parent_topic_id IS NULL
             ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, TopicRow>(&query)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Topic::from).collect())
    }

    /// List the direct children of a topic (not the full subtree).
    pub async fn find_by_parent_id(
        pool: &PgPool,
        parent_id: DbId,
    ) -> Result<Vec<Topic>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topics
             WHERE parent_topic_id = $1
             ORDER BY created_at ASC, id ASC"
        );
        let rows = sqlx::query_as::<_, TopicRow>(&query)
            .bind(parent_id)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Topic::from).collect())
    }

    /// Children lookup used by tree and path traversal.
    pub async fn find_sub_topics(pool: &PgPool, id: DbId) -> Result<Vec<Topic>, sqlx::Error> {
        Self::find_by_parent_id(pool, id).await
    }

    /// One page of topics in the requested order.
    pub async fn get_paginated_topics(
        pool: &PgPool,
        page: &TopicPageRequest,
    ) -> Result<Vec<Topic>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM topics
             ORDER BY {}
             LIMIT $1 OFFSET $2",
            page.order_clause()
        );
        let rows = sqlx::query_as::<_, TopicRow>(&query)
            .bind(page.limit)
            .bind(page.offset)
            .fetch_all(pool)
            .await?;
        Ok(rows.into_iter().map(Topic::from).collect())
    }

    /// Total number of topics.
    pub async fn get_total_topics_count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM topics")
            .fetch_one(pool)
            .await?;
        Ok(count)
    }

    /// Write every mutable field of `topic` back to its row.
    ///
    /// Returns `None` if no row has that id.
    pub async fn update<'e, E>(executor: E, topic: &Topic) -> Result<Option<Topic>, sqlx::Error>
    where
        E: PgExecutor<'e>,
    {
        let query = format!(
            "UPDATE topics SET
                name = $2,
                content = $3,
                version = $4,
                parent_topic_id = $5,
                updated_at = $6
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let row = sqlx::query_as::<_, TopicRow>(&query)
            .bind(topic.id)
            .bind(&topic.name)
            .bind(&topic.content)
            .bind(topic.version)
            .bind(topic.parent_topic_id)
            .bind(topic.updated_at)
            .fetch_optional(executor)
            .await?;
        Ok(row.map(Topic::from))
    }

    /// Snapshot the current row into `topic_history`, apply `changes`, and
    /// write the new version, all in one transaction.
    ///
    /// The row is locked with `FOR UPDATE` so concurrent updates of the same
    /// topic serialize and each captures a distinct pre-state. A move under a
    /// new parent additionally takes the [`HIERARCHY_LOCK_ID`] advisory lock
    /// and re-walks the new parent's ancestor chain inside the transaction,
    /// so two crossing moves cannot both commit.
    ///
    /// Fails with `NotFound` (and writes nothing) if the topic does not exist,
    /// and with `Validation` if the move would put the topic under itself.
    pub async fn update_with_history(
        pool: &PgPool,
        id: DbId,
        changes: TopicChanges,
    ) -> Result<Topic, CoreError> {
        let mut tx = pool.begin().await.map_err(CoreError::store)?;

        if let Some(Some(parent_id)) = changes.parent_topic_id {
            sqlx::query("SELECT pg_advisory_xact_lock($1)")
                .bind(HIERARCHY_LOCK_ID)
                .execute(&mut *tx)
                .await
                .map_err(CoreError::store)?;
            Self::ensure_not_descendant(&mut *tx, id, parent_id).await?;
        }

        let query = format!("SELECT {COLUMNS} FROM topics WHERE id = $1 FOR UPDATE");
        let row = sqlx::query_as::<_, TopicRow>(&query)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(CoreError::store)?
            .ok_or_else(|| CoreError::topic_not_found(id))?;

        let mut topic = Topic::from(row);
        TopicHistoryRepo::create(&mut *tx, &TopicHistory::capture(new_id(), &topic))
            .await
            .map_err(CoreError::store)?;

        topic.update(changes);
        let updated = Self::update(&mut *tx, &topic)
            .await
            .map_err(CoreError::store)?
            .ok_or_else(|| CoreError::topic_not_found(id))?;

        tx.commit().await.map_err(CoreError::store)?;
        Ok(updated)
    }

    /// Walk upward from `parent_id` and reject the move if `topic_id` is on
    /// the chain. Must run while holding [`HIERARCHY_LOCK_ID`].
    async fn ensure_not_descendant(
        conn: &mut PgConnection,
        topic_id: DbId,
        parent_id: DbId,
    ) -> Result<(), CoreError> {
        let mut seen = HashSet::new();
        let mut cursor = Some(parent_id);

        while let Some(ancestor_id) = cursor {
            if ancestor_id == topic_id {
                return Err(CoreError::Validation(format!(
                    "Topic {topic_id} cannot be moved under its own descendant {parent_id}"
                )));
            }
            if !seen.insert(ancestor_id) {
                return Err(CoreError::Internal(format!(
                    "Ancestor chain of topic {parent_id} contains a cycle"
                )));
            }

            let row: Option<(Option<DbId>,)> =
                sqlx::query_as("SELECT parent_topic_id FROM topics WHERE id = $1")
                    .bind(ancestor_id)
                    .fetch_optional(&mut *conn)
                    .await
                    .map_err(CoreError::store)?;

            cursor = match row {
                Some((parent,)) => parent,
                None if ancestor_id == parent_id => {
                    return Err(CoreError::Validation(format!(
                        "Parent topic {parent_id} does not exist"
                    )));
                }
                None => None,
            };
        }

        Ok(())
    }

    /// Delete a topic row. Returns `true` if a row was removed.
    ///
    /// Fails with a foreign-key violation while children or resources still
    /// reference the topic.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM topics WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

//! The topic aggregate and its derived shapes.
//!
//! A [`Topic`] is constructed from a stored row, mutated through
//! [`Topic::update`], written back, and dropped. Nothing here caches.

use chrono::Utc;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Maximum topic name length in bytes.
pub const MAX_NAME_LEN: usize = 200;

/// Maximum topic content length in bytes.
pub const MAX_CONTENT_LEN: usize = 100_000;

// ---------------------------------------------------------------------------
// Aggregate
// ---------------------------------------------------------------------------

/// A versioned, hierarchically-parented content node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: DbId,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub parent_topic_id: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Option<Timestamp>,
}

/// Partial update applied by [`Topic::update`]. `None` leaves a field as is.
///
/// `parent_topic_id` is tri-state: `None` keeps the parent, `Some(None)`
/// detaches the topic to the root, `Some(Some(id))` reparents it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicChanges {
    pub name: Option<String>,
    pub content: Option<String>,
    pub parent_topic_id: Option<Option<DbId>>,
}

impl Topic {
    /// Build a brand-new topic at version 1.
    pub fn create(
        id: DbId,
        name: impl Into<String>,
        content: impl Into<String>,
        parent_topic_id: Option<DbId>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            content: content.into(),
            version: 1,
            parent_topic_id,
            created_at: now,
            updated_at: Some(now),
        }
    }

    /// Apply a partial update.
    ///
    /// Always bumps `version` by one and touches `updated_at`, even when
    /// `changes` is empty or repeats current values.
    pub fn update(&mut self, changes: TopicChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(content) = changes.content {
            self.content = content;
        }
        if let Some(parent_topic_id) = changes.parent_topic_id {
            self.parent_topic_id = parent_topic_id;
        }
        self.updated_at = Some(Utc::now());
        self.version += 1;
    }

    pub fn is_root(&self) -> bool {
        self.parent_topic_id.is_none()
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Immutable snapshot of a topic, captured just before an update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicHistory {
    pub id: DbId,
    pub topic_id: DbId,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub parent_topic_id: Option<DbId>,
    pub created_at: Timestamp,
}

impl TopicHistory {
    /// Snapshot the current state of `topic` under a new history id.
    pub fn capture(id: DbId, topic: &Topic) -> Self {
        Self {
            id,
            topic_id: topic.id,
            name: topic.name.clone(),
            content: topic.content.clone(),
            version: topic.version,
            parent_topic_id: topic.parent_topic_id,
            created_at: Utc::now(),
        }
    }
}

/// Compact history listing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicHistoryEntry {
    pub version: i32,
    pub created_at: Timestamp,
}

impl From<&TopicHistory> for TopicHistoryEntry {
    fn from(history: &TopicHistory) -> Self {
        Self {
            version: history.version,
            created_at: history.created_at,
        }
    }
}

// ---------------------------------------------------------------------------
// Derived views
// ---------------------------------------------------------------------------

/// A topic together with its full descendant subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicTree {
    #[serde(flatten)]
    pub topic: Topic,
    pub sub_topics: Vec<TopicTree>,
}

impl TopicTree {
    pub fn id(&self) -> DbId {
        self.topic.id
    }

    /// Number of nodes in this tree, root included.
    pub fn node_count(&self) -> usize {
        1 + self
            .sub_topics
            .iter()
            .map(TopicTree::node_count)
            .sum::<usize>()
    }
}

/// A topic as it looked at a given version.
///
/// Live topics carry `updated_at`; snapshots rebuilt from history do not,
/// since a history row only records its capture time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TopicSnapshot {
    pub id: DbId,
    pub name: String,
    pub content: String,
    pub version: i32,
    pub parent_topic_id: Option<DbId>,
    pub created_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
}

impl From<Topic> for TopicSnapshot {
    fn from(topic: Topic) -> Self {
        Self {
            id: topic.id,
            name: topic.name,
            content: topic.content,
            version: topic.version,
            parent_topic_id: topic.parent_topic_id,
            created_at: topic.created_at,
            updated_at: topic.updated_at,
        }
    }
}

impl From<TopicHistory> for TopicSnapshot {
    fn from(history: TopicHistory) -> Self {
        Self {
            id: history.topic_id,
            name: history.name,
            content: history.content,
            version: history.version,
            parent_topic_id: history.parent_topic_id,
            created_at: history.created_at,
            updated_at: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a topic name (non-empty, <= 200 chars).
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation("Name must not be empty".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate topic content (max 100 000 chars).
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.len() > MAX_CONTENT_LEN {
        return Err(CoreError::Validation(format!(
            "Content must be at most {MAX_CONTENT_LEN} characters"
        )));
    }
    Ok(())
}

/// Serde helper for tri-state fields: a present `null` becomes `Some(None)`,
/// an absent field falls back to `#[serde(default)]`.
pub fn deserialize_present<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::new_id;

    fn sample() -> Topic {
        Topic::create(new_id(), "Rust", "Ownership and borrowing", None)
    }

    // -- create --------------------------------------------------------------

    #[test]
    fn create_starts_at_version_one_with_matching_timestamps() {
        let topic = sample();
        assert_eq!(topic.version, 1);
        assert_eq!(topic.updated_at, Some(topic.created_at));
        assert!(topic.is_root());
    }

    #[test]
    fn create_keeps_parent() {
        let parent = new_id();
        let topic = Topic::create(new_id(), "Lifetimes", "", Some(parent));
        assert_eq!(topic.parent_topic_id, Some(parent));
    }

    // -- update --------------------------------------------------------------

    #[test]
    fn update_applies_only_provided_fields() {
        let mut topic = sample();
        topic.update(TopicChanges {
            content: Some("Traits".into()),
            ..Default::default()
        });
        assert_eq!(topic.name, "Rust");
        assert_eq!(topic.content, "Traits");
        assert_eq!(topic.version, 2);
    }

    #[test]
    fn update_bumps_version_even_without_changes() {
        let mut topic = sample();
        let before = topic.updated_at;
        topic.update(TopicChanges::default());
        assert_eq!(topic.version, 2);
        assert!(topic.updated_at >= before);
    }

    #[test]
    fn n_updates_add_n_to_version() {
        let mut topic = sample();
        for i in 0..7 {
            topic.update(TopicChanges {
                name: Some(format!("Rust {i}")),
                ..Default::default()
            });
        }
        assert_eq!(topic.version, 8);
    }

    #[test]
    fn update_can_detach_and_reparent() {
        let parent = new_id();
        let mut topic = Topic::create(new_id(), "Child", "", Some(parent));

        topic.update(TopicChanges {
            parent_topic_id: Some(None),
            ..Default::default()
        });
        assert!(topic.is_root());

        let other = new_id();
        topic.update(TopicChanges {
            parent_topic_id: Some(Some(other)),
            ..Default::default()
        });
        assert_eq!(topic.parent_topic_id, Some(other));
    }

    // -- history & snapshots -------------------------------------------------

    #[test]
    fn capture_copies_pre_update_state() {
        let topic = sample();
        let history = TopicHistory::capture(new_id(), &topic);
        assert_eq!(history.topic_id, topic.id);
        assert_eq!(history.version, 1);
        assert_eq!(history.content, topic.content);
    }

    #[test]
    fn historical_snapshot_has_no_updated_at() {
        let topic = sample();
        let snapshot = TopicSnapshot::from(TopicHistory::capture(new_id(), &topic));
        assert_eq!(snapshot.id, topic.id);
        assert!(snapshot.updated_at.is_none());

        let json = serde_json::to_value(&snapshot).unwrap();
        assert!(json.get("updated_at").is_none());
    }

    #[test]
    fn tree_serializes_flat_topic_fields() {
        let tree = TopicTree {
            topic: sample(),
            sub_topics: vec![],
        };
        let json = serde_json::to_value(&tree).unwrap();
        assert_eq!(json["name"], "Rust");
        assert!(json["sub_topics"].as_array().unwrap().is_empty());
        assert_eq!(tree.node_count(), 1);
    }

    // -- validation ----------------------------------------------------------

    #[test]
    fn name_validation() {
        assert!(validate_name("Rust").is_ok());
        assert!(validate_name("   ").is_err());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn content_validation() {
        assert!(validate_content("").is_ok());
        assert!(validate_content(&"x".repeat(MAX_CONTENT_LEN + 1)).is_err());
    }

    // -- tri-state -----------------------------------------------------------

    #[derive(Debug, Deserialize)]
    struct Patch {
        #[serde(default, deserialize_with = "deserialize_present")]
        parent_topic_id: Option<Option<DbId>>,
    }

    #[test]
    fn tri_state_distinguishes_absent_null_and_value() {
        let absent: Patch = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.parent_topic_id, None);

        let null: Patch = serde_json::from_str(r#"{"parent_topic_id": null}"#).unwrap();
        assert_eq!(null.parent_topic_id, Some(None));

        let id = new_id();
        let set: Patch =
            serde_json::from_str(&format!(r#"{{"parent_topic_id": "{id}"}}"#)).unwrap();
        assert_eq!(set.parent_topic_id, Some(Some(id)));
    }
}

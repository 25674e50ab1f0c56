//! In-memory store fakes for unit tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::error::CoreError;
use crate::store::{ResourceCleaner, TopicStore};
use crate::topic::{Topic, TopicChanges, TopicHistory};
use crate::types::{new_id, DbId};

/// Ordered log of side effects shared by the fakes.
pub type CallLog = Arc<Mutex<Vec<String>>>;

#[derive(Default)]
pub struct MemoryTopicStore {
    topics: Mutex<Vec<Topic>>,
    history: Mutex<Vec<TopicHistory>>,
    pub log: CallLog,
}

impl MemoryTopicStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(log: CallLog) -> Self {
        Self {
            log,
            ..Self::default()
        }
    }

    pub fn insert(&self, name: &str, parent: Option<DbId>) -> Topic {
        let topic = Topic::create(new_id(), name, format!("{name} content"), parent);
        self.topics.lock().unwrap().push(topic.clone());
        topic
    }

    /// Capture history then apply `changes`, like the transactional update.
    pub fn update(&self, id: DbId, changes: TopicChanges) -> Topic {
        let mut topics = self.topics.lock().unwrap();
        let topic = topics.iter_mut().find(|t| t.id == id).unwrap();
        self.history
            .lock()
            .unwrap()
            .push(TopicHistory::capture(new_id(), topic));
        topic.update(changes);
        topic.clone()
    }

    /// Overwrite a row as-is, bypassing invariants.
    pub fn force_parent(&self, id: DbId, parent: Option<DbId>) {
        let mut topics = self.topics.lock().unwrap();
        let topic = topics.iter_mut().find(|t| t.id == id).unwrap();
        topic.parent_topic_id = parent;
    }

    pub fn contains(&self, id: DbId) -> bool {
        self.topics.lock().unwrap().iter().any(|t| t.id == id)
    }
}

#[async_trait]
impl TopicStore for MemoryTopicStore {
    async fn find_by_id(&self, id: DbId) -> Result<Option<Topic>, CoreError> {
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .find(|t| t.id == id)
            .cloned())
    }

    async fn find_by_parent_id(&self, parent_id: DbId) -> Result<Vec<Topic>, CoreError> {
        Ok(self
            .topics
            .lock()
            .unwrap()
            .iter()
            .filter(|t| t.parent_topic_id == Some(parent_id))
            .cloned()
            .collect())
    }

    async fn get_topic_version(
        &self,
        topic_id: DbId,
        version: i32,
    ) -> Result<Option<TopicHistory>, CoreError> {
        Ok(self
            .history
            .lock()
            .unwrap()
            .iter()
            .find(|h| h.topic_id == topic_id && h.version == version)
            .cloned())
    }

    async fn delete(&self, id: DbId) -> Result<bool, CoreError> {
        self.log.lock().unwrap().push(format!("delete_topic:{id}"));
        let mut topics = self.topics.lock().unwrap();
        let before = topics.len();
        topics.retain(|t| t.id != id);
        Ok(topics.len() < before)
    }
}

/// Records every cleanup call into the shared log.
#[derive(Default)]
pub struct RecordingCleaner {
    pub log: CallLog,
}

impl RecordingCleaner {
    pub fn with_log(log: CallLog) -> Self {
        Self { log }
    }

    pub fn calls(&self) -> usize {
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|entry| entry.starts_with("delete_resources:"))
            .count()
    }
}

#[async_trait]
impl ResourceCleaner for RecordingCleaner {
    async fn delete_resources_by_topic_id(&self, topic_id: DbId) -> Result<(), CoreError> {
        self.log
            .lock()
            .unwrap()
            .push(format!("delete_resources:{topic_id}"));
        Ok(())
    }
}

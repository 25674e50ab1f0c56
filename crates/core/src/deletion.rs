//! Guarded topic deletion.

use crate::error::CoreError;
use crate::store::{ResourceCleaner, TopicStore};
use crate::topic::Topic;
use crate::types::DbId;

/// Delete a childless topic together with its resources.
///
/// Resources are removed before the topic row. A topic with any children is
/// rejected with [`CoreError::HasChildren`] and nothing is touched; there is
/// no subtree cascade. History rows are left in place.
///
/// The children check and the delete are separate steps. A child created
/// between them makes the store delete fail with `HasChildren`, after the
/// resources are already gone; that race is accepted.
pub async fn delete_topic<S, R>(
    store: &S,
    resources: &R,
    topic_id: DbId,
) -> Result<Topic, CoreError>
where
    S: TopicStore + ?Sized,
    R: ResourceCleaner + ?Sized,
{
    let topic = store
        .find_by_id(topic_id)
        .await?
        .ok_or_else(|| CoreError::topic_not_found(topic_id))?;

    let children = store.find_by_parent_id(topic_id).await?;
    if !children.is_empty() {
        return Err(CoreError::HasChildren {
            id: topic_id,
            child_count: children.len(),
        });
    }

    resources.delete_resources_by_topic_id(topic_id).await?;

    if !store.delete(topic_id).await? {
        // Removed concurrently between the lookup and the delete.
        return Err(CoreError::topic_not_found(topic_id));
    }

    Ok(topic)
}

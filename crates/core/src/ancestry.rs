//! Parent assignment checks that keep the hierarchy a tree.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::store::TopicStore;
use crate::types::DbId;

/// PostgreSQL advisory lock ID taken by every transaction that reparents a
/// topic. Only one reparent can run at a time, so each one checks the
/// ancestor chain as the previous one left it.
pub const HIERARCHY_LOCK_ID: i64 = 731_046_215;

/// Check that `parent_id` may become the parent of `topic_id`.
///
/// The parent must exist. For an existing topic (`Some(topic_id)`) the
/// parent may be neither the topic itself nor any of its descendants, which
/// is checked by walking the ancestor chain upward from `parent_id`.
pub async fn ensure_valid_parent<S>(
    store: &S,
    topic_id: Option<DbId>,
    parent_id: DbId,
) -> Result<(), CoreError>
where
    S: TopicStore + ?Sized,
{
    if topic_id == Some(parent_id) {
        return Err(CoreError::Validation(
            "A topic cannot be its own parent".into(),
        ));
    }

    let parent = store.find_by_id(parent_id).await?.ok_or_else(|| {
        CoreError::Validation(format!("Parent topic {parent_id} does not exist"))
    })?;

    let Some(topic_id) = topic_id else {
        return Ok(());
    };

    let mut seen = HashSet::from([parent.id]);
    let mut cursor = parent.parent_topic_id;
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
        cursor = store
            .find_by_id(ancestor_id)
            .await?
            .and_then(|ancestor| ancestor.parent_topic_id);
    }

    Ok(())
}

/// Ancestor ids of `topic_id`, nearest first. Empty for a root.
pub async fn ancestors_of<S>(store: &S, topic_id: DbId) -> Result<Vec<DbId>, CoreError>
where
    S: TopicStore + ?Sized,
{
    let topic = store
        .find_by_id(topic_id)
        .await?
        .ok_or_else(|| CoreError::topic_not_found(topic_id))?;

    let mut ancestors = Vec::new();
    let mut seen = HashSet::from([topic_id]);
    let mut cursor = topic.parent_topic_id;
    while let Some(ancestor_id) = cursor {
        if !seen.insert(ancestor_id) {
            return Err(CoreError::Internal(format!(
                "Ancestor chain of topic {topic_id} contains a cycle"
            )));
        }
        ancestors.push(ancestor_id);
        cursor = store
            .find_by_id(ancestor_id)
            .await?
            .and_then(|ancestor| ancestor.parent_topic_id);
    }

    Ok(ancestors)
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::test_support::MemoryTopicStore;
    use crate::types::new_id;

    #[tokio::test]
    async fn new_topic_only_needs_an_existing_parent() {
        let store = MemoryTopicStore::new();
        let parent = store.insert("Parent", None);

        assert!(ensure_valid_parent(&store, None, parent.id).await.is_ok());
        assert_matches!(
            ensure_valid_parent(&store, None, new_id()).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn self_parenting_is_rejected() {
        let store = MemoryTopicStore::new();
        let topic = store.insert("Self", None);

        assert_matches!(
            ensure_valid_parent(&store, Some(topic.id), topic.id).await,
            Err(CoreError::Validation(_))
        );
    }

    #[tokio::test]
    async fn moving_under_a_descendant_is_rejected() {
        let store = MemoryTopicStore::new();
        let root = store.insert("Root", None);
        let child = store.insert("Child", Some(root.id));
        let grandchild = store.insert("Grandchild", Some(child.id));

        assert_matches!(
            ensure_valid_parent(&store, Some(root.id), grandchild.id).await,
            Err(CoreError::Validation(msg)) if msg.contains("own descendant")
        );
    }

    #[tokio::test]
    async fn moving_to_a_sibling_branch_is_allowed() {
        let store = MemoryTopicStore::new();
        let root = store.insert("Root", None);
        let left = store.insert("Left", Some(root.id));
        let right = store.insert("Right", Some(root.id));

        assert!(ensure_valid_parent(&store, Some(left.id), right.id)
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn ancestors_are_nearest_first() {
        let store = MemoryTopicStore::new();
        let root = store.insert("Root", None);
        let middle = store.insert("Middle", Some(root.id));
        let leaf = store.insert("Leaf", Some(middle.id));

        assert_eq!(
            ancestors_of(&store, leaf.id).await.unwrap(),
            vec![middle.id, root.id]
        );
        assert!(ancestors_of(&store, root.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn corrupted_ancestor_cycle_is_reported() {
        let store = MemoryTopicStore::new();
        let a = store.insert("A", None);
        let b = store.insert("B", Some(a.id));
        store.force_parent(a.id, Some(b.id));

        assert_matches!(
            ancestors_of(&store, b.id).await,
            Err(CoreError::Internal(_))
        );
    }
}

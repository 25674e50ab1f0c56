//! Subtree materialization.
//!
//! The tree is expanded with an explicit work stack into a flat arena, then
//! assembled bottom-up, so deep hierarchies never grow the call stack.

use std::collections::HashSet;

use crate::error::CoreError;
use crate::store::TopicStore;
use crate::topic::{Topic, TopicTree};
use crate::types::DbId;

struct ArenaNode {
    topic: Option<Topic>,
    children: Vec<usize>,
}

/// Build `topic_id` and every transitive child into a [`TopicTree`].
///
/// Children keep the order the store returns them in. A topic reached twice
/// means the stored parent links form a cycle, reported as
/// [`CoreError::Internal`].
pub async fn build_topic_tree<S>(store: &S, topic_id: DbId) -> Result<TopicTree, CoreError>
where
    S: TopicStore + ?Sized,
{
    let root = store
        .find_by_id(topic_id)
        .await?
        .ok_or_else(|| CoreError::topic_not_found(topic_id))?;

    let mut arena = vec![ArenaNode {
        topic: Some(root),
        children: Vec::new(),
    }];
    let mut pending = vec![0usize];
    let mut visited = HashSet::from([topic_id]);

    while let Some(index) = pending.pop() {
        let Some(id) = arena[index].topic.as_ref().map(|t| t.id) else {
            continue;
        };
        let sub_topics = store.find_sub_topics(id).await?;

        let first_child = arena.len();
        for child in sub_topics {
            if !visited.insert(child.id) {
                return Err(CoreError::Internal(format!(
                    "Subtree of topic {topic_id} revisits topic {}",
                    child.id
                )));
            }
            arena.push(ArenaNode {
                topic: Some(child),
                children: Vec::new(),
            });
        }
        let child_indices: Vec<usize> = (first_child..arena.len()).collect();

        // Reverse so the first child is expanded first (pre-order).
        pending.extend(child_indices.iter().rev().copied());
        arena[index].children = child_indices;
    }

    tracing::debug!(topic_id = %topic_id, nodes = arena.len(), "Built topic tree");

    // Children always sit at higher indices than their parent.
    let mut built: Vec<Option<TopicTree>> = (0..arena.len()).map(|_| None).collect();
    for index in (0..arena.len()).rev() {
        let node = &mut arena[index];
        let sub_topics = node
            .children
            .iter()
            .filter_map(|&child| built[child].take())
            .collect();
        if let Some(topic) = node.topic.take() {
            built[index] = Some(TopicTree { topic, sub_topics });
        }
    }

    built
        .into_iter()
        .next()
        .flatten()
        .ok_or_else(|| CoreError::Internal(format!("Topic tree for {topic_id} lost its root")))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::test_support::MemoryTopicStore;
    use crate::types::new_id;

    #[tokio::test]
    async fn missing_root_is_not_found() {
        let store = MemoryTopicStore::new();
        let result = build_topic_tree(&store, new_id()).await;
        assert_matches!(result, Err(CoreError::NotFound { entity: "Topic", .. }));
    }

    #[tokio::test]
    async fn leaf_has_no_sub_topics() {
        let store = MemoryTopicStore::new();
        let leaf = store.insert("Leaf", None);

        let tree = build_topic_tree(&store, leaf.id).await.unwrap();
        assert_eq!(tree.id(), leaf.id);
        assert!(tree.sub_topics.is_empty());
    }

    #[tokio::test]
    async fn two_children_and_a_grandchild() {
        let store = MemoryTopicStore::new();
        let root = store.insert("Root", None);
        let first = store.insert("First", Some(root.id));
        let second = store.insert("Second", Some(root.id));
        let grandchild = store.insert("Grandchild", Some(first.id));

        let tree = build_topic_tree(&store, root.id).await.unwrap();

        assert_eq!(tree.sub_topics.len(), 2);
        assert_eq!(tree.sub_topics[0].id(), first.id);
        assert_eq!(tree.sub_topics[1].id(), second.id);
        assert_eq!(tree.sub_topics[0].sub_topics.len(), 1);
        assert_eq!(tree.sub_topics[0].sub_topics[0].id(), grandchild.id);
        assert!(tree.sub_topics[1].sub_topics.is_empty());
        assert_eq!(tree.node_count(), 4);
    }

    #[tokio::test]
    async fn subtree_of_inner_node_excludes_ancestors() {
        let store = MemoryTopicStore::new();
        let root = store.insert("Root", None);
        let middle = store.insert("Middle", Some(root.id));
        store.insert("Bottom", Some(middle.id));

        let tree = build_topic_tree(&store, middle.id).await.unwrap();
        assert_eq!(tree.id(), middle.id);
        assert_eq!(tree.node_count(), 2);
    }

    #[tokio::test]
    async fn deep_chain_does_not_recurse() {
        let store = MemoryTopicStore::new();
        let root = store.insert("Level 0", None);
        let mut parent = root.id;
        for depth in 1..2_000 {
            parent = store.insert(&format!("Level {depth}"), Some(parent)).id;
        }

        let tree = build_topic_tree(&store, root.id).await.unwrap();

        let mut depth = 0;
        let mut cursor = &tree;
        while let Some(next) = cursor.sub_topics.first() {
            cursor = next;
            depth += 1;
        }
        assert_eq!(depth, 1_999);
        assert_eq!(cursor.id(), parent);
    }

    #[tokio::test]
    async fn corrupted_cycle_is_reported_not_looped() {
        let store = MemoryTopicStore::new();
        let a = store.insert("A", None);
        let b = store.insert("B", Some(a.id));
        store.force_parent(a.id, Some(b.id));

        let result = build_topic_tree(&store, a.id).await;
        assert_matches!(
            result,
            Err(CoreError::Internal(msg)) if msg.contains(&a.id.to_string())
        );
    }
}

//! Path search between two topics.

use std::collections::{HashMap, HashSet};

use crate::error::CoreError;
use crate::store::TopicStore;
use crate::types::DbId;

/// Find the downward path from `start_id` to `end_id`, both inclusive.
///
/// Depth-first over [`TopicStore::find_sub_topics`], children visited in
/// store order, first hit wins. Returns an empty vec when `end_id` is not
/// below `start_id` or `start_id` does not exist. `start_id == end_id`
/// yields `[start_id]` only if that topic exists.
pub async fn find_topic_path<S>(
    store: &S,
    start_id: DbId,
    end_id: DbId,
) -> Result<Vec<DbId>, CoreError>
where
    S: TopicStore + ?Sized,
{
    let mut visited: HashSet<DbId> = HashSet::new();
    let mut came_from: HashMap<DbId, DbId> = HashMap::new();
    let mut stack: Vec<(DbId, Option<DbId>)> = vec![(start_id, None)];

    while let Some((current, from)) = stack.pop() {
        if !visited.insert(current) {
            continue;
        }
        if store.find_by_id(current).await?.is_none() {
            continue;
        }
        if let Some(from) = from {
            came_from.insert(current, from);
        }

        if current == end_id {
            let path = unwind(&came_from, start_id, end_id);
            tracing::debug!(
                start_id = %start_id,
                end_id = %end_id,
                length = path.len(),
                visited = visited.len(),
                "Found topic path"
            );
            return Ok(path);
        }

        let children = store.find_sub_topics(current).await?;
        for child in children.iter().rev() {
            if !visited.contains(&child.id) {
                stack.push((child.id, Some(current)));
            }
        }
    }

    tracing::debug!(
        start_id = %start_id,
        end_id = %end_id,
        visited = visited.len(),
        "No topic path"
    );
    Ok(Vec::new())
}

fn unwind(came_from: &HashMap<DbId, DbId>, start_id: DbId, end_id: DbId) -> Vec<DbId> {
    let mut path = vec![end_id];
    let mut cursor = end_id;
    while cursor != start_id {
        match came_from.get(&cursor) {
            Some(&previous) => {
                path.push(previous);
                cursor = previous;
            }
            None => break,
        }
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MemoryTopicStore;
    use crate::types::new_id;

    #[tokio::test]
    async fn same_id_returns_single_element() {
        let store = MemoryTopicStore::new();
        let topic = store.insert("Solo", None);

        let path = find_topic_path(&store, topic.id, topic.id).await.unwrap();
        assert_eq!(path, vec![topic.id]);
    }

    #[tokio::test]
    async fn same_id_that_does_not_exist_returns_empty() {
        let store = MemoryTopicStore::new();
        let ghost = new_id();

        let path = find_topic_path(&store, ghost, ghost).await.unwrap();
        assert!(path.is_empty());
    }

    #[tokio::test]
    async fn parent_to_child() {
        let store = MemoryTopicStore::new();
        let parent = store.insert("P", None);
        let child = store.insert("C", Some(parent.id));

        let path = find_topic_path(&store, parent.id, child.id).await.unwrap();
        assert_eq!(path, vec![parent.id, child.id]);
    }

    #[tokio::test]
    async fn root_to_deep_leaf_in_root_to_leaf_order() {
        let store = MemoryTopicStore::new();
        let root = store.insert("Root", None);
        let decoy = store.insert("Decoy", Some(root.id));
        store.insert("Decoy leaf", Some(decoy.id));
        let branch = store.insert("Branch", Some(root.id));
        let leaf = store.insert("Leaf", Some(branch.id));

        let path = find_topic_path(&store, root.id, leaf.id).await.unwrap();
        assert_eq!(path, vec![root.id, branch.id, leaf.id]);
    }

    #[tokio::test]
    async fn unrelated_leaf_has_no_path() {
        let store = MemoryTopicStore::new();
        let root = store.insert("Root", None);
        let leaf = store.insert("Leaf", Some(root.id));
        let other = store.insert("Other root", None);

        let path = find_topic_path(&store, leaf.id, other.id).await.unwrap();
        assert!(path.is_empty());
    }

    #[tokio::test]
    async fn search_only_goes_downward() {
        let store = MemoryTopicStore::new();
        let parent = store.insert("P", None);
        let child = store.insert("C", Some(parent.id));

        let path = find_topic_path(&store, child.id, parent.id).await.unwrap();
        assert!(path.is_empty());
    }

    #[tokio::test]
    async fn missing_start_returns_empty() {
        let store = MemoryTopicStore::new();
        let target = store.insert("Target", None);

        let path = find_topic_path(&store, new_id(), target.id).await.unwrap();
        assert!(path.is_empty());
    }

    #[tokio::test]
    async fn visited_set_stops_corrupted_cycles() {
        let store = MemoryTopicStore::new();
        let a = store.insert("A", None);
        let b = store.insert("B", Some(a.id));
        store.force_parent(a.id, Some(b.id));
        let unreachable = store.insert("Elsewhere", None);

        let path = find_topic_path(&store, a.id, unreachable.id).await.unwrap();
        assert!(path.is_empty());
        assert!(store.contains(a.id));
    }
}

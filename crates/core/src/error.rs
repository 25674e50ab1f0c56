use crate::types::DbId;

/// Boxed persistence-layer error carried through [`CoreError::Store`].
pub type StoreError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Version {version} not found for topic {topic_id}")]
    VersionNotFound { topic_id: DbId, version: i32 },

    #[error("Topic {id} has {child_count} child topic(s) and cannot be deleted")]
    HasChildren { id: DbId, child_count: usize },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Store failure: {0}")]
    Store(#[source] StoreError),
}

impl CoreError {
    /// Wrap a persistence error without interpreting it.
    pub fn store<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        CoreError::Store(Box::new(err))
    }

    /// Shorthand for a missing topic.
    pub fn topic_not_found(id: DbId) -> Self {
        CoreError::NotFound { entity: "Topic", id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_keeps_source_message() {
        let inner = std::io::Error::new(std::io::ErrorKind::Other, "connection reset");
        let err = CoreError::store(inner);
        assert_eq!(err.to_string(), "Store failure: connection reset");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn has_children_message_names_the_count() {
        let id = uuid::Uuid::nil();
        let err = CoreError::HasChildren { id, child_count: 2 };
        assert!(err.to_string().contains("has 2 child topic(s)"));
    }
}

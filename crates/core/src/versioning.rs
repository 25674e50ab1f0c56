//! Point-in-time topic reads.

use crate::error::CoreError;
use crate::store::TopicStore;
use crate::topic::TopicSnapshot;
use crate::types::DbId;

/// Return `topic_id` as it looked at `version`.
///
/// The current version is served from the live row (with `updated_at`);
/// anything older comes from the history table (without it).
pub async fn resolve_topic_version<S>(
    store: &S,
    topic_id: DbId,
    version: i32,
) -> Result<TopicSnapshot, CoreError>
where
    S: TopicStore + ?Sized,
{
    let topic = store
        .find_by_id(topic_id)
        .await?
        .ok_or_else(|| CoreError::topic_not_found(topic_id))?;

    if topic.version == version {
        return Ok(topic.into());
    }

    store
        .get_topic_version(topic_id, version)
        .await?
        .map(TopicSnapshot::from)
        .ok_or(CoreError::VersionNotFound { topic_id, version })
}

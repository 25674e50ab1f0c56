//! Route definitions for the topic hierarchy.
//!
//! Registered under `/topics`.

use axum::routing::get;
use axum::Router;

use crate::handlers::topic;
use crate::state::AppState;

/// Topic routes, registered as `/topics`.
///
/// ```text
/// GET    /                          list_topics
/// POST   /                          create_topic
/// GET    /roots                     list_root_topics
/// GET    /path                      get_topic_path
/// GET    /{id}                      get_topic
/// PUT    /{id}                      update_topic
/// DELETE /{id}                      remove_topic
/// GET    /{id}/children             list_children
/// GET    /{id}/ancestors            list_ancestors
/// GET    /{id}/tree                 get_topic_tree
/// GET    /{id}/history              list_history
/// GET    /{id}/versions/{version}   get_topic_version
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(topic::list_topics).post(topic::create_topic))
        .route("/roots", get(topic::list_root_topics))
        .route("/path", get(topic::get_topic_path))
        .route(
            "/{id}",
            get(topic::get_topic)
                .put(topic::update_topic)
                .delete(topic::remove_topic),
        )
        .route("/{id}/children", get(topic::list_children))
        .route("/{id}/ancestors", get(topic::list_ancestors))
        .route("/{id}/tree", get(topic::get_topic_tree))
        .route("/{id}/history", get(topic::list_history))
        .route("/{id}/versions/{version}", get(topic::get_topic_version))
}

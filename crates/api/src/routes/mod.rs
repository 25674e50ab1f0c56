pub mod health;
pub mod topic;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /topics                                          list, create
/// /topics/roots                                    root topics
/// /topics/path?start=&end=                         path between two topics
/// /topics/{id}                                     get, update, delete
/// /topics/{id}/children                            direct children
/// /topics/{id}/ancestors                           ancestor chain
/// /topics/{id}/tree                                full subtree
/// /topics/{id}/history                             captured versions
/// /topics/{id}/versions/{version}                  point-in-time read
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new().nest("/topics", topic::router())
}

//! Shared query parameter types for API handlers.

use kb_core::types::DbId;
use serde::Deserialize;

/// Paginated listing parameters
/// (`?limit=&offset=&order_by=&order_direction=`).
///
/// Numbers are clamped and ordering keys validated by
/// `kb_core::pagination::TopicPageRequest::parse`.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub order_by: Option<String>,
    pub order_direction: Option<String>,
}

/// Endpoints of a path query (`?start=&end=`).
#[derive(Debug, Deserialize)]
pub struct PathParams {
    pub start: DbId,
    pub end: DbId,
}

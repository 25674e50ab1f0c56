//! Handlers for the topic hierarchy and versioning endpoints.
//!
//! Provides topic CRUD, structural views (children, ancestors, subtree,
//! path), version history and point-in-time reads.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

use kb_core::ancestry::{ancestors_of, ensure_valid_parent};
use kb_core::deletion::delete_topic;
use kb_core::error::CoreError;
use kb_core::pagination::TopicPageRequest;
use kb_core::path::find_topic_path;
use kb_core::topic::{validate_content, validate_name, Topic, TopicHistoryEntry};
use kb_core::tree::build_topic_tree;
use kb_core::types::{new_id, DbId};
use kb_core::versioning::resolve_topic_version;
use kb_db::models::topic::{CreateTopic, TopicPage, UpdateTopic};
use kb_db::repositories::{TopicHistoryRepo, TopicRepo};

use crate::error::{AppError, AppResult};
use crate::query::{ListParams, PathParams};
use crate::response::DataResponse;
use crate::state::AppState;

/* --------------------------------------------------------------------------
Helpers
-------------------------------------------------------------------------- */

/// Fetch a topic by id or return 404.
async fn ensure_topic(pool: &sqlx::PgPool, id: DbId) -> AppResult<Topic> {
    TopicRepo::find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::topic_not_found(id)))
}

/* --------------------------------------------------------------------------
Topic CRUD
-------------------------------------------------------------------------- */

/// GET /topics
///
/// Paginated listing with the unpaginated total.
pub async fn list_topics(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> AppResult<impl IntoResponse> {
    let page = TopicPageRequest::parse(
        params.limit,
        params.offset,
        params.order_by.as_deref(),
        params.order_direction.as_deref(),
    )?;

    let items = TopicRepo::get_paginated_topics(&state.pool, &page).await?;
    let total = TopicRepo::get_total_topics_count(&state.pool).await?;

    Ok(Json(DataResponse {
        data: TopicPage {
            items,
            total,
            limit: page.limit,
            offset: page.offset,
        },
    }))
}

/// POST /topics
///
/// Create a topic at version 1, optionally under an existing parent.
pub async fn create_topic(
    State(state): State<AppState>,
    Json(input): Json<CreateTopic>,
) -> AppResult<impl IntoResponse> {
    validate_name(&input.name)?;
    validate_content(&input.content)?;

    if let Some(parent_id) = input.parent_topic_id {
        ensure_valid_parent(&state.topic_store(), None, parent_id).await?;
    }

    let topic = Topic::create(
        new_id(),
        input.name,
        input.content,
        input.parent_topic_id,
    );
    let topic = TopicRepo::create(&state.pool, &topic).await?;

    tracing::info!(
        created_by = %input.created_by,
        topic_id = %topic.id,
        parent_topic_id = ?topic.parent_topic_id,
        "Topic created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: topic })))
}

/// GET /topics/{id}
pub async fn get_topic(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let topic = ensure_topic(&state.pool, id).await?;
    Ok(Json(DataResponse { data: topic }))
}

/// PUT /topics/{id}
///
/// Partial update. Captures the pre-update state into history and bumps the
/// version in a single transaction. The parent check here gives early errors;
/// the transaction repeats it under the hierarchy lock.
pub async fn update_topic(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateTopic>,
) -> AppResult<impl IntoResponse> {
    ensure_topic(&state.pool, id).await?;

    if let Some(ref name) = input.name {
        validate_name(name)?;
    }
    if let Some(ref content) = input.content {
        validate_content(content)?;
    }
    if let Some(Some(parent_id)) = input.parent_topic_id {
        ensure_valid_parent(&state.topic_store(), Some(id), parent_id).await?;
    }

    let topic = TopicRepo::update_with_history(&state.pool, id, input.changes()).await?;

    tracing::info!(
        updated_by = %input.updated_by,
        topic_id = %topic.id,
        version = topic.version,
        "Topic updated"
    );

    Ok(Json(DataResponse { data: topic }))
}

/// DELETE /topics/{id}
///
/// Rejected with 409 while the topic has children. Attached resources are
/// removed before the topic itself.
pub async fn remove_topic(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let topic = delete_topic(&state.topic_store(), &state.resource_cleaner(), id).await?;

    tracing::info!(topic_id = %topic.id, version = topic.version, "Topic deleted");

    Ok(StatusCode::NO_CONTENT)
}

/* --------------------------------------------------------------------------
Structure
-------------------------------------------------------------------------- */

/// GET /topics/roots
pub async fn list_root_topics(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let roots = TopicRepo::find_roots(&state.pool).await?;
    Ok(Json(DataResponse { data: roots }))
}

/// GET /topics/{id}/children
///
/// Direct children only.
pub async fn list_children(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_topic(&state.pool, id).await?;
    let children = TopicRepo::find_by_parent_id(&state.pool, id).await?;
    Ok(Json(DataResponse { data: children }))
}

/// GET /topics/{id}/ancestors
///
/// Ancestor ids, nearest parent first.
pub async fn list_ancestors(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let ancestors = ancestors_of(&state.topic_store(), id).await?;
    Ok(Json(DataResponse { data: ancestors }))
}

/// GET /topics/{id}/tree
pub async fn get_topic_tree(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let tree = build_topic_tree(&state.topic_store(), id).await?;
    Ok(Json(DataResponse { data: tree }))
}

/// GET /topics/path?start=&end=
///
/// Ids from `start` down to `end`, or an empty list when unreachable.
pub async fn get_topic_path(
    State(state): State<AppState>,
    Query(params): Query<PathParams>,
) -> AppResult<impl IntoResponse> {
    let path = find_topic_path(&state.topic_store(), params.start, params.end).await?;
    Ok(Json(DataResponse { data: path }))
}

/* --------------------------------------------------------------------------
Versions
-------------------------------------------------------------------------- */

/// GET /topics/{id}/history
///
/// Captured versions, newest first.
pub async fn list_history(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_topic(&state.pool, id).await?;
    let history = TopicHistoryRepo::list_by_topic(&state.pool, id).await?;
    let entries: Vec<TopicHistoryEntry> = history.iter().map(TopicHistoryEntry::from).collect();
    Ok(Json(DataResponse { data: entries }))
}

/// GET /topics/{id}/versions/{version}
pub async fn get_topic_version(
    State(state): State<AppState>,
    Path((id, version)): Path<(DbId, i32)>,
) -> AppResult<impl IntoResponse> {
    if version < 1 {
        return Err(AppError::BadRequest(format!(
            "Version must be at least 1, got {version}"
        )));
    }
    let snapshot = resolve_topic_version(&state.topic_store(), id, version).await?;
    Ok(Json(DataResponse { data: snapshot }))
}

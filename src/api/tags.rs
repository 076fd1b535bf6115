//! Tag management endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::{AppError, AppResult},
    models::{
        enums::TagStatus,
        tag::{CreateTag, Tag, TagStats},
    },
};

use super::AuthenticatedUser;

/// Query parameters for tag listing
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct TagQuery {
    pub status: Option<String>,
    /// Defaults to true
    pub active_only: Option<bool>,
}

/// Assign request
#[derive(Deserialize, ToSchema)]
pub struct AssignTagRequest {
    pub visit_id: i64,
}

/// Release request; the visit the caller believes holds the tag
#[derive(Deserialize, ToSchema)]
pub struct ReleaseTagRequest {
    pub visit_id: i64,
}

/// Administrative status change request
#[derive(Deserialize, ToSchema)]
pub struct UpdateTagStatusRequest {
    pub status: TagStatus,
}

/// List tags
#[utoipa::path(
    get,
    path = "/tags",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(TagQuery),
    responses(
        (status = 200, description = "Tags", body = Vec<Tag>)
    )
)]
pub async fn list_tags(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<TagQuery>,
) -> AppResult<Json<Vec<Tag>>> {
    let status = match &query.status {
        Some(s) => Some(s.parse::<TagStatus>().map_err(AppError::Validation)?),
        None => None,
    };
    let tags = state
        .services
        .tags
        .list(status, query.active_only.unwrap_or(true))
        .await?;
    Ok(Json(tags))
}

/// Register a new physical tag (admin)
#[utoipa::path(
    post,
    path = "/tags",
    tag = "tags",
    security(("bearer_auth" = [])),
    request_body = CreateTag,
    responses(
        (status = 201, description = "Tag created", body = Tag),
        (status = 403, description = "Administrator rights required"),
        (status = 409, description = "Tag number already exists")
    )
)]
pub async fn create_tag(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateTag>,
) -> AppResult<(StatusCode, Json<Tag>)> {
    claims.require_admin()?;
    let tag = state.services.tags.create(request, Utc::now()).await?;
    Ok((StatusCode::CREATED, Json(tag)))
}

/// Tag statistics by status
#[utoipa::path(
    get,
    path = "/tags/stats",
    tag = "tags",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-status tag counts", body = TagStats)
    )
)]
pub async fn tag_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<TagStats>> {
    let stats = state.services.tags.stats().await?;
    Ok(Json(stats))
}

/// Get a tag
#[utoipa::path(
    get,
    path = "/tags/{id}",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag", body = Tag),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn get_tag(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(tag_id): Path<i64>,
) -> AppResult<Json<Tag>> {
    let tag = state.services.tags.get(tag_id).await?;
    Ok(Json(tag))
}

/// Assign a tag to an open visit
#[utoipa::path(
    post,
    path = "/tags/{id}/assign",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tag ID")),
    request_body = AssignTagRequest,
    responses(
        (status = 200, description = "Tag assigned", body = Tag),
        (status = 404, description = "Tag or visit not found"),
        (status = 422, description = "Tag not available or visit closed")
    )
)]
pub async fn assign_tag(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(tag_id): Path<i64>,
    Json(request): Json<AssignTagRequest>,
) -> AppResult<Json<Tag>> {
    let tag = state
        .services
        .tags
        .assign(tag_id, request.visit_id, Utc::now())
        .await?;
    Ok(Json(tag))
}

/// Release a tag from the visit holding it
#[utoipa::path(
    post,
    path = "/tags/{id}/release",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tag ID")),
    request_body = ReleaseTagRequest,
    responses(
        (status = 200, description = "Tag released", body = Tag),
        (status = 404, description = "Tag not found"),
        (status = 409, description = "Tag held by a different visit"),
        (status = 422, description = "Tag not in use")
    )
)]
pub async fn release_tag(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(tag_id): Path<i64>,
    Json(request): Json<ReleaseTagRequest>,
) -> AppResult<Json<Tag>> {
    let tag = state
        .services
        .tags
        .release(tag_id, request.visit_id, Utc::now())
        .await?;
    Ok(Json(tag))
}

/// Administrative status change (lost/damaged/maintenance/reserved/retired/
/// available), validated against the transition table
#[utoipa::path(
    put,
    path = "/tags/{id}/status",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tag ID")),
    request_body = UpdateTagStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = Tag),
        (status = 404, description = "Tag not found"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn update_tag_status(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(tag_id): Path<i64>,
    Json(request): Json<UpdateTagStatusRequest>,
) -> AppResult<Json<Tag>> {
    let tag = state
        .services
        .tags
        .set_status(tag_id, request.status, Utc::now())
        .await?;
    Ok(Json(tag))
}

/// Deactivate a tag (admin)
#[utoipa::path(
    delete,
    path = "/tags/{id}",
    tag = "tags",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Tag ID")),
    responses(
        (status = 200, description = "Tag deactivated", body = Tag),
        (status = 403, description = "Administrator rights required"),
        (status = 404, description = "Tag not found")
    )
)]
pub async fn deactivate_tag(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(tag_id): Path<i64>,
) -> AppResult<Json<Tag>> {
    claims.require_admin()?;
    let tag = state
        .services
        .tags
        .set_active(tag_id, false, Utc::now())
        .await?;
    Ok(Json(tag))
}

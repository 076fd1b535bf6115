//! Visitor registration endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::{
        visit::Visit,
        visitor::{RegisterVisitor, Visitor, VisitorQuery},
    },
};

use super::AuthenticatedUser;

/// Registration response; `created` is false when an existing visitor
/// matched by email or phone was returned instead
#[derive(Serialize, ToSchema)]
pub struct RegisterResponse {
    pub visitor: Visitor,
    pub created: bool,
}

/// Search visitors
#[utoipa::path(
    get,
    path = "/visitors",
    tag = "visitors",
    security(("bearer_auth" = [])),
    params(VisitorQuery),
    responses(
        (status = 200, description = "Matching visitors", body = Vec<Visitor>)
    )
)]
pub async fn list_visitors(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<VisitorQuery>,
) -> AppResult<Json<Vec<Visitor>>> {
    let visitors = state.services.visitors.search(&query).await?;
    Ok(Json(visitors))
}

/// Register a visitor (deduplicated by email/phone)
#[utoipa::path(
    post,
    path = "/visitors",
    tag = "visitors",
    security(("bearer_auth" = [])),
    request_body = RegisterVisitor,
    responses(
        (status = 201, description = "Visitor registered", body = RegisterResponse),
        (status = 200, description = "Existing visitor returned", body = RegisterResponse),
        (status = 400, description = "Invalid visitor data")
    )
)]
pub async fn register_visitor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(request): Json<RegisterVisitor>,
) -> AppResult<(StatusCode, Json<RegisterResponse>)> {
    let (visitor, created) = state
        .services
        .visitors
        .register(request, chrono::Utc::now())
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((status, Json(RegisterResponse { visitor, created })))
}

/// Get a visitor
#[utoipa::path(
    get,
    path = "/visitors/{id}",
    tag = "visitors",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor", body = Visitor),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn get_visitor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(visitor_id): Path<i64>,
) -> AppResult<Json<Visitor>> {
    let visitor = state.services.visitors.get(visitor_id).await?;
    Ok(Json(visitor))
}

/// Get a visitor's visit history
#[utoipa::path(
    get,
    path = "/visitors/{id}/visits",
    tag = "visitors",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor's visits", body = Vec<Visit>),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn get_visitor_visits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(visitor_id): Path<i64>,
) -> AppResult<Json<Vec<Visit>>> {
    let visits = state.services.visits.list_by_visitor(visitor_id).await?;
    Ok(Json(visits))
}

/// Deactivate a visitor (admin)
#[utoipa::path(
    delete,
    path = "/visitors/{id}",
    tag = "visitors",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Visitor ID")),
    responses(
        (status = 200, description = "Visitor deactivated", body = Visitor),
        (status = 403, description = "Administrator rights required"),
        (status = 404, description = "Visitor not found")
    )
)]
pub async fn deactivate_visitor(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(visitor_id): Path<i64>,
) -> AppResult<Json<Visitor>> {
    claims.require_admin()?;
    let visitor = state
        .services
        .visitors
        .deactivate(visitor_id, chrono::Utc::now())
        .await?;
    Ok(Json(visitor))
}

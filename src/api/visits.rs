//! Visit lifecycle endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::ToSchema;

use crate::{
    error::AppResult,
    models::visit::{OpenVisit, Visit, VisitDetails, VisitQuery},
};

use super::AuthenticatedUser;

/// Checkout request
#[derive(Deserialize, ToSchema)]
pub struct CheckoutRequest {
    /// Defaults to the current time
    pub departure_time: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// Extend request
#[derive(Deserialize, ToSchema)]
pub struct ExtendRequest {
    pub new_estimated_departure: DateTime<Utc>,
}

/// List active visits
#[utoipa::path(
    get,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Active visits", body = Vec<VisitDetails>)
    )
)]
pub async fn list_active_visits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<Vec<VisitDetails>>> {
    let visits = state.services.visits.list_active().await?;
    Ok(Json(visits))
}

/// Search visit history
#[utoipa::path(
    get,
    path = "/visits/history",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(VisitQuery),
    responses(
        (status = 200, description = "Matching visits", body = Vec<VisitDetails>)
    )
)]
pub async fn search_visits(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Query(query): Query<VisitQuery>,
) -> AppResult<Json<Vec<VisitDetails>>> {
    let visits = state.services.visits.search(&query).await?;
    Ok(Json(visits))
}

/// Open a new visit, optionally assigning a tag
#[utoipa::path(
    post,
    path = "/visits",
    tag = "visits",
    security(("bearer_auth" = [])),
    request_body = OpenVisit,
    responses(
        (status = 201, description = "Visit opened", body = Visit),
        (status = 400, description = "Invalid time window"),
        (status = 404, description = "Visitor or tag not found"),
        (status = 422, description = "Tag not available")
    )
)]
pub async fn open_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<OpenVisit>,
) -> AppResult<(StatusCode, Json<Visit>)> {
    let visit = state
        .services
        .visits
        .open(&request, claims.user_id, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(visit)))
}

/// Get a visit
#[utoipa::path(
    get,
    path = "/visits/{id}",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit", body = Visit),
        (status = 404, description = "Visit not found")
    )
)]
pub async fn get_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(visit_id): Path<i64>,
) -> AppResult<Json<Visit>> {
    let visit = state.services.visits.get(visit_id).await?;
    Ok(Json(visit))
}

/// Check out a visit
#[utoipa::path(
    post,
    path = "/visits/{id}/checkout",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Visit ID")),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Visit checked out", body = Visit),
        (status = 404, description = "Visit not found"),
        (status = 422, description = "Visit already closed")
    )
)]
pub async fn checkout_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(visit_id): Path<i64>,
    Json(request): Json<CheckoutRequest>,
) -> AppResult<Json<Visit>> {
    let now = Utc::now();
    let visit = state
        .services
        .visits
        .checkout(
            visit_id,
            request.departure_time.unwrap_or(now),
            request.notes.as_deref(),
            now,
        )
        .await?;
    Ok(Json(visit))
}

/// Extend a visit's estimated departure
#[utoipa::path(
    post,
    path = "/visits/{id}/extend",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Visit ID")),
    request_body = ExtendRequest,
    responses(
        (status = 200, description = "Visit extended", body = Visit),
        (status = 400, description = "Invalid time window"),
        (status = 404, description = "Visit not found"),
        (status = 422, description = "Visit already closed")
    )
)]
pub async fn extend_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(visit_id): Path<i64>,
    Json(request): Json<ExtendRequest>,
) -> AppResult<Json<Visit>> {
    let visit = state
        .services
        .visits
        .extend(visit_id, request.new_estimated_departure, Utc::now())
        .await?;
    Ok(Json(visit))
}

/// Cancel a visit before checkout
#[utoipa::path(
    post,
    path = "/visits/{id}/cancel",
    tag = "visits",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "Visit ID")),
    responses(
        (status = 200, description = "Visit cancelled", body = Visit),
        (status = 404, description = "Visit not found"),
        (status = 422, description = "Visit cannot be cancelled")
    )
)]
pub async fn cancel_visit(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Path(visit_id): Path<i64>,
) -> AppResult<Json<Visit>> {
    let visit = state.services.visits.cancel(visit_id, Utc::now()).await?;
    Ok(Json(visit))
}

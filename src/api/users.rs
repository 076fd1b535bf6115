//! Staff user management endpoints (admin only)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::user::{CreateUser, UpdateUser, UserShort},
};

use super::AuthenticatedUser;

/// List staff users
#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Staff users", body = Vec<UserShort>),
        (status = 403, description = "Administrator rights required")
    )
)]
pub async fn list_users(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<UserShort>>> {
    claims.require_admin()?;
    let users = state.services.users.list().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

/// Create a staff user
#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    security(("bearer_auth" = [])),
    request_body = CreateUser,
    responses(
        (status = 201, description = "User created", body = UserShort),
        (status = 403, description = "Administrator rights required"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn create_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateUser>,
) -> AppResult<(StatusCode, Json<UserShort>)> {
    claims.require_admin()?;
    let user = state.services.users.create(request).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Get a staff user
#[utoipa::path(
    get,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    responses(
        (status = 200, description = "User", body = UserShort),
        (status = 403, description = "Administrator rights required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i64>,
) -> AppResult<Json<UserShort>> {
    claims.require_admin()?;
    let user = state.services.users.get(user_id).await?;
    Ok(Json(user.into()))
}

/// Partial update of a staff user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    security(("bearer_auth" = [])),
    params(("id" = i64, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = UserShort),
        (status = 403, description = "Administrator rights required"),
        (status = 404, description = "User not found")
    )
)]
pub async fn update_user(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i64>,
    Json(request): Json<UpdateUser>,
) -> AppResult<Json<UserShort>> {
    claims.require_admin()?;
    let user = state.services.users.update(user_id, request).await?;
    Ok(Json(user.into()))
}

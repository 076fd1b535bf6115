//! Company settings endpoints

use axum::{extract::State, Json};

use crate::{
    error::AppResult,
    models::settings::{CompanySettings, UpdateCompanySettings},
};

use super::AuthenticatedUser;

/// Get company settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Company settings", body = CompanySettings)
    )
)]
pub async fn get_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<CompanySettings>> {
    let settings = state.services.settings.get().await?;
    Ok(Json(settings))
}

/// Partial update of company settings (admin)
#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = UpdateCompanySettings,
    responses(
        (status = 200, description = "Settings updated", body = CompanySettings),
        (status = 400, description = "Invalid settings"),
        (status = 403, description = "Administrator rights required")
    )
)]
pub async fn update_settings(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<UpdateCompanySettings>,
) -> AppResult<Json<CompanySettings>> {
    claims.require_admin()?;
    let settings = state
        .services
        .settings
        .update(request, claims.user_id)
        .await?;
    Ok(Json(settings))
}

//! Dashboard statistics endpoint

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{error::AppResult, services::stats::DashboardStats};

use super::AuthenticatedUser;

/// Front-desk dashboard snapshot
#[utoipa::path(
    get,
    path = "/stats",
    tag = "stats",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Dashboard statistics", body = DashboardStats)
    )
)]
pub async fn dashboard_stats(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<DashboardStats>> {
    let settings = state.services.settings.get().await?;
    let stats = state
        .services
        .stats
        .dashboard(Utc::now(), i64::from(settings.auto_checkout_grace_minutes))
        .await?;
    Ok(Json(stats))
}

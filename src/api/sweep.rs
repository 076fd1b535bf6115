//! Manual overdue sweep trigger

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{error::AppResult, services::sweep::SweepReport};

use super::AuthenticatedUser;

/// Run one overdue sweep pass now (admin)
#[utoipa::path(
    post,
    path = "/sweep/run",
    tag = "sweep",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Sweep report", body = SweepReport),
        (status = 403, description = "Administrator rights required")
    )
)]
pub async fn run_sweep(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<SweepReport>> {
    claims.require_admin()?;
    let settings = state.services.settings.get().await?;
    let report = state
        .services
        .sweep
        .run(Utc::now(), i64::from(settings.auto_checkout_grace_minutes))
        .await?;
    Ok(Json(report))
}

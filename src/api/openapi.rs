//! OpenAPI documentation

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{auth, health, settings, stats, sweep, tags, users, visitors, visits};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Gatehouse API",
        version = "1.0.0",
        description = "Visitor Management System REST API",
        license(name = "AGPL-3.0", url = "https://www.gnu.org/licenses/agpl-3.0.html")
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Visitors
        visitors::list_visitors,
        visitors::register_visitor,
        visitors::get_visitor,
        visitors::get_visitor_visits,
        visitors::deactivate_visitor,
        // Visits
        visits::list_active_visits,
        visits::search_visits,
        visits::open_visit,
        visits::get_visit,
        visits::checkout_visit,
        visits::extend_visit,
        visits::cancel_visit,
        // Tags
        tags::list_tags,
        tags::create_tag,
        tags::tag_stats,
        tags::get_tag,
        tags::assign_tag,
        tags::release_tag,
        tags::update_tag_status,
        tags::deactivate_tag,
        // Users
        users::list_users,
        users::create_user,
        users::get_user,
        users::update_user,
        // Sweep
        sweep::run_sweep,
        // Stats
        stats::dashboard_stats,
        // Settings
        settings::get_settings,
        settings::update_settings,
    ),
    components(
        schemas(
            // Auth
            auth::LoginRequest,
            auth::LoginResponse,
            // Visitors
            crate::models::visitor::Visitor,
            crate::models::visitor::RegisterVisitor,
            crate::models::visitor::VisitorQuery,
            visitors::RegisterResponse,
            // Visits
            crate::models::visit::Visit,
            crate::models::visit::VisitDetails,
            crate::models::visit::VisitQuery,
            crate::models::visit::OpenVisit,
            visits::CheckoutRequest,
            visits::ExtendRequest,
            // Tags
            crate::models::tag::Tag,
            crate::models::tag::CreateTag,
            crate::models::tag::TagStats,
            tags::TagQuery,
            tags::AssignTagRequest,
            tags::ReleaseTagRequest,
            tags::UpdateTagStatusRequest,
            // Users
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            crate::models::user::UpdateUser,
            // Enums
            crate::models::enums::TagStatus,
            crate::models::enums::VisitStatus,
            crate::models::enums::VisitorCategory,
            crate::models::enums::UserRole,
            // Sweep
            crate::services::sweep::SweepReport,
            crate::services::sweep::SweepFailure,
            // Stats
            crate::services::stats::DashboardStats,
            crate::services::stats::VisitStats,
            crate::services::stats::VisitorStats,
            crate::services::stats::TagStatsSummary,
            // Settings
            crate::models::settings::CompanySettings,
            crate::models::settings::UpdateCompanySettings,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "visitors", description = "Visitor registration"),
        (name = "visits", description = "Visit lifecycle"),
        (name = "tags", description = "Badge tag management"),
        (name = "users", description = "Staff user management"),
        (name = "sweep", description = "Overdue auto-checkout sweep"),
        (name = "stats", description = "Statistics"),
        (name = "settings", description = "Company settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

//! Gatehouse Server - Visitor Management System
//!
//! REST API server for front-desk visitor registration, visit tracking
//! and badge tag management.

use axum::{
    routing::{delete, get, post, put},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gatehouse_server::{
    api,
    config::AppConfig,
    repository::Repository,
    services::{sweep::TracingNotifier, Services},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("gatehouse_server={},tower_http=debug", config.logging.level).into()
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Gatehouse Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await
        .expect("Failed to connect to database");

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    tracing::info!("Database migrations completed");

    // Save server address before moving config
    let server_host = config.server.host.clone();
    let server_port = config.server.port;
    let sweep_config = config.sweep.clone();

    // Create repository and services
    let repository = Repository::new(pool);
    let services = Services::new(
        repository,
        config.auth.clone(),
        Arc::new(TracingNotifier),
    );

    // Bootstrap the admin account on an empty database
    services
        .users
        .ensure_default_admin()
        .await
        .expect("Failed to create default admin account");

    // Create application state
    let state = AppState {
        config: Arc::new(config),
        services: Arc::new(services),
    };

    // Background overdue sweep
    if sweep_config.enabled {
        let sweep_state = state.clone();
        tokio::spawn(async move {
            run_sweep_scheduler(sweep_state, sweep_config).await;
        });
    } else {
        tracing::info!("Overdue sweep disabled by configuration");
    }

    // Build router
    let app = create_router(state);

    // Start server
    let addr = SocketAddr::new(
        server_host.parse().expect("Invalid host address"),
        server_port,
    );

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Periodic overdue sweep. The first tick fires immediately so visits
/// left overdue across a restart are reconciled at startup. Grace and
/// the on/off switch are re-read from company settings every pass so
/// admin changes apply without a restart.
async fn run_sweep_scheduler(state: AppState, config: gatehouse_server::config::SweepConfig) {
    let mut interval = tokio::time::interval(config.interval());

    loop {
        interval.tick().await;

        let (enabled, grace_minutes) = match state.services.settings.get().await {
            Ok(settings) => (
                settings.auto_checkout_enabled,
                i64::from(settings.auto_checkout_grace_minutes),
            ),
            Err(e) => {
                tracing::warn!(error = %e, "failed to load settings for sweep; using defaults");
                (true, config.grace_minutes)
            }
        };

        if !enabled {
            continue;
        }

        if let Err(e) = state
            .services
            .sweep
            .run(chrono::Utc::now(), grace_minutes)
            .await
        {
            tracing::error!(error = %e, "overdue sweep pass failed");
        }
    }
}

/// Create the application router with all routes
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // API v1 routes
    let api_v1 = Router::new()
        // Health check
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        // Authentication
        .route("/auth/login", post(api::auth::login))
        .route("/auth/me", get(api::auth::me))
        // Visitors
        .route("/visitors", get(api::visitors::list_visitors))
        .route("/visitors", post(api::visitors::register_visitor))
        .route("/visitors/:id", get(api::visitors::get_visitor))
        .route("/visitors/:id", delete(api::visitors::deactivate_visitor))
        .route("/visitors/:id/visits", get(api::visitors::get_visitor_visits))
        // Visits
        .route("/visits", get(api::visits::list_active_visits))
        .route("/visits", post(api::visits::open_visit))
        .route("/visits/history", get(api::visits::search_visits))
        .route("/visits/:id", get(api::visits::get_visit))
        .route("/visits/:id/checkout", post(api::visits::checkout_visit))
        .route("/visits/:id/extend", post(api::visits::extend_visit))
        .route("/visits/:id/cancel", post(api::visits::cancel_visit))
        // Tags
        .route("/tags", get(api::tags::list_tags))
        .route("/tags", post(api::tags::create_tag))
        .route("/tags/stats", get(api::tags::tag_stats))
        .route("/tags/:id", get(api::tags::get_tag))
        .route("/tags/:id", delete(api::tags::deactivate_tag))
        .route("/tags/:id/assign", post(api::tags::assign_tag))
        .route("/tags/:id/release", post(api::tags::release_tag))
        .route("/tags/:id/status", put(api::tags::update_tag_status))
        // Users
        .route("/users", get(api::users::list_users))
        .route("/users", post(api::users::create_user))
        .route("/users/:id", get(api::users::get_user))
        .route("/users/:id", put(api::users::update_user))
        // Sweep
        .route("/sweep/run", post(api::sweep::run_sweep))
        // Statistics
        .route("/stats", get(api::stats::dashboard_stats))
        // Settings
        .route("/settings", get(api::settings::get_settings))
        .route("/settings", put(api::settings::update_settings))
        .with_state(state);

    // OpenAPI documentation
    let openapi = api::openapi::create_openapi_router();

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(openapi)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

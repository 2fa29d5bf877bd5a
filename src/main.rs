//! Trip Planner Backend
//!
//! A REST backend that keeps trips, their days and places in SQLite and
//! serves the planner's drag-and-drop, batch-move and backup operations.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod planner;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::Config;
use db::{Repository, SqliteTripStore};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Trip Planner Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    if config.cors_origin.is_none() {
        tracing::warn!("No CORS origin configured (TRIP_PLANNER_CORS_ORIGIN). Any origin is allowed");
    }

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let store = Arc::new(SqliteTripStore::new(pool));
    let repo = Arc::new(Repository::new(store));

    let trips = repo.list_trips().await?;
    tracing::info!("Loaded {} trips", trips.len());

    // Create application state
    let state = AppState {
        repo,
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// CORS layer for the configured origin, or for any origin.
fn cors_layer(origin: Option<&str>) -> CorsLayer {
    let allow_origin = match origin.map(str::parse::<HeaderValue>) {
        Some(Ok(value)) => AllowOrigin::exact(value),
        Some(Err(e)) => {
            tracing::warn!("Ignoring invalid CORS origin: {}", e);
            AllowOrigin::any()
        }
        None => AllowOrigin::any(),
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(state.config.cors_origin.as_deref());

    // API routes
    let api_routes = Router::new()
        // Datastore
        .route("/datastore/revision", get(api::get_revision))
        // Trips
        .route("/trips", get(api::list_trips).post(api::create_trip))
        .route(
            "/trips/{id}",
            get(api::get_trip)
                .put(api::update_trip)
                .delete(api::delete_trip),
        )
        // Days
        .route("/trips/{id}/days", post(api::add_day))
        .route("/trips/{id}/days/reorder", post(api::reorder_days))
        .route(
            "/trips/{id}/days/{day_id}",
            put(api::update_day).delete(api::delete_day),
        )
        // Places
        .route("/trips/{id}/places", post(api::add_place))
        .route("/trips/{id}/places/move-batch", post(api::move_batch))
        .route("/trips/{id}/places/{place_id}", delete(api::delete_place))
        .route("/trips/{id}/places/{place_id}/move", post(api::move_place))
        // Planner
        .route("/trips/{id}/drag", post(api::drag_end))
        .route("/trips/{id}/markers", get(api::get_markers))
        // Backup
        .route("/export", get(api::export_backup))
        .route("/import", post(api::import_backup));

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}

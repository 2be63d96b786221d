//! HTTP API route definitions.

use std::path::Path;

use axum::{routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use super::handlers::{
    debug_snapshot, fetch_players, health, ingest_players, prometheus_metrics, AppState,
};

/// Every API route, as `(method, path, description)`. Logged at startup.
pub const ENDPOINTS: &[(&str, &str, &str)] = &[
    ("POST", "/api/players", "Receive data from the game server"),
    ("GET", "/api/players", "Serve data to the website"),
    ("GET", "/api/health", "Server health check"),
    ("GET", "/api/debug", "Debug current data"),
    ("GET", "/metrics", "Prometheus metrics"),
];

/// Create the application router.
///
/// `/` serves `index.html` from `static_dir`; any other path no API route
/// claims falls through to files under `static_dir`.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let static_dir = static_dir.as_ref();

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Snapshot relay
        .route("/api/players", get(fetch_players).post(ingest_players))
        // Diagnostics
        .route("/api/health", get(health))
        .route("/api/debug", get(debug_snapshot))
        .route("/metrics", get(prometheus_metrics))
        // Front-end
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .fallback_service(ServeDir::new(static_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

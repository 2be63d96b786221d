//! HTTP API module: player ingest/fetch, health, debug and metrics endpoints.

pub mod handlers;
pub mod routes;

pub use handlers::AppState;
pub use routes::create_router;

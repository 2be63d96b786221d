//! HTTP API handlers.

use std::fmt;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use metrics_exporter_prometheus::PrometheusHandle;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::error::{RelayError, Result};
use crate::freshness::{data_age, evaluate, FreshnessStatus};
use crate::metrics::{self, LatencyTimer};
use crate::snapshot::{normalize, Snapshot, SnapshotStore};
use crate::utils::{iso_timestamp, Clock, SystemClock};

/// Application state shared with handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single current snapshot.
    pub store: SnapshotStore,
    /// Time source for freshness checks.
    pub clock: Arc<dyn Clock>,
    /// Prometheus render handle, when a recorder is installed.
    pub prometheus: Option<PrometheusHandle>,
}

impl AppState {
    /// Create new app state with an empty store and the system clock.
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Create new app state reading time from `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            store: SnapshotStore::new(),
            clock,
            prometheus: None,
        }
    }

    /// Attach a Prometheus handle for the `/metrics` endpoint.
    pub fn with_prometheus(mut self, handle: PrometheusHandle) -> Self {
        self.prometheus = Some(handle);
        self
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("store", &self.store)
            .field("clock", &self.clock)
            .field("prometheus", &self.prometheus.is_some())
            .finish()
    }
}

/// Ingest acknowledgement.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResponse {
    /// Always `true`.
    pub success: bool,
    /// Fixed confirmation text.
    pub message: &'static str,
    /// Players in the snapshot just stored.
    pub player_count: usize,
}

/// Player list as served to the web page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchResponse<'a> {
    /// Stored game identifier, stale or not.
    pub game_id: &'a Value,
    /// Stored place identifier, stale or not.
    pub place_id: &'a Value,
    /// Stored producer timestamp, stale or not.
    pub timestamp: Option<i64>,
    /// Players; empty when stale.
    pub players: &'a [Value],
    /// Freshness label.
    pub status: FreshnessStatus,
    /// Seconds since the producer timestamp.
    pub data_age: i64,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    /// Status: "online".
    pub status: &'static str,
    /// Server time, ISO-8601 with milliseconds.
    pub timestamp: String,
    /// Players in the stored snapshot regardless of age.
    pub player_count: usize,
    /// Producer timestamp of the stored snapshot.
    pub last_update: Option<i64>,
}

/// Debug dump of the stored snapshot.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DebugResponse {
    /// Stored snapshot, unfiltered.
    pub current_data: Snapshot,
    /// Server time in seconds since epoch.
    pub server_time: i64,
    /// Seconds since the producer timestamp.
    pub data_age: i64,
}

/// `POST /api/players` - replace the stored snapshot.
///
/// The store is only touched once the payload has normalized cleanly.
pub async fn ingest_players(
    State(state): State<AppState>,
    payload: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Json<IngestResponse>> {
    let _timer = LatencyTimer::new("ingest");

    let Json(payload) = payload.map_err(|rejection| {
        warn!(error = %rejection.body_text(), "Rejected player data body");
        metrics::inc_ingest_failures();
        RelayError::InvalidBody(rejection.body_text())
    })?;

    info!(payload = %payload, "Received player data");

    let snapshot = normalize(&payload).map_err(|e| {
        error!(error = %e, "Error processing player data");
        metrics::inc_ingest_failures();
        RelayError::from(e)
    })?;

    let player_count = snapshot.player_count();
    state.store.replace(snapshot).await;
    metrics::record_ingest(player_count);

    Ok(Json(IngestResponse {
        success: true,
        message: "Player data received successfully",
        player_count,
    }))
}

/// `GET /api/players` - stored snapshot annotated with freshness.
pub async fn fetch_players(State(state): State<AppState>) -> Result<Json<Value>> {
    let _timer = LatencyTimer::new("fetch");

    let now = state.clock.unix_seconds();
    let snapshot = state.store.current().await;
    let freshness = evaluate(&snapshot, now);

    debug!(
        status = %freshness.status,
        data_age = freshness.age_seconds,
        players = freshness.players.len(),
        "Serving player data"
    );
    metrics::record_fetch(!freshness.is_active());

    let response = FetchResponse {
        game_id: &snapshot.game_id,
        place_id: &snapshot.place_id,
        timestamp: snapshot.timestamp,
        players: &freshness.players,
        status: freshness.status,
        data_age: freshness.age_seconds,
    };

    let body = serde_json::to_value(&response).map_err(|e| {
        error!(error = %e, "Error serving player data");
        RelayError::Fetch(e.to_string())
    })?;

    Ok(Json(body))
}

/// `GET /api/health` - always 200.
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.store.current().await;

    Json(HealthResponse {
        status: "online",
        timestamp: iso_timestamp(state.clock.now()),
        player_count: snapshot.player_count(),
        last_update: snapshot.timestamp,
    })
}

/// `GET /api/debug` - raw stored snapshot plus server time.
pub async fn debug_snapshot(State(state): State<AppState>) -> impl IntoResponse {
    let server_time = state.clock.unix_seconds();
    let snapshot = state.store.current().await;

    Json(DebugResponse {
        data_age: data_age(&snapshot, server_time),
        current_data: Snapshot::clone(&snapshot),
        server_time,
    })
}

/// `GET /metrics` - Prometheus text exposition, 404 without a recorder.
pub async fn prometheus_metrics(State(state): State<AppState>) -> Response {
    match &state.prometheus {
        Some(handle) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

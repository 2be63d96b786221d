//! Prometheus metrics for ingest/fetch traffic and handler latency.
//!
//! Handlers record through the `metrics` facade. Until a recorder is
//! installed (see [`install_prometheus`]) the calls are no-ops, which keeps
//! unit tests free of global state.

use std::time::Instant;

use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::debug;

// === Metric Name Constants ===

/// Snapshots accepted counter metric name.
pub const METRIC_SNAPSHOTS_INGESTED: &str = "snapshots_ingested_total";
/// Rejected ingest counter metric name.
pub const METRIC_INGEST_FAILURES: &str = "ingest_failures_total";
/// Fetches served counter metric name.
pub const METRIC_FETCHES: &str = "fetches_total";
/// Fetches answered with stale data counter metric name.
pub const METRIC_STALE_FETCHES: &str = "stale_fetches_total";
/// Players in the last accepted snapshot.
pub const METRIC_LAST_PLAYER_COUNT: &str = "last_snapshot_player_count";
/// HTTP handler latency metric name.
pub const METRIC_HTTP_REQUEST_LATENCY: &str = "http_request_latency_ms";

/// Initialize all metric descriptions.
/// Call this once at startup to register metrics with descriptions.
pub fn init_metrics() {
    describe_counter!(
        METRIC_SNAPSHOTS_INGESTED,
        "Total number of player snapshots accepted"
    );
    describe_counter!(
        METRIC_INGEST_FAILURES,
        "Total number of player snapshots rejected"
    );
    describe_counter!(METRIC_FETCHES, "Total number of player list reads");
    describe_counter!(
        METRIC_STALE_FETCHES,
        "Total number of player list reads answered as stale"
    );
    describe_gauge!(
        METRIC_LAST_PLAYER_COUNT,
        "Player count of each accepted snapshot"
    );
    describe_histogram!(
        METRIC_HTTP_REQUEST_LATENCY,
        "HTTP handler latency in milliseconds"
    );

    debug!("Metrics initialized");
}

/// Install the Prometheus recorder globally and return its render handle.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new().install_recorder()?;
    init_metrics();
    Ok(handle)
}

/// Record an accepted snapshot.
pub fn record_ingest(player_count: usize) {
    counter!(METRIC_SNAPSHOTS_INGESTED).increment(1);
    gauge!(METRIC_LAST_PLAYER_COUNT).set(player_count as f64);
}

/// Increment rejected ingest counter.
pub fn inc_ingest_failures() {
    counter!(METRIC_INGEST_FAILURES).increment(1);
}

/// Record a served fetch.
pub fn record_fetch(stale: bool) {
    counter!(METRIC_FETCHES).increment(1);
    if stale {
        counter!(METRIC_STALE_FETCHES).increment(1);
    }
}

/// Record HTTP handler latency.
pub fn record_http_latency(start: Instant, endpoint: &'static str) {
    let latency_ms = start.elapsed().as_secs_f64() * 1000.0;
    histogram!(METRIC_HTTP_REQUEST_LATENCY, "endpoint" => endpoint).record(latency_ms);
}

/// RAII guard for timing a handler.
/// Records latency under its endpoint label when dropped.
pub struct LatencyTimer {
    start: Instant,
    endpoint: &'static str,
}

impl LatencyTimer {
    /// Create a new latency timer for the given endpoint.
    pub fn new(endpoint: &'static str) -> Self {
        Self {
            start: Instant::now(),
            endpoint,
        }
    }

    /// Get elapsed time in milliseconds (without recording).
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_http_latency(self.start, self.endpoint);
    }
}

//! Integration tests for the player relay.
//!
//! These drive the full router through `tower::ServiceExt::oneshot`, with
//! a fixed clock so freshness is deterministic. No TCP listener is bound.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use player_relay::api::{create_router, AppState};
use player_relay::utils::FixedClock;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use tower::ServiceExt;

const NOW: i64 = 1_700_000_000;

/// Router plus handles onto its clock and state.
struct Harness {
    router: Router,
    clock: Arc<FixedClock>,
    state: AppState,
}

impl Harness {
    fn new() -> Self {
        let clock = Arc::new(FixedClock::new(NOW));
        let state = AppState::with_clock(clock.clone());
        let router = create_router(state.clone(), static_dir());
        Self {
            router,
            clock,
            state,
        }
    }

    async fn post(&self, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method(Method::POST)
            .uri("/api/players")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    async fn get(&self, uri: &str) -> (StatusCode, Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

fn static_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("public")
}

/// Test the example exchange: fresh ingest, immediate read.
#[tokio::test]
async fn test_ingest_then_fetch_is_active() {
    let harness = Harness::new();

    let (status, ack) = harness
        .post(json!({
            "gameId": "g1",
            "placeId": 1,
            "timestamp": NOW,
            "players": [{"name": "Bob"}],
        }))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        ack,
        json!({
            "success": true,
            "message": "Player data received successfully",
            "playerCount": 1,
        })
    );

    let (status, body) = harness.get("/api/players").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "gameId": "g1",
            "placeId": 1,
            "timestamp": NOW,
            "players": [{"name": "Bob"}],
            "status": "active",
            "dataAge": 0,
        })
    );
}

/// Test that a fresh process reports stale data and an empty health view.
#[tokio::test]
async fn test_default_store_is_stale() {
    let harness = Harness::new();

    let (_, body) = harness.get("/api/players").await;
    assert_eq!(body["players"], json!([]));
    assert_eq!(body["status"], json!("stale_data"));
    assert_eq!(body["gameId"], Value::Null);
    assert_eq!(body["timestamp"], Value::Null);
    assert_eq!(body["dataAge"], json!(NOW));

    let (status, health) = harness.get("/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["playerCount"], json!(0));
    assert_eq!(health["lastUpdate"], Value::Null);
}

/// Test the `>` boundary of the staleness window.
#[tokio::test]
async fn test_threshold_boundary() {
    let harness = Harness::new();
    harness
        .post(json!({"gameId": "g1", "timestamp": NOW, "players": [{"name": "Bob"}]}))
        .await;

    harness.clock.advance(10);
    let (_, body) = harness.get("/api/players").await;
    assert_eq!(body["status"], json!("active"));
    assert_eq!(body["dataAge"], json!(10));
    assert_eq!(body["players"], json!([{"name": "Bob"}]));

    harness.clock.advance(1);
    let (_, body) = harness.get("/api/players").await;
    assert_eq!(body["status"], json!("stale_data"));
    assert_eq!(body["dataAge"], json!(11));
    assert_eq!(body["players"], json!([]));
    // Identifiers and timestamp survive staleness.
    assert_eq!(body["gameId"], json!("g1"));
    assert_eq!(body["timestamp"], json!(NOW));
}

/// Test that a second ingest leaves no trace of the first.
#[tokio::test]
async fn test_overwrite_semantics() {
    let harness = Harness::new();
    harness
        .post(json!({"gameId": "A", "placeId": "pa", "timestamp": NOW, "players": [{"name": "a1"}, {"name": "a2"}]}))
        .await;
    harness
        .post(json!({"gameId": "B", "timestamp": NOW}))
        .await;

    let (_, body) = harness.get("/api/players").await;
    assert_eq!(
        body,
        json!({
            "gameId": "B",
            "placeId": null,
            "timestamp": NOW,
            "players": [],
            "status": "active",
            "dataAge": 0,
        })
    );
}

/// Test that an older embedded timestamp still wins if it arrives last.
#[tokio::test]
async fn test_last_writer_wins_regardless_of_timestamp() {
    let harness = Harness::new();
    harness
        .post(json!({"gameId": "newer", "timestamp": NOW, "players": [{"name": "x"}]}))
        .await;
    harness
        .post(json!({"gameId": "older", "timestamp": NOW - 60, "players": [{"name": "y"}]}))
        .await;

    let (_, body) = harness.get("/api/players").await;
    assert_eq!(body["gameId"], json!("older"));
    assert_eq!(body["status"], json!("stale_data"));
}

/// Test that repeated reads agree and data age never decreases.
#[tokio::test]
async fn test_repeated_fetch_is_stable() {
    let harness = Harness::new();
    harness
        .post(json!({"gameId": "g1", "timestamp": NOW - 2, "players": [{"name": "Bob"}]}))
        .await;

    let (_, first) = harness.get("/api/players").await;
    harness.clock.advance(1);
    let (_, second) = harness.get("/api/players").await;

    for key in ["gameId", "placeId", "timestamp", "players"] {
        assert_eq!(first[key], second[key], "{key} changed between reads");
    }
    assert!(second["dataAge"].as_i64().unwrap() >= first["dataAge"].as_i64().unwrap());
}

/// Test that a rejected ingest does not disturb the stored snapshot.
#[tokio::test]
async fn test_failed_ingest_preserves_store() {
    let harness = Harness::new();
    harness
        .post(json!({"gameId": "keep", "timestamp": NOW, "players": [{"name": "Bob"}]}))
        .await;

    let (status, body) = harness.post(json!({"gameId": "lost", "players": 42})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({"success": false, "error": "Failed to process player data"})
    );

    let (_, body) = harness.get("/api/players").await;
    assert_eq!(body["gameId"], json!("keep"));
    assert_eq!(body["players"], json!([{"name": "Bob"}]));
    assert_eq!(harness.state.store.replaced_count(), 1);
}

/// Test the health and debug views after an ingest.
#[tokio::test]
async fn test_health_and_debug_views() {
    let harness = Harness::new();
    harness
        .post(json!({"gameId": "g1", "placeId": 9, "timestamp": NOW - 30, "players": [{"name": "Bob"}, {"name": "Ann"}]}))
        .await;

    let (_, health) = harness.get("/api/health").await;
    assert_eq!(health["status"], json!("online"));
    // Health counts stored players even when stale.
    assert_eq!(health["playerCount"], json!(2));
    assert_eq!(health["lastUpdate"], json!(NOW - 30));

    let (status, debug) = harness.get("/api/debug").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        debug,
        json!({
            "currentData": {
                "gameId": "g1",
                "placeId": 9,
                "timestamp": NOW - 30,
                "players": [{"name": "Bob"}, {"name": "Ann"}],
            },
            "serverTime": NOW,
            "dataAge": 30,
        })
    );
}

/// Test that independent states do not share a snapshot.
#[tokio::test]
async fn test_independent_stores_are_isolated() {
    let first = Harness::new();
    let second = Harness::new();

    first
        .post(json!({"gameId": "only-first", "timestamp": NOW}))
        .await;

    let (_, body) = second.get("/api/players").await;
    assert_eq!(body["gameId"], Value::Null);
}

//! Player list relay service.
//!
//! A game server pushes periodic player-list snapshots; a web page reads
//! them back. The service keeps only the most recent snapshot in memory
//! and classifies it as fresh or stale when it is read.
//!
//! # Freshness
//!
//! A snapshot older than [`freshness::STALE_THRESHOLD_SECS`] is reported
//! with its identifiers intact but an empty player list:
//!
//! ```text
//! snapshot timestamp: 1700000000
//! server time:        1700000011
//! ─────────────────────────────
//! dataAge:            11 > 10  → status "stale_data", players []
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from environment
//! - [`error`]: Unified error types
//! - [`snapshot`]: Snapshot model, payload normalization and the store
//! - [`freshness`]: Staleness evaluation
//! - [`api`]: HTTP API handlers and router
//! - [`metrics`]: Prometheus counters and latency histograms
//! - [`utils`]: Clock, timestamp formatting and shutdown helpers

pub mod api;
pub mod config;
pub mod error;
pub mod freshness;
pub mod metrics;
pub mod snapshot;
pub mod utils;

pub use config::Config;
pub use error::{RelayError, Result};

//! Freshness evaluation for the stored snapshot.

use serde::Serialize;
use serde_json::Value;
use strum::Display;

use crate::snapshot::Snapshot;

/// Age in seconds beyond which a snapshot's players are suppressed.
pub const STALE_THRESHOLD_SECS: i64 = 10;

/// Freshness label reported to the consumer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum FreshnessStatus {
    /// Within the staleness window.
    #[strum(serialize = "active")]
    Active,
    /// Older than the staleness window, or never reported.
    #[strum(serialize = "stale_data")]
    StaleData,
}

/// Result of evaluating a snapshot at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct Freshness {
    /// `now - timestamp`, with a missing timestamp read as epoch 0.
    pub age_seconds: i64,
    /// Freshness label.
    pub status: FreshnessStatus,
    /// Players to show: the stored list when active, empty when stale.
    pub players: Vec<Value>,
}

impl Freshness {
    /// Whether the snapshot was within the window.
    pub fn is_active(&self) -> bool {
        self.status == FreshnessStatus::Active
    }
}

/// Seconds between the snapshot's timestamp and `now`.
pub fn data_age(snapshot: &Snapshot, now: i64) -> i64 {
    now.saturating_sub(snapshot.timestamp.unwrap_or(0))
}

/// Classify `snapshot` as seen at `now` (seconds since epoch).
pub fn evaluate(snapshot: &Snapshot, now: i64) -> Freshness {
    let age_seconds = data_age(snapshot, now);

    if age_seconds > STALE_THRESHOLD_SECS {
        Freshness {
            age_seconds,
            status: FreshnessStatus::StaleData,
            players: Vec::new(),
        }
    } else {
        Freshness {
            age_seconds,
            status: FreshnessStatus::Active,
            players: snapshot.players.clone(),
        }
    }
}

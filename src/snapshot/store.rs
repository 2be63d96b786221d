//! Single-slot snapshot store.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use super::types::Snapshot;

/// Holds the current [`Snapshot`].
///
/// Cloning the store clones the handle, not the contents. Readers get an
/// `Arc` to an immutable record, so a concurrent [`replace`](Self::replace)
/// swaps the slot without touching anything a reader already holds.
#[derive(Debug, Clone, Default)]
pub struct SnapshotStore {
    current: Arc<RwLock<Arc<Snapshot>>>,
    replaced: Arc<AtomicU64>,
}

impl SnapshotStore {
    /// Create a store holding the empty default snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(snapshot))),
            replaced: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Overwrite the stored snapshot. Last writer wins.
    pub async fn replace(&self, snapshot: Snapshot) {
        let next = Arc::new(snapshot);
        let mut slot = self.current.write().await;
        *slot = next;
        drop(slot);

        let total = self.replaced.fetch_add(1, Ordering::SeqCst) + 1;
        debug!(total, "Snapshot replaced");
    }

    /// Current snapshot as a shared immutable record.
    pub async fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&*self.current.read().await)
    }

    /// Number of replacements since the store was created.
    pub fn replaced_count(&self) -> u64 {
        self.replaced.load(Ordering::SeqCst)
    }
}

//! Snapshot model, inbound normalization, and the single-slot store.

pub mod store;
pub mod types;

pub use store::SnapshotStore;
pub use types::{normalize, Snapshot};

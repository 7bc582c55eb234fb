//! Snapshot, diff and rollback engine for tracked record fields.
//!
//! - [`comparator`]: stateless serialization and per-kind equality
//! - [`SnapshotStore`]: last-saved values per record instance and field
//! - [`HostRecord`]: what the tracker needs from the host data layer
//! - [`ChangeTracker`]: the record extension API: `save_changes`,
//!   `did_change`, `changed`, `rollback`, `clear`
//! - [`lifecycle`]: which host events trigger a snapshot or a clear
//!
//! Everything is synchronous and single-threaded. A tracker is a plain value:
//! build one, register model schemas, drive it from host lifecycle events.

pub mod comparator;
mod error;
mod host;
pub mod lifecycle;
mod snapshot;
mod tracker;

pub use comparator::CurrentValue;
pub use error::{TrackerError, TrackerResult};
pub use host::{ChangedMap, HostRecord, RollbackPayload, read_current};
pub use lifecycle::{LifecycleAction, LifecycleEvent};
pub use snapshot::{Snapshot, SnapshotSet, SnapshotStore};
pub use tracker::{ChangeTracker, DirtyState};

//! Lifecycle transition table.
//!
//! The host glue reports record lifecycle events; this table decides what the
//! tracker does in response. Nothing is registered implicitly.

use fieldtrack_model::TrackingOptions;
use serde::{Deserialize, Serialize};

/// Record lifecycle events reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleEvent {
    /// Loaded or created and ready for use.
    Ready,
    /// Saved to the backend.
    Updated,
    /// An asynchronous reload resolved.
    Reloaded,
    /// Deleted; the instance is going away.
    Deleted,
}

/// What the tracker does for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleAction {
    /// Snapshot the record's current values.
    SaveChanges,
    /// Drop the record's snapshots.
    Clear,
    Ignore,
}

/// Pure transition table.
///
/// Ready/Updated/Reloaded snapshot only when `auto_save` is on; Deleted
/// always clears.
pub const fn action_for(event: LifecycleEvent, options: &TrackingOptions) -> LifecycleAction {
    match event {
        LifecycleEvent::Deleted => LifecycleAction::Clear,
        LifecycleEvent::Ready | LifecycleEvent::Updated | LifecycleEvent::Reloaded
            if options.auto_save =>
        {
            LifecycleAction::SaveChanges
        }
        _ => LifecycleAction::Ignore,
    }
}

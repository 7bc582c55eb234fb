//! Error types for the tracker.

use fieldtrack_model::ModelError;
use thiserror::Error;

/// Result type for tracker operations.
pub type TrackerResult<T> = Result<T, TrackerError>;

/// Errors that can occur while registering models or rolling back records.
///
/// Change queries never fail; only operations that touch configuration or
/// hand data back to the host do.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The host runtime refused to merge a rollback payload.
    #[error("host rejected rollback for {record}: {reason}")]
    Host { record: String, reason: String },

    /// A JSON-encoded snapshot could not be parsed back.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Schema resolution failed.
    #[error("model error: {0}")]
    Model(#[from] ModelError),
}

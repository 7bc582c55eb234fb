//! Identifier types for live records and their relations.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::fmt;
use uuid::Uuid;

/// Identity of a live record instance.
///
/// Snapshots are keyed by this value, so two host objects that share a key
/// share tracking state. Hosts without a server identifier can mint one with
/// [`RecordKey::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub model_name: String,
    pub client_id: String,
}

impl RecordKey {
    /// Creates a key from a model name and a host-assigned client id.
    pub fn new(model_name: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            client_id: client_id.into(),
        }
    }

    /// Creates a key with a fresh time-ordered client id (UUID v7).
    #[must_use]
    pub fn generate(model_name: impl Into<String>) -> Self {
        Self::new(model_name, Uuid::now_v7().to_string())
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.model_name, self.client_id)
    }
}

/// A reference to a related record: its identifier and model (type) name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordRef {
    pub id: String,
    #[serde(rename = "type")]
    pub model_name: String,
}

impl RecordRef {
    pub fn new(id: impl Into<String>, model_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            model_name: model_name.into(),
        }
    }

    /// Serialized form used in snapshots.
    ///
    /// Polymorphic relations need the type name to decide equality, so they
    /// serialize as `{"id": .., "type": ..}`; everything else is the bare id.
    #[must_use]
    pub fn to_serialized(&self, polymorphic: bool) -> Value {
        if polymorphic {
            json!({ "id": self.id, "type": self.model_name })
        } else {
            Value::String(self.id.clone())
        }
    }
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.model_name, self.id)
    }
}

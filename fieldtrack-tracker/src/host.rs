//! The boundary to the host data-model runtime.
//!
//! The tracker never owns records. It reads current field values through
//! [`HostRecord`] and hands rollback payloads back to the host's own merge
//! primitive.

use crate::comparator::CurrentValue;
use fieldtrack_model::{FieldKind, TrackedFieldSpec};
use fieldtrack_types::{RecordKey, RecordRef};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Field name -> changed flag. Used both for the host's native attribute
/// diff (a hint) and for the result of `ChangeTracker::changed`.
pub type ChangedMap = BTreeMap<String, bool>;

/// A live record in the host runtime.
pub trait HostRecord {
    /// Identity of this instance; snapshots are keyed by it.
    fn key(&self) -> RecordKey;

    /// Server identifier, if the record has one.
    fn id(&self) -> Option<String>;

    /// Current value of a scalar attribute. Null when unset.
    fn attribute(&self, name: &str) -> Value;

    /// Record currently associated through a to-one relation.
    fn belongs_to(&self, name: &str) -> Option<RecordRef>;

    /// Records currently associated through a to-many relation, in host
    /// order. `None` when the relation is not loaded.
    fn has_many(&self, name: &str) -> Option<Vec<RecordRef>>;

    /// The host's native, best-effort attribute diff. Usually covers scalar
    /// attributes only.
    fn changed_attributes(&self) -> ChangedMap {
        ChangedMap::new()
    }

    /// Native rollback of plain attributes. Runs before the tracker computes
    /// its own rollback payload.
    fn rollback_attributes(&mut self) {}

    /// Empties a to-many relation.
    fn clear_has_many(&mut self, name: &str);

    /// Merges `{id, field: value, ...}` into the live record.
    /// Return `Err(message)` to reject the payload.
    fn push_payload(&mut self, payload: &RollbackPayload) -> Result<(), String>;
}

/// Reads the live value of a tracked field according to its kind.
pub fn read_current<R: HostRecord + ?Sized>(record: &R, spec: &TrackedFieldSpec) -> CurrentValue {
    match spec.kind {
        FieldKind::Scalar { .. } => CurrentValue::Attribute(record.attribute(&spec.name)),
        FieldKind::BelongsTo { .. } => CurrentValue::BelongsTo(record.belongs_to(&spec.name)),
        FieldKind::HasMany { .. } => CurrentValue::HasMany(record.has_many(&spec.name)),
    }
}

/// What a rollback asks the host to merge back into a record.
///
/// Serializes flat: `{"id": "1", "title": "old", "tags": ["1", "2"]}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RollbackPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, Value>,
}

impl RollbackPayload {
    pub fn new(id: Option<String>) -> Self {
        Self {
            id,
            fields: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

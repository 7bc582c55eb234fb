//! Snapshot store: per record instance, per tracked field, the last-saved
//! serialized value.
//!
//! A missing entry means "never saved"; a stored null means "saved as empty".
//! Entries for an instance live until [`SnapshotStore::clear`] is called for
//! it, normally when the host destroys the record.

use fieldtrack_types::RecordKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// The saved value of one tracked field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub value: Value,
}

impl Snapshot {
    pub fn new(value: Value) -> Self {
        Self { value }
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

/// Snapshots of one record instance, keyed by field name.
pub type SnapshotSet = BTreeMap<String, Snapshot>;

/// Keyed snapshot state for every tracked record instance.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    records: HashMap<RecordKey, SnapshotSet>,
}

impl SnapshotStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a snapshot for one field, overwriting any previous one.
    pub fn save(&mut self, key: &RecordKey, field: &str, value: Value) {
        self.records
            .entry(key.clone())
            .or_default()
            .insert(field.to_string(), Snapshot::new(value));
    }

    /// Stores several field snapshots at once. Fields not listed keep their
    /// previous snapshot.
    pub fn save_all<I>(&mut self, key: &RecordKey, values: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let set = self.records.entry(key.clone()).or_default();
        for (field, value) in values {
            set.insert(field, Snapshot::new(value));
        }
    }

    /// Replaces the whole snapshot set of an instance.
    pub fn replace<I>(&mut self, key: &RecordKey, values: I)
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let set = values
            .into_iter()
            .map(|(field, value)| (field, Snapshot::new(value)))
            .collect();
        self.records.insert(key.clone(), set);
    }

    pub fn get(&self, key: &RecordKey, field: &str) -> Option<&Snapshot> {
        self.records.get(key).and_then(|set| set.get(field))
    }

    /// The saved value of a field, or `None` if it was never saved.
    pub fn last_value(&self, key: &RecordKey, field: &str) -> Option<&Value> {
        self.get(key, field).map(Snapshot::value)
    }

    /// All snapshots of one instance.
    pub fn snapshots(&self, key: &RecordKey) -> Option<&SnapshotSet> {
        self.records.get(key)
    }

    pub fn contains(&self, key: &RecordKey) -> bool {
        self.records.contains_key(key)
    }

    /// Drops every snapshot of an instance. Returns whether anything was held.
    pub fn clear(&mut self, key: &RecordKey) -> bool {
        self.records.remove(key).is_some()
    }

    /// Number of instances with snapshot state.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

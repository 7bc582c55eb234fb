//! Shared test helpers: an in-memory host record and a sample schema.

#![allow(dead_code)]

use fieldtrack_model::{ModelSchema, TrackerConfig};
use fieldtrack_tracker::{ChangeTracker, ChangedMap, HostRecord, RollbackPayload};
use fieldtrack_types::{RecordKey, RecordRef};
use serde_json::Value;
use std::collections::BTreeMap;

/// A host record held entirely in memory.
///
/// `pristine` plays the host's own "last persisted attributes"; when
/// `native_diff` is on, `changed_attributes` reports plain attribute changes
/// against it, like a host with scalar-only dirty tracking.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    pub key: RecordKey,
    pub id: Option<String>,
    pub attributes: BTreeMap<String, Value>,
    pub belongs_to: BTreeMap<String, Option<RecordRef>>,
    pub has_many: BTreeMap<String, Option<Vec<RecordRef>>>,
    /// Relation name -> target model name, for resolving bare ids on push.
    pub targets: BTreeMap<String, String>,
    pub pristine: BTreeMap<String, Value>,
    pub native_diff: bool,
    pub pushed: Vec<RollbackPayload>,
    pub cleared: Vec<String>,
    pub reject_push: Option<String>,
}

impl MemoryRecord {
    pub fn new(model_name: &str, id: &str) -> Self {
        Self {
            key: RecordKey::new(model_name, id),
            id: Some(id.to_string()),
            attributes: BTreeMap::new(),
            belongs_to: BTreeMap::new(),
            has_many: BTreeMap::new(),
            targets: BTreeMap::new(),
            pristine: BTreeMap::new(),
            native_diff: false,
            pushed: Vec::new(),
            cleared: Vec::new(),
            reject_push: None,
        }
    }

    pub fn with_attr(mut self, name: &str, value: Value) -> Self {
        self.set_attr(name, value);
        self
    }

    pub fn with_belongs_to(mut self, name: &str, target: &str, related: Option<RecordRef>) -> Self {
        self.targets.insert(name.to_string(), target.to_string());
        self.belongs_to.insert(name.to_string(), related);
        self
    }

    pub fn with_has_many(mut self, name: &str, target: &str, ids: &[&str]) -> Self {
        self.targets.insert(name.to_string(), target.to_string());
        self.set_has_many(name, ids);
        self
    }

    pub fn set_attr(&mut self, name: &str, value: Value) {
        self.attributes.insert(name.to_string(), value);
    }

    pub fn set_belongs_to(&mut self, name: &str, related: Option<RecordRef>) {
        self.belongs_to.insert(name.to_string(), related);
    }

    /// Replaces a has-many relation with records of the relation's target type.
    pub fn set_has_many(&mut self, name: &str, ids: &[&str]) {
        let target = self.target(name);
        let refs = ids.iter().map(|id| RecordRef::new(*id, target.as_str())).collect();
        self.has_many.insert(name.to_string(), Some(refs));
    }

    pub fn set_has_many_refs(&mut self, name: &str, refs: Vec<RecordRef>) {
        self.has_many.insert(name.to_string(), Some(refs));
    }

    /// The host "persisted" its attributes: native diff is clean again.
    pub fn commit(&mut self) {
        self.pristine = self.attributes.clone();
    }

    pub fn has_many_ids(&self, name: &str) -> Vec<String> {
        self.has_many
            .get(name)
            .cloned()
            .flatten()
            .unwrap_or_default()
            .into_iter()
            .map(|r| r.id)
            .collect()
    }

    fn target(&self, name: &str) -> String {
        self.targets.get(name).cloned().unwrap_or_else(|| name.to_string())
    }

    fn to_ref(&self, name: &str, value: &Value) -> Option<RecordRef> {
        match value {
            Value::String(id) => Some(RecordRef::new(id.as_str(), self.target(name))),
            Value::Object(_) => serde_json::from_value(value.clone()).ok(),
            _ => None,
        }
    }
}

impl HostRecord for MemoryRecord {
    fn key(&self) -> RecordKey {
        self.key.clone()
    }

    fn id(&self) -> Option<String> {
        self.id.clone()
    }

    fn attribute(&self, name: &str) -> Value {
        self.attributes.get(name).cloned().unwrap_or(Value::Null)
    }

    fn belongs_to(&self, name: &str) -> Option<RecordRef> {
        self.belongs_to.get(name).cloned().flatten()
    }

    fn has_many(&self, name: &str) -> Option<Vec<RecordRef>> {
        self.has_many.get(name).cloned().flatten()
    }

    fn changed_attributes(&self) -> ChangedMap {
        if !self.native_diff {
            return ChangedMap::new();
        }
        self.attributes
            .iter()
            .filter(|(name, value)| !value.is_object() && self.pristine.get(*name) != Some(*value))
            .map(|(name, _)| (name.clone(), true))
            .collect()
    }

    fn rollback_attributes(&mut self) {
        if self.native_diff {
            for (name, value) in &self.pristine {
                if !value.is_object() {
                    self.attributes.insert(name.clone(), value.clone());
                }
            }
        }
    }

    fn clear_has_many(&mut self, name: &str) {
        self.cleared.push(name.to_string());
        self.has_many.insert(name.to_string(), Some(Vec::new()));
    }

    fn push_payload(&mut self, payload: &RollbackPayload) -> Result<(), String> {
        if let Some(reason) = &self.reject_push {
            return Err(reason.clone());
        }
        for (name, value) in &payload.fields {
            if self.has_many.contains_key(name) {
                let refs = match value {
                    Value::Array(items) => {
                        Some(items.iter().filter_map(|v| self.to_ref(name, v)).collect())
                    }
                    _ => None,
                };
                self.has_many.insert(name.clone(), refs);
            } else if self.belongs_to.contains_key(name) {
                let related = self.to_ref(name, value);
                self.belongs_to.insert(name.clone(), related);
            } else {
                self.attributes.insert(name.clone(), value.clone());
            }
        }
        self.pushed.push(payload.clone());
        Ok(())
    }
}

/// A post with every field kind.
pub fn post_schema() -> ModelSchema {
    ModelSchema::new("post")
        .attr("title")
        .attr("views")
        .typed_attr("settings", "object")
        .belongs_to("author")
        .polymorphic_belongs_to("owner")
        .has_many("tags")
        .polymorphic_has_many("attachments")
}

/// A post instance populated with initial values for every field.
pub fn sample_post(id: &str) -> MemoryRecord {
    MemoryRecord::new("post", id)
        .with_attr("title", Value::String("Hello".into()))
        .with_attr("views", Value::from(10))
        .with_attr("settings", serde_json::json!({"theme": "dark", "width": 80}))
        .with_belongs_to("author", "user", Some(RecordRef::new("1", "user")))
        .with_belongs_to("owner", "owner", Some(RecordRef::new("5", "Author")))
        .with_has_many("tags", "tag", &["1", "2", "3"])
        .with_has_many("attachments", "attachment", &[])
}

pub fn tracker_with(config: TrackerConfig) -> ChangeTracker {
    let mut tracker = ChangeTracker::new(config);
    tracker.register(&post_schema()).unwrap();
    tracker
}

pub fn tracker() -> ChangeTracker {
    tracker_with(TrackerConfig::default())
}

//! The record extension API.
//!
//! [`ChangeTracker`] is the explicit context object: it owns the tracker
//! configuration, the resolved [`TrackerMeta`] of every registered record
//! type, and the [`SnapshotStore`]. Host glue calls into it; it never calls
//! back except through [`HostRecord`].

use crate::comparator;
use crate::host::{self, ChangedMap, HostRecord, RollbackPayload};
use crate::lifecycle::{self, LifecycleAction, LifecycleEvent};
use crate::snapshot::SnapshotStore;
use crate::{TrackerError, TrackerResult};
use fieldtrack_model::{ModelSchema, TrackedFieldSpec, TrackerConfig, TrackerMeta};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

/// Dirtiness summary, available for models with `enable_is_dirty`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirtyState {
    /// At least one field (native or tracked) changed.
    pub is_dirty: bool,
    /// At least one tracked belongs-to/has-many field changed.
    pub has_dirty_relations: bool,
}

/// Snapshot/diff/rollback engine for host records.
#[derive(Debug, Default)]
pub struct ChangeTracker {
    config: TrackerConfig,
    models: HashMap<String, TrackerMeta>,
    store: SnapshotStore,
}

impl ChangeTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self {
            config,
            models: HashMap::new(),
            store: SnapshotStore::new(),
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn store(&self) -> &SnapshotStore {
        &self.store
    }

    // ── Registration ─────────────────────────────────────────────

    /// Resolves a host schema against the configuration and caches the result.
    ///
    /// Re-registering a type replaces its meta. Existing snapshots are kept
    /// until the next `save_changes`, which drops fields no longer tracked.
    pub fn register(&mut self, schema: &ModelSchema) -> TrackerResult<&TrackerMeta> {
        let meta = schema.resolve(&self.config)?;
        Ok(self.register_meta(meta))
    }

    /// Installs already-resolved meta for a type.
    pub fn register_meta(&mut self, meta: TrackerMeta) -> &TrackerMeta {
        debug!(model = %meta.model_name, fields = meta.fields.len(), "Registered tracked model");
        let name = meta.model_name.clone();
        self.models.insert(name.clone(), meta);
        &self.models[&name]
    }

    /// Tracked-field configuration for a record's type.
    pub fn meta_info<R: HostRecord + ?Sized>(&self, record: &R) -> Option<&TrackerMeta> {
        self.meta_for(&record.key().model_name)
    }

    pub fn meta_for(&self, model_name: &str) -> Option<&TrackerMeta> {
        self.models.get(model_name)
    }

    // ── Snapshots ────────────────────────────────────────────────

    /// Snapshots every tracked field of the record, replacing the record's
    /// previous snapshot set. Records of unregistered types are ignored.
    pub fn save_changes<R: HostRecord + ?Sized>(&mut self, record: &R) {
        let key = record.key();
        let Some(meta) = self.models.get(&key.model_name) else {
            debug!(record = %key, "save_changes on unregistered model, ignoring");
            return;
        };

        let values: Vec<(String, Value)> = meta
            .iter()
            .map(|spec| (spec.name.clone(), current_serialized(record, spec)))
            .collect();
        debug!(record = %key, fields = values.len(), "Saved tracker snapshot");
        self.store.replace(&key, values);
    }

    /// Alias for [`save_changes`](Self::save_changes).
    pub fn start_track<R: HostRecord + ?Sized>(&mut self, record: &R) {
        self.save_changes(record);
    }

    /// The last saved value of a field, or `None` if it was never saved.
    pub fn last_value<R: HostRecord + ?Sized>(&self, record: &R, field: &str) -> Option<&Value> {
        self.store.last_value(&record.key(), field)
    }

    /// Alias for [`last_value`](Self::last_value).
    pub fn saved_tracker_value<R: HostRecord + ?Sized>(
        &self,
        record: &R,
        field: &str,
    ) -> Option<&Value> {
        self.last_value(record, field)
    }

    /// Drops all snapshots of the record. Call when the host destroys it.
    pub fn clear<R: HostRecord + ?Sized>(&mut self, record: &R) -> bool {
        let key = record.key();
        let cleared = self.store.clear(&key);
        if cleared {
            debug!(record = %key, "Cleared tracker snapshot");
        }
        cleared
    }

    pub fn is_tracking<R: HostRecord + ?Sized>(&self, record: &R) -> bool {
        self.store.contains(&record.key())
    }

    // ── Change queries ───────────────────────────────────────────

    /// Did a field change since the last snapshot?
    ///
    /// `hint` is an externally computed diff (normally the host's native
    /// attribute diff); `None` asks the record for it. A `true` entry
    /// short-circuits; a `false` entry is not trusted and the comparator still
    /// runs. `meta` overrides the registered meta for the record's type.
    /// Untracked fields are never reported as changed unless the hint says so.
    pub fn did_change<R: HostRecord + ?Sized>(
        &self,
        record: &R,
        field: &str,
        hint: Option<&ChangedMap>,
        meta: Option<&TrackerMeta>,
    ) -> bool {
        let hinted = match hint {
            Some(hint) => hint.get(field).copied().unwrap_or(false),
            None => record
                .changed_attributes()
                .get(field)
                .copied()
                .unwrap_or(false),
        };
        if hinted {
            return true;
        }

        let key = record.key();
        let Some(spec) = meta
            .or_else(|| self.models.get(&key.model_name))
            .and_then(|m| m.field(field))
        else {
            return false;
        };

        let current = current_serialized(record, spec);
        let saved = self.store.last_value(&key, field).unwrap_or(&Value::Null);
        let changed = comparator::field_changed(&current, saved, &spec.kind);
        trace!(record = %key, field, changed, "Compared tracked field");
        changed
    }

    /// Every changed field, mapped to `true`.
    ///
    /// Starts from the host's native attribute diff and adds every tracked
    /// field the native diff did not already flag, so relationship changes
    /// are never missed.
    pub fn changed<R: HostRecord + ?Sized>(&self, record: &R) -> ChangedMap {
        let mut changed: ChangedMap = record
            .changed_attributes()
            .into_iter()
            .filter(|(_, flag)| *flag)
            .collect();

        let Some(meta) = self.meta_info(record) else {
            return changed;
        };
        for spec in meta.iter() {
            if changed.contains_key(&spec.name) {
                continue;
            }
            if self.did_change(record, &spec.name, Some(&changed), Some(meta)) {
                changed.insert(spec.name.clone(), true);
            }
        }
        changed
    }

    /// Dirtiness summary; `None` unless the model enables it.
    pub fn dirty_state<R: HostRecord + ?Sized>(&self, record: &R) -> Option<DirtyState> {
        let meta = self.meta_info(record)?;
        if !meta.options.enable_is_dirty {
            return None;
        }
        let changed = self.changed(record);
        let has_dirty_relations = meta
            .iter()
            .filter(|spec| spec.kind.is_relationship())
            .any(|spec| changed.get(&spec.name).copied().unwrap_or(false));
        Some(DirtyState {
            is_dirty: !changed.is_empty(),
            has_dirty_relations,
        })
    }

    // ── Rollback ─────────────────────────────────────────────────

    /// Rolls the record back to its last snapshot.
    ///
    /// The host's native attribute rollback runs first. Every tracked field
    /// that still differs is then collected into a payload; changed has-many
    /// relations are emptied on the live record before the payload is pushed
    /// so the host merge does not keep stale members. Fields never saved roll
    /// back to null. Returns the payload that was pushed (nothing is pushed
    /// when it is empty).
    ///
    /// A snapshot that cannot be decoded fails the rollback before the live
    /// record is modified. A payload rejected by the host fails it after the
    /// changed has-many relations were emptied; those stay empty.
    pub fn rollback<R: HostRecord + ?Sized>(&self, record: &mut R) -> TrackerResult<RollbackPayload> {
        let key = record.key();
        record.rollback_attributes();

        let mut payload = RollbackPayload::new(record.id());
        let Some(meta) = self.models.get(&key.model_name) else {
            return Ok(payload);
        };

        let dirty: Vec<&TrackedFieldSpec> = meta
            .iter()
            .filter(|spec| self.did_change(&*record, &spec.name, None, Some(meta)))
            .collect();

        for spec in &dirty {
            let saved = self.store.last_value(&key, &spec.name).unwrap_or(&Value::Null);
            let value = comparator::deserialize(saved, &spec.kind)?;
            payload.fields.insert(spec.name.clone(), value);
        }

        // The live record is untouched until the whole payload is built.
        for spec in dirty.iter().filter(|spec| spec.kind.is_has_many()) {
            record.clear_has_many(&spec.name);
        }

        if payload.is_empty() {
            return Ok(payload);
        }

        debug!(record = %key, fields = payload.fields.len(), "Pushing rollback payload");
        record.push_payload(&payload).map_err(|reason| {
            warn!(record = %key, %reason, "Host rejected rollback payload");
            TrackerError::Host {
                record: key.to_string(),
                reason,
            }
        })?;
        Ok(payload)
    }

    // ── Lifecycle ────────────────────────────────────────────────

    /// Applies the lifecycle table for a host event and returns the action
    /// taken.
    pub fn on_lifecycle<R: HostRecord + ?Sized>(
        &mut self,
        record: &R,
        event: LifecycleEvent,
    ) -> LifecycleAction {
        let action = match (self.meta_info(record), event) {
            (Some(meta), _) => lifecycle::action_for(event, &meta.options),
            (None, LifecycleEvent::Deleted) => LifecycleAction::Clear,
            (None, _) => LifecycleAction::Ignore,
        };
        match action {
            LifecycleAction::SaveChanges => self.save_changes(record),
            LifecycleAction::Clear => {
                self.clear(record);
            }
            LifecycleAction::Ignore => {}
        }
        action
    }
}

fn current_serialized<R: HostRecord + ?Sized>(record: &R, spec: &TrackedFieldSpec) -> Value {
    comparator::serialize(&host::read_current(record, spec), &spec.kind)
}

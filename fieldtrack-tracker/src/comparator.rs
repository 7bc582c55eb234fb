//! Field comparator: stateless serialization and equality for one field.
//!
//! Saved values are `serde_json::Value`s in the field's serialized form:
//!
//! | Kind                    | Serialized form                          |
//! |-------------------------|------------------------------------------|
//! | scalar, plain           | the value itself                         |
//! | scalar, json            | canonical JSON text, or null when empty  |
//! | belongs-to              | `"id"` or null                           |
//! | belongs-to, polymorphic | `{"id": .., "type": ..}` or null         |
//! | has-many                | `["id", ..]` or null                     |
//! | has-many, polymorphic   | `[{"id": .., "type": ..}, ..]` or null   |
//!
//! Null, `""`, `[]` and `{}` are all "empty" and compare equal to each other.
//! Comparing a polymorphic form against a non-polymorphic one is a
//! configuration mismatch; the result is unspecified and not guarded.

use fieldtrack_model::{AttributeEncoding, FieldKind};
use fieldtrack_types::RecordRef;
use serde_json::Value;
use std::slice;

/// A live field value read from the host, shaped by the field's kind.
#[derive(Debug, Clone, PartialEq)]
pub enum CurrentValue {
    Attribute(Value),
    BelongsTo(Option<RecordRef>),
    /// `None` when the relation is not loaded.
    HasMany(Option<Vec<RecordRef>>),
}

/// Serializes a live value into its comparable/storable form.
pub fn serialize(current: &CurrentValue, kind: &FieldKind) -> Value {
    let polymorphic = kind.is_polymorphic();
    match current {
        CurrentValue::Attribute(value) => match kind {
            FieldKind::Scalar {
                encoding: AttributeEncoding::Json,
            } => encode_json(value),
            _ => value.clone(),
        },
        CurrentValue::BelongsTo(related) => related
            .as_ref()
            .map(|r| r.to_serialized(polymorphic))
            .unwrap_or(Value::Null),
        CurrentValue::HasMany(related) => related
            .as_ref()
            .map(|list| Value::Array(list.iter().map(|r| r.to_serialized(polymorphic)).collect()))
            .unwrap_or(Value::Null),
    }
}

/// Turns a saved value back into the shape the host expects on rollback.
///
/// Only JSON-encoded attributes differ from their stored form.
pub fn deserialize(saved: &Value, kind: &FieldKind) -> serde_json::Result<Value> {
    match (kind, saved) {
        (
            FieldKind::Scalar {
                encoding: AttributeEncoding::Json,
            },
            Value::String(text),
        ) => serde_json::from_str(text),
        _ => Ok(saved.clone()),
    }
}

fn encode_json(value: &Value) -> Value {
    if is_empty(value) {
        Value::Null
    } else {
        // serde_json's default map is sorted, so the text is canonical.
        Value::String(value.to_string())
    }
}

/// True for null, `""`, `[]` and `{}`.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

/// Dispatches to [`has_many_changed`] or [`values_changed`] by kind.
pub fn field_changed(current: &Value, saved: &Value, kind: &FieldKind) -> bool {
    if kind.is_has_many() {
        has_many_changed(current, saved, kind.is_polymorphic())
    } else {
        values_changed(current, saved, kind.is_polymorphic())
    }
}

/// Scalar / belongs-to comparison.
pub fn values_changed(current: &Value, saved: &Value, polymorphic: bool) -> bool {
    match (is_empty(current), is_empty(saved)) {
        (true, true) => false,
        (true, false) | (false, true) => true,
        (false, false) if polymorphic => reference_changed(current, saved),
        (false, false) => current != saved,
    }
}

/// Order-insensitive has-many comparison.
///
/// Both lists are sorted by identifier (then type name for polymorphic
/// entries) before a pairwise compare, so reordering never counts as a change.
pub fn has_many_changed(current: &Value, saved: &Value, polymorphic: bool) -> bool {
    if is_empty(current) && is_empty(saved) {
        return false;
    }

    let current = as_list(current);
    let saved = as_list(saved);
    if current.len() != saved.len() {
        return true;
    }

    let current = sorted(current, polymorphic);
    let saved = sorted(saved, polymorphic);
    for (one, other) in current.iter().zip(&saved) {
        let mismatch = if polymorphic {
            reference_changed(one, other)
        } else {
            one != other
        };
        if mismatch {
            return true;
        }
    }
    false
}

/// Polymorphic references differ when either the id or the type differs.
fn reference_changed(one: &Value, other: &Value) -> bool {
    one.get("id") != other.get("id") || one.get("type") != other.get("type")
}

fn as_list(value: &Value) -> &[Value] {
    match value {
        Value::Null => &[],
        Value::Array(items) => items,
        single => slice::from_ref(single),
    }
}

fn sorted(items: &[Value], polymorphic: bool) -> Vec<&Value> {
    let mut refs: Vec<&Value> = items.iter().collect();
    refs.sort_by_cached_key(|v| sort_key(v, polymorphic));
    refs
}

fn sort_key(value: &Value, polymorphic: bool) -> (String, String) {
    if polymorphic {
        (key_text(value.get("id")), key_text(value.get("type")))
    } else {
        (key_text(Some(value)), String::new())
    }
}

fn key_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

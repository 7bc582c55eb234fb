use crate::{
    AttributeEncoding, FieldKind, ModelError, ModelResult, ModelSchema, RelationshipKind,
    TrackedFieldSpec, TrackerConfig, TrackingOptions,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// The resolved tracking configuration of one record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerMeta {
    pub model_name: String,
    pub options: TrackingOptions,
    pub fields: BTreeMap<String, TrackedFieldSpec>,
}

impl TrackerMeta {
    /// Builds meta directly from field specs, bypassing schema resolution.
    pub fn new(
        model_name: impl Into<String>,
        options: TrackingOptions,
        fields: impl IntoIterator<Item = TrackedFieldSpec>,
    ) -> Self {
        Self {
            model_name: model_name.into(),
            options,
            fields: fields.into_iter().map(|f| (f.name.clone(), f)).collect(),
        }
    }

    pub fn field(&self, name: &str) -> Option<&TrackedFieldSpec> {
        self.fields.get(name)
    }

    pub fn is_tracked(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Iterates tracked fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = &TrackedFieldSpec> {
        self.fields.values()
    }
}

impl ModelSchema {
    /// Resolves which fields of this type are tracked, and with which kind.
    ///
    /// Starts from every declared attribute and relationship, then applies the
    /// model's `only`, `except` and `track_has_many` options. A has-many field
    /// named explicitly in `only` is tracked even when `track_has_many` is off.
    pub fn resolve(&self, config: &TrackerConfig) -> ModelResult<TrackerMeta> {
        let options = config.tracking_options(&self.model_name);
        let overrides = config.model_options(&self.model_name);
        let only: &[String] = overrides.map(|o| o.only.as_slice()).unwrap_or(&[]);
        let except: &[String] = overrides.map(|o| o.except.as_slice()).unwrap_or(&[]);

        for name in only.iter().chain(except) {
            if !self.declares(name) {
                return Err(ModelError::UnknownField {
                    model: self.model_name.clone(),
                    field: name.clone(),
                });
            }
        }

        let declared = self
            .attributes
            .iter()
            .map(|a| {
                let encoding = AttributeEncoding::for_attr_type(a.attr_type.as_deref());
                TrackedFieldSpec::new(a.name.as_str(), FieldKind::Scalar { encoding })
            })
            .chain(self.relationships.iter().map(|r| {
                let kind = match r.kind {
                    RelationshipKind::BelongsTo => FieldKind::BelongsTo {
                        polymorphic: r.polymorphic,
                    },
                    RelationshipKind::HasMany => FieldKind::HasMany {
                        polymorphic: r.polymorphic,
                    },
                };
                TrackedFieldSpec::new(r.name.as_str(), kind)
            }));

        let mut seen = BTreeSet::new();
        let mut fields = BTreeMap::new();
        for spec in declared {
            if !seen.insert(spec.name.clone()) {
                return Err(ModelError::DuplicateField {
                    model: self.model_name.clone(),
                    field: spec.name,
                });
            }
            let named = only.contains(&spec.name);
            if !only.is_empty() && !named {
                continue;
            }
            if except.contains(&spec.name) {
                continue;
            }
            if spec.kind.is_has_many() && !options.track_has_many && !named {
                continue;
            }
            fields.insert(spec.name.clone(), spec);
        }

        debug!(model = %self.model_name, tracked = fields.len(), "Resolved tracker meta");
        Ok(TrackerMeta {
            model_name: self.model_name.clone(),
            options,
            fields,
        })
    }
}

use serde::{Deserialize, Serialize};

/// Host-declared metadata of one record type.
///
/// This is the tracker's view of the host runtime's attribute/relationship
/// reflection. Which of these fields are actually tracked is decided by
/// [`ModelSchema::resolve`](crate::ModelSchema::resolve).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    pub model_name: String,
    #[serde(default)]
    pub attributes: Vec<AttributeDef>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDef>,
}

impl ModelSchema {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            attributes: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Adds an untyped attribute.
    #[must_use]
    pub fn attr(mut self, name: &str) -> Self {
        self.attributes.push(AttributeDef {
            name: name.into(),
            attr_type: None,
        });
        self
    }

    /// Adds an attribute with a host type name (`string`, `object`, ...).
    #[must_use]
    pub fn typed_attr(mut self, name: &str, attr_type: &str) -> Self {
        self.attributes.push(AttributeDef {
            name: name.into(),
            attr_type: Some(attr_type.into()),
        });
        self
    }

    #[must_use]
    pub fn belongs_to(self, name: &str) -> Self {
        self.relationship(name, RelationshipKind::BelongsTo, false)
    }

    #[must_use]
    pub fn polymorphic_belongs_to(self, name: &str) -> Self {
        self.relationship(name, RelationshipKind::BelongsTo, true)
    }

    #[must_use]
    pub fn has_many(self, name: &str) -> Self {
        self.relationship(name, RelationshipKind::HasMany, false)
    }

    #[must_use]
    pub fn polymorphic_has_many(self, name: &str) -> Self {
        self.relationship(name, RelationshipKind::HasMany, true)
    }

    fn relationship(mut self, name: &str, kind: RelationshipKind, polymorphic: bool) -> Self {
        self.relationships.push(RelationshipDef {
            name: name.into(),
            kind,
            polymorphic,
        });
        self
    }

    /// Returns true if the schema declares an attribute or relationship
    /// with this name.
    pub fn declares(&self, name: &str) -> bool {
        self.attributes.iter().any(|a| a.name == name)
            || self.relationships.iter().any(|r| r.name == name)
    }
}

/// A scalar attribute declared by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDef {
    pub name: String,
    /// Host transform/type name. Drives [`AttributeEncoding`](crate::AttributeEncoding).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(alias = "type")]
    pub attr_type: Option<String>,
}

/// A relationship declared by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDef {
    pub name: String,
    pub kind: RelationshipKind,
    #[serde(default)]
    pub polymorphic: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationshipKind {
    BelongsTo,
    HasMany,
}

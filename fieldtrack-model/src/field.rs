use serde::{Deserialize, Serialize};

/// How a scalar attribute is stored in its snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeEncoding {
    /// Stored and compared as-is.
    #[default]
    Plain,
    /// Stored as canonical JSON text, so a nested object mutated in place
    /// still compares as changed. Parsed back on rollback.
    Json,
}

impl AttributeEncoding {
    /// Picks the encoding for a host attribute type name.
    ///
    /// `object` and `json` attributes hold structured values; everything else
    /// (string, number, boolean, date, untyped) is compared directly.
    pub fn for_attr_type(attr_type: Option<&str>) -> Self {
        match attr_type {
            Some("object") | Some("json") => Self::Json,
            _ => Self::Plain,
        }
    }
}

/// The kind of a tracked field.
///
/// Resolved once when a model is registered; comparisons dispatch on this tag
/// instead of re-inspecting host metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Scalar {
        #[serde(default)]
        encoding: AttributeEncoding,
    },
    BelongsTo {
        #[serde(default)]
        polymorphic: bool,
    },
    HasMany {
        #[serde(default)]
        polymorphic: bool,
    },
}

impl FieldKind {
    /// Scalar attribute compared as-is.
    pub const fn scalar() -> Self {
        Self::Scalar {
            encoding: AttributeEncoding::Plain,
        }
    }

    /// Whether related records are identified by id *and* type name.
    /// Always false for scalars.
    pub const fn is_polymorphic(&self) -> bool {
        match self {
            Self::Scalar { .. } => false,
            Self::BelongsTo { polymorphic } | Self::HasMany { polymorphic } => *polymorphic,
        }
    }

    pub const fn is_has_many(&self) -> bool {
        matches!(self, Self::HasMany { .. })
    }

    /// True for belongs-to and has-many fields.
    pub const fn is_relationship(&self) -> bool {
        !matches!(self, Self::Scalar { .. })
    }
}

/// One tracked field of one record type. Immutable once resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedFieldSpec {
    pub name: String,
    #[serde(flatten)]
    pub kind: FieldKind,
}

impl TrackedFieldSpec {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for a plain scalar attribute.
    pub fn scalar(name: &str) -> Self {
        Self::new(name, FieldKind::scalar())
    }

    /// Shorthand for a JSON-encoded object attribute.
    pub fn object(name: &str) -> Self {
        Self::new(
            name,
            FieldKind::Scalar {
                encoding: AttributeEncoding::Json,
            },
        )
    }

    /// Shorthand for a to-one relation.
    pub fn belongs_to(name: &str, polymorphic: bool) -> Self {
        Self::new(name, FieldKind::BelongsTo { polymorphic })
    }

    /// Shorthand for a to-many relation.
    pub fn has_many(name: &str, polymorphic: bool) -> Self {
        Self::new(name, FieldKind::HasMany { polymorphic })
    }
}

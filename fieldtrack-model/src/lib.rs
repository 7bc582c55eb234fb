//! Tracked-field metadata for fieldtrack.
//!
//! Defines what the tracker knows about a record type before it ever sees an
//! instance:
//! - [`FieldKind`]: scalar / belongs-to / has-many, resolved once per field
//! - [`ModelSchema`]: the attributes and relationships a host type declares
//! - [`TrackerConfig`]: global defaults plus per-model `only`/`except` options
//! - [`TrackerMeta`]: a schema resolved against the config; the per-type
//!   answer to "which fields are tracked, and how"
//!
//! Nothing here holds per-instance state. Snapshots live in `fieldtrack-tracker`.

mod config;
mod error;
mod field;
mod meta;
mod schema;

pub use config::{ModelOptions, TrackerConfig, TrackerDefaults, TrackingOptions};
pub use error::{ModelError, ModelResult};
pub use field::{AttributeEncoding, FieldKind, TrackedFieldSpec};
pub use meta::TrackerMeta;
pub use schema::{AttributeDef, ModelSchema, RelationshipDef, RelationshipKind};

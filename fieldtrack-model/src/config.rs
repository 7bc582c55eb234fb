//! Tracker configuration: global defaults plus per-model overrides.
//!
//! Loaded from TOML:
//!
//! ```toml
//! [defaults]
//! track_has_many = true
//! auto_save = false
//! enable_is_dirty = false
//!
//! [models.post]
//! only = ["title", "tags"]
//! auto_save = true
//! ```

use crate::ModelResult;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

/// Options applied to every model unless overridden.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerDefaults {
    #[serde(default = "default_track_has_many")]
    pub track_has_many: bool,
    #[serde(default)]
    pub auto_save: bool,
    #[serde(default)]
    pub enable_is_dirty: bool,
}

fn default_track_has_many() -> bool {
    true
}

impl Default for TrackerDefaults {
    fn default() -> Self {
        Self {
            track_has_many: default_track_has_many(),
            auto_save: false,
            enable_is_dirty: false,
        }
    }
}

/// Per-model overrides. Unset flags fall back to [`TrackerDefaults`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelOptions {
    /// When non-empty, only these fields are tracked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub only: Vec<String>,
    /// Fields never tracked.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub track_has_many: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_save: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enable_is_dirty: Option<bool>,
}

/// Flags in effect for one model after merging defaults and overrides.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackingOptions {
    pub track_has_many: bool,
    pub auto_save: bool,
    pub enable_is_dirty: bool,
}

/// Complete tracker configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    #[serde(default)]
    pub defaults: TrackerDefaults,
    #[serde(default)]
    pub models: BTreeMap<String, ModelOptions>,
}

impl TrackerConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(contents: &str) -> ModelResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Loads configuration from a TOML file.
    ///
    /// Never fails: a missing, unreadable or malformed file falls back to the
    /// default configuration with a log line explaining why.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            info!("No tracker config found at {:?}, using defaults", path);
            return Self::default();
        }

        match std::fs::read_to_string(path) {
            Ok(contents) => match Self::from_toml_str(&contents) {
                Ok(config) => {
                    info!(models = config.models.len(), "Loaded tracker config from {:?}", path);
                    config
                }
                Err(e) => {
                    warn!("Failed to parse tracker config {:?}: {}. Using defaults.", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                warn!("Failed to read tracker config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Builder-style override for one model.
    #[must_use]
    pub fn with_model(mut self, model_name: &str, options: ModelOptions) -> Self {
        self.models.insert(model_name.to_string(), options);
        self
    }

    /// Overrides configured for a model, if any.
    pub fn model_options(&self, model_name: &str) -> Option<&ModelOptions> {
        self.models.get(model_name)
    }

    /// Effective flags for a model.
    pub fn tracking_options(&self, model_name: &str) -> TrackingOptions {
        let defaults = self.defaults;
        match self.model_options(model_name) {
            None => TrackingOptions {
                track_has_many: defaults.track_has_many,
                auto_save: defaults.auto_save,
                enable_is_dirty: defaults.enable_is_dirty,
            },
            Some(o) => TrackingOptions {
                track_has_many: o.track_has_many.unwrap_or(defaults.track_has_many),
                auto_save: o.auto_save.unwrap_or(defaults.auto_save),
                enable_is_dirty: o.enable_is_dirty.unwrap_or(defaults.enable_is_dirty),
            },
        }
    }
}

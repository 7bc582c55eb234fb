//! Error types for model metadata and configuration.

use thiserror::Error;

/// Result type for model metadata operations.
pub type ModelResult<T> = Result<T, ModelError>;

/// Errors raised while loading configuration or resolving a schema.
#[derive(Debug, Error)]
pub enum ModelError {
    /// The TOML configuration could not be parsed.
    #[error("config parse error: {0}")]
    Config(#[from] toml::de::Error),

    /// `only`/`except` named a field the model does not declare.
    #[error("unknown field `{field}` in tracker options for model `{model}`")]
    UnknownField { model: String, field: String },

    /// The schema declares the same field name twice.
    #[error("duplicate field `{field}` in schema for model `{model}`")]
    DuplicateField { model: String, field: String },
}

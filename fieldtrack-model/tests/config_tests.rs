use fieldtrack_model::{ModelOptions, TrackerConfig, TrackerDefaults, TrackingOptions};
use pretty_assertions::assert_eq;
use std::io::Write;

// ── Defaults ─────────────────────────────────────────────────────

#[test]
fn defaults_track_has_many_without_auto_save() {
    let d = TrackerDefaults::default();
    assert!(d.track_has_many);
    assert!(!d.auto_save);
    assert!(!d.enable_is_dirty);
}

#[test]
fn tracking_options_fall_back_to_defaults() {
    let config = TrackerConfig::default();
    assert_eq!(
        config.tracking_options("post"),
        TrackingOptions {
            track_has_many: true,
            auto_save: false,
            enable_is_dirty: false,
        }
    );
}

#[test]
fn model_overrides_win_field_by_field() {
    let config = TrackerConfig {
        defaults: TrackerDefaults {
            auto_save: true,
            ..Default::default()
        },
        ..Default::default()
    }
    .with_model(
        "post",
        ModelOptions {
            enable_is_dirty: Some(true),
            ..Default::default()
        },
    );

    let opts = config.tracking_options("post");
    assert!(opts.auto_save);
    assert!(opts.enable_is_dirty);
    assert!(opts.track_has_many);
}

// ── TOML ─────────────────────────────────────────────────────────

const SAMPLE: &str = r#"
[defaults]
track_has_many = false
auto_save = true

[models.post]
only = ["title", "tags"]
auto_save = false
enable_is_dirty = true
"#;

#[test]
fn parses_toml() {
    let config = TrackerConfig::from_toml_str(SAMPLE).unwrap();
    assert!(!config.defaults.track_has_many);
    assert!(config.defaults.auto_save);
    assert!(!config.defaults.enable_is_dirty);

    let post = config.model_options("post").unwrap();
    assert_eq!(post.only, vec!["title".to_string(), "tags".to_string()]);
    assert_eq!(post.auto_save, Some(false));
    assert_eq!(post.track_has_many, None);
}

#[test]
fn empty_toml_is_default() {
    let config = TrackerConfig::from_toml_str("").unwrap();
    assert_eq!(config, TrackerConfig::default());
}

#[test]
fn malformed_toml_is_an_error() {
    let err = TrackerConfig::from_toml_str("[defaults\nauto_save = ").unwrap_err();
    assert!(err.to_string().starts_with("config parse error"));
}

#[test]
fn wrong_type_is_an_error() {
    assert!(TrackerConfig::from_toml_str("[defaults]\nauto_save = \"yes\"").is_err());
}

// ── load_from ────────────────────────────────────────────────────

#[test]
fn load_from_missing_file_uses_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = TrackerConfig::load_from(&dir.path().join("tracker.toml"));
    assert_eq!(config, TrackerConfig::default());
}

#[test]
fn load_from_reads_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SAMPLE.as_bytes()).unwrap();
    let config = TrackerConfig::load_from(file.path());
    assert!(config.model_options("post").is_some());
    assert!(config.defaults.auto_save);
}

#[test]
fn load_from_malformed_file_uses_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(b"not = [valid").unwrap();
    let config = TrackerConfig::load_from(file.path());
    assert_eq!(config, TrackerConfig::default());
}

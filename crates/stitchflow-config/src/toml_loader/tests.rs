//! Tests for TOML config loading, creation, and path resolution.

use super::*;
use crate::schema::LogLevel;
use std::path::Path;

#[test]
fn load_from_nonexistent_returns_parse_error() {
    let result = load_from_path(Path::new("/tmp/nonexistent_stitchflow_config.toml"));
    let err = result.unwrap_err();
    assert!(matches!(err, stitchflow_common::ConfigError::ParseError(_)));
}

#[test]
fn load_valid_partial_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r##"
[presence]
heartbeat_interval_ms = 1000
default_color = "#ff0000"

[logging]
level = "debug"
"##,
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.presence.heartbeat_interval_ms, 1000);
    assert_eq!(config.presence.default_color, "#ff0000");
    assert_eq!(config.logging.level, LogLevel::Debug);
    // Defaults preserved
    assert_eq!(config.presence.sweep_interval_ms, 5000);
    assert_eq!(config.presence.channel, "stitchflow_collab");
    assert!(!config.relay.auto_connect);
}

#[test]
fn load_invalid_toml_returns_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "this is not valid toml {{{").unwrap();

    let err = load_from_path(&path).unwrap_err();
    assert!(matches!(err, stitchflow_common::ConfigError::ParseError(_)));
}

#[test]
fn unusable_timings_are_replaced_on_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[presence]\nheartbeat_interval_ms = 0\nstale_after_ms = 10\n",
    )
    .unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.presence.heartbeat_interval_ms, 3000);
    assert_eq!(config.presence.stale_after_ms, 10_000);
    assert!(crate::validation::validate(&config).is_ok());
}

#[test]
fn other_invalid_values_are_left_for_validation() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[presence]\ndefault_color = \"indigo\"\n").unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.presence.default_color, "indigo");
    assert!(crate::validation::validate(&config).is_err());
}

#[test]
fn create_and_load_default_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stitchflow").join("config.toml");

    create_default_config(&path).unwrap();
    assert!(path.exists());

    let config = load_from_path(&path).unwrap();
    assert!(config.presence.enabled);
    assert_eq!(config.presence.stale_after_ms, 10_000);
    assert_eq!(config.relay.url, "ws://127.0.0.1:19850");
}

#[test]
fn default_template_is_valid_toml() {
    let content = template::default_config_toml();
    let parsed: Result<crate::schema::StitchflowConfig, _> = toml::from_str(&content);
    assert!(parsed.is_ok());
}

#[test]
fn template_carries_schema_version() {
    let content = template::default_config_toml();
    let header = format!("# Schema version {}", crate::schema::CONFIG_SCHEMA_VERSION);
    assert!(content.lines().any(|line| line == header));
}

#[test]
fn create_default_config_keeps_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[logging]\nlevel = \"warn\"\n").unwrap();

    create_default_config(&path).unwrap();

    let config = load_from_path(&path).unwrap();
    assert_eq!(config.logging.level, LogLevel::Warn);
}

#[test]
fn env_override_wins_over_config_dir() {
    let path = paths::resolve_config_path(
        Some("/etc/stitchflow.toml".into()),
        Some("/home/ada/.config".into()),
    )
    .unwrap();
    assert_eq!(path, Path::new("/etc/stitchflow.toml"));
}

#[test]
fn config_dir_used_without_override() {
    let path =
        paths::resolve_config_path(Some("".into()), Some("/home/ada/.config".into())).unwrap();
    assert_eq!(path, Path::new("/home/ada/.config/stitchflow/config.toml"));
}

#[test]
fn no_config_dir_and_no_override_is_an_error() {
    let err = paths::resolve_config_path(None, None).unwrap_err();
    assert!(err.to_string().contains(CONFIG_PATH_ENV));
}

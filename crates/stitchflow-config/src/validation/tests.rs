//! Tests for the full validation pipeline.

use super::*;
use crate::schema::*;

#[test]
fn default_config_validates() {
    let config = StitchflowConfig::default();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_heartbeat_too_small() {
    let mut config = StitchflowConfig::default();
    config.presence.heartbeat_interval_ms = 10;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("presence.heartbeat_interval_ms"));
}

#[test]
fn catches_sweep_too_large() {
    let mut config = StitchflowConfig::default();
    config.presence.sweep_interval_ms = 120_000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("presence.sweep_interval_ms"));
}

#[test]
fn catches_stale_threshold_not_above_heartbeat() {
    let mut config = StitchflowConfig::default();
    config.presence.stale_after_ms = 3000;
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("presence.stale_after_ms"));
}

#[test]
fn catches_blank_channel() {
    let mut config = StitchflowConfig::default();
    config.presence.channel = "   ".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("presence.channel"));
}

#[test]
fn accepts_short_and_alpha_hex_colors() {
    let mut config = StitchflowConfig::default();
    config.presence.default_color = "#abc".into();
    assert!(validate(&config).is_ok());
    config.presence.default_color = "#6366f1cc".into();
    assert!(validate(&config).is_ok());
}

#[test]
fn catches_non_hex_color() {
    let mut config = StitchflowConfig::default();
    config.presence.default_color = "indigo".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("presence.default_color"));
}

#[test]
fn catches_non_websocket_relay_url() {
    let mut config = StitchflowConfig::default();
    config.relay.url = "http://127.0.0.1:19850".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("relay.url"));
}

#[test]
fn collects_multiple_errors() {
    let mut config = StitchflowConfig::default();
    config.presence.channel = String::new();
    config.relay.url = "localhost".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("presence.channel"));
    assert!(err.contains("relay.url"));
    assert!(err.contains("; "));
}

#[test]
fn catches_remote_relay_host() {
    let mut config = StitchflowConfig::default();
    config.relay.url = "ws://192.168.1.20:19850".into();
    let err = validate(&config).unwrap_err().to_string();
    assert!(err.contains("relay.allow_remote"));

    config.relay.allow_remote = true;
    assert!(validate(&config).is_ok());
}

#[test]
fn accepts_localhost_relay() {
    let mut config = StitchflowConfig::default();
    config.relay.url = "ws://localhost:19850/".into();
    assert!(validate(&config).is_ok());
}

//! Translation from config and CLI arguments into coordinator inputs.

use std::time::Duration;

use stitchflow_collab::{PresenceSettings, UserIdentity};
use stitchflow_common::{ConfigError, StitchflowError};
use stitchflow_config::{PresenceConfig, RelayConfig, StitchflowConfig};

use crate::cli::Args;

/// Settle on the config to run with. A file named with `--config` must
/// load; the platform default falls back to built-in defaults with a
/// warning.
pub fn resolve_config(
    explicit: bool,
    loaded: Result<StitchflowConfig, ConfigError>,
) -> stitchflow_common::Result<StitchflowConfig> {
    match loaded {
        Ok(config) => Ok(config),
        Err(e) if explicit => Err(StitchflowError::Config(e)),
        Err(e) => {
            tracing::warn!("Config load failed, using defaults: {e}");
            Ok(StitchflowConfig::default())
        }
    }
}

pub fn presence_settings(config: &PresenceConfig) -> PresenceSettings {
    PresenceSettings {
        channel: config.channel.clone(),
        heartbeat_interval: Duration::from_millis(u64::from(config.heartbeat_interval_ms)),
        sweep_interval: Duration::from_millis(u64::from(config.sweep_interval_ms)),
        stale_after: Duration::from_millis(u64::from(config.stale_after_ms)),
        default_color: config.default_color.clone(),
    }
}

/// Relay URL to connect to, if any. `--relay` wins over the config file;
/// the configured URL is only used when `auto_connect` is set.
pub fn relay_url(flag: Option<&str>, config: &RelayConfig) -> Option<String> {
    match flag {
        Some(url) if !url.trim().is_empty() => Some(url.trim().to_string()),
        _ if config.auto_connect => Some(config.url.clone()),
        _ => None,
    }
}

pub fn identity(args: &Args) -> UserIdentity {
    let identity = match args.user_id.as_deref() {
        Some(id) if !id.is_empty() => UserIdentity::new(id, args.name.clone()),
        _ => UserIdentity::generate(args.name.clone()),
    };
    match args.color.as_deref() {
        Some(color) => identity.with_color(color),
        None => identity,
    }
}

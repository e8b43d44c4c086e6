//! Reading `config.toml` into a [`StitchflowConfig`].

use std::path::Path;

use stitchflow_common::ConfigError;
use tracing::{info, warn};

use crate::schema::StitchflowConfig;

use super::paths::{create_default_config, default_config_path};

/// Parse the config at `path`.
///
/// Presence timings that would stop the coordinator from running are
/// replaced with defaults, and each replacement is logged with the field
/// that caused it. Everything else is returned as written; strict checking
/// is [`crate::validation::validate`]'s job.
pub fn load_from_path(path: &Path) -> Result<StitchflowConfig, ConfigError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::ParseError(format!("cannot read {}: {e}", path.display())))?;

    let mut config: StitchflowConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("{}: {e}", path.display())))?;

    for repaired in config.presence.repair_timings() {
        warn!(path = %path.display(), "{repaired}");
    }

    info!(
        path = %path.display(),
        heartbeat_ms = config.presence.heartbeat_interval_ms,
        stale_after_ms = config.presence.stale_after_ms,
        "Loaded config"
    );
    Ok(config)
}

/// Load the config from [`default_config_path`], seeding the commented
/// template on first run.
pub fn load_default() -> Result<StitchflowConfig, ConfigError> {
    let path = default_config_path()?;
    if !path.exists() {
        create_default_config(&path)?;
    }
    load_from_path(&path)
}

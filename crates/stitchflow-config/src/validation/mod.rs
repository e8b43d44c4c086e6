//! Full configuration validation.
//!
//! Each section has its own submodule; this orchestrator calls them all
//! and collects errors into a single `ConfigError`.

mod helpers;
mod presence;
mod relay;

#[cfg(test)]
mod tests;

use crate::schema::StitchflowConfig;
use stitchflow_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &StitchflowConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    presence::validate_presence(&mut errors, config);
    relay::validate_relay(&mut errors, config);

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

//! Configuration schema types for StitchFlow.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod logging;
mod presence;
mod relay;

pub use logging::*;
pub use presence::*;
pub use relay::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration for StitchFlow.
///
/// Only override what you want to change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StitchflowConfig {
    pub presence: PresenceConfig,
    pub relay: RelayConfig,
    pub logging: LoggingConfig,
}

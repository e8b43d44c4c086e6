//! Default TOML config template with inline documentation comments.

use crate::schema::CONFIG_SCHEMA_VERSION;

/// The commented config written on first run. Every setting is commented
/// out, so the file parses to the defaults.
pub(crate) fn default_config_toml() -> String {
    let body = r##"# Only override what you want to change -- missing fields use defaults.

[presence]
# enabled = true
# channel = "stitchflow_collab"   # shared by every project view
# heartbeat_interval_ms = 3000    # 100-60000
# sweep_interval_ms = 5000        # 100-60000
# stale_after_ms = 10000          # must exceed heartbeat_interval_ms
# default_color = "#6366f1"

[relay]
# url = "ws://127.0.0.1:19850"
# auto_connect = false
# allow_remote = false            # presence is meant to stay on this machine

[logging]
# level = "info"                  # trace, debug, info, warn, error
"##;
    format!("# StitchFlow Configuration\n# Schema version {CONFIG_SCHEMA_VERSION}\n{body}")
}

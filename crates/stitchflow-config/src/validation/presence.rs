use crate::schema::{StitchflowConfig, INTERVAL_RANGE_MS};

use super::helpers::{validate_hex_color, validate_range};

/// Validate presence timings, channel name and fallback color.
pub(crate) fn validate_presence(errors: &mut Vec<String>, config: &StitchflowConfig) {
    let presence = &config.presence;

    validate_range(
        errors,
        "presence.heartbeat_interval_ms",
        presence.heartbeat_interval_ms,
        *INTERVAL_RANGE_MS.start(),
        *INTERVAL_RANGE_MS.end(),
    );
    validate_range(
        errors,
        "presence.sweep_interval_ms",
        presence.sweep_interval_ms,
        *INTERVAL_RANGE_MS.start(),
        *INTERVAL_RANGE_MS.end(),
    );

    // A peer must get at least one heartbeat in before it can go stale.
    if presence.stale_after_ms <= presence.heartbeat_interval_ms {
        errors.push(format!(
            "presence.stale_after_ms = {} must exceed presence.heartbeat_interval_ms = {}",
            presence.stale_after_ms, presence.heartbeat_interval_ms
        ));
    }

    if presence.channel.trim().is_empty() {
        errors.push("presence.channel must not be empty".to_string());
    }

    validate_hex_color(errors, "presence.default_color", &presence.default_color);
}

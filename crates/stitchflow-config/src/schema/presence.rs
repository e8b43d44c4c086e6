//! Presence and collaboration configuration types.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

/// Accepted heartbeat and sweep periods, in milliseconds.
pub const INTERVAL_RANGE_MS: RangeInclusive<u32> = 100..=60_000;

pub const DEFAULT_HEARTBEAT_MS: u32 = 3_000;
pub const DEFAULT_SWEEP_MS: u32 = 5_000;
pub const DEFAULT_STALE_AFTER_MS: u32 = 10_000;

/// Cross-instance presence configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PresenceConfig {
    pub enabled: bool,
    /// Application-wide broadcast topic shared by every project view.
    pub channel: String,
    pub heartbeat_interval_ms: u32,
    pub sweep_interval_ms: u32,
    /// Silence after which a peer is considered gone.
    pub stale_after_ms: u32,
    /// Color used when the user profile carries none.
    pub default_color: String,
}

impl Default for PresenceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            channel: "stitchflow_collab".into(),
            heartbeat_interval_ms: DEFAULT_HEARTBEAT_MS,
            sweep_interval_ms: DEFAULT_SWEEP_MS,
            stale_after_ms: DEFAULT_STALE_AFTER_MS,
            default_color: "#6366f1".into(),
        }
    }
}

impl PresenceConfig {
    /// Replace timings the coordinator cannot run with.
    ///
    /// Out-of-range periods fall back to their defaults; a staleness
    /// threshold that does not exceed the heartbeat becomes the larger of the
    /// default and three heartbeats. Returns one message per replaced field.
    pub fn repair_timings(&mut self) -> Vec<String> {
        let mut repaired = Vec::new();

        if !INTERVAL_RANGE_MS.contains(&self.heartbeat_interval_ms) {
            repaired.push(format!(
                "presence.heartbeat_interval_ms = {} is outside {}..={}, using {DEFAULT_HEARTBEAT_MS}",
                self.heartbeat_interval_ms,
                INTERVAL_RANGE_MS.start(),
                INTERVAL_RANGE_MS.end()
            ));
            self.heartbeat_interval_ms = DEFAULT_HEARTBEAT_MS;
        }
        if !INTERVAL_RANGE_MS.contains(&self.sweep_interval_ms) {
            repaired.push(format!(
                "presence.sweep_interval_ms = {} is outside {}..={}, using {DEFAULT_SWEEP_MS}",
                self.sweep_interval_ms,
                INTERVAL_RANGE_MS.start(),
                INTERVAL_RANGE_MS.end()
            ));
            self.sweep_interval_ms = DEFAULT_SWEEP_MS;
        }
        if self.stale_after_ms <= self.heartbeat_interval_ms {
            let stale = DEFAULT_STALE_AFTER_MS.max(self.heartbeat_interval_ms.saturating_mul(3));
            repaired.push(format!(
                "presence.stale_after_ms = {} does not exceed heartbeat_interval_ms = {}, using {stale}",
                self.stale_after_ms, self.heartbeat_interval_ms
            ));
            self.stale_after_ms = stale;
        }

        repaired
    }
}

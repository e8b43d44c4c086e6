//! Settings and event types for the presence coordinator.

use std::collections::HashMap;
use std::time::Duration;

use stitchflow_common::CollabError;

use crate::identity::DEFAULT_USER_COLOR;
use crate::protocol::PresenceRecord;

/// Application-wide topic shared by every project view.
pub const DEFAULT_CHANNEL: &str = "stitchflow_collab";

/// Peers keyed by user id.
pub type PeerMap = HashMap<String, PresenceRecord>;

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Timing and channel settings for a coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresenceSettings {
    /// Topic on the shared transport.
    pub channel: String,
    /// How often presence is re-broadcast without a state change.
    pub heartbeat_interval: Duration,
    /// How often stale peers are evicted.
    pub sweep_interval: Duration,
    /// Silence after which a peer is evicted at the next sweep.
    pub stale_after: Duration,
    /// Color for users whose profile carries none.
    pub default_color: String,
}

impl Default for PresenceSettings {
    fn default() -> Self {
        Self {
            channel: DEFAULT_CHANNEL.to_string(),
            heartbeat_interval: Duration::from_secs(3),
            sweep_interval: Duration::from_secs(5),
            stale_after: Duration::from_secs(10),
            default_color: DEFAULT_USER_COLOR.to_string(),
        }
    }
}

impl PresenceSettings {
    /// Reject timings the coordinator cannot run with: zero periods, and a
    /// staleness threshold a healthy peer would cross between heartbeats.
    pub fn validate(&self) -> Result<(), CollabError> {
        let mut problems = Vec::new();
        if self.heartbeat_interval.is_zero() {
            problems.push("heartbeat_interval must be non-zero".to_string());
        }
        if self.sweep_interval.is_zero() {
            problems.push("sweep_interval must be non-zero".to_string());
        }
        if self.stale_after <= self.heartbeat_interval {
            problems.push(format!(
                "stale_after ({:?}) must exceed heartbeat_interval ({:?})",
                self.stale_after, self.heartbeat_interval
            ));
        }
        if self.channel.is_empty() {
            problems.push("channel must not be empty".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(CollabError::InvalidSettings(problems.join("; ")))
        }
    }
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// Registry changes, for consumers that react to transitions rather than
/// re-reading the snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresenceEvent {
    PeerJoined(PresenceRecord),
    PeerUpdated(PresenceRecord),
    PeerLeft { user_id: String, user_name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(PresenceSettings::default().validate().is_ok());
    }

    #[test]
    fn zero_periods_are_rejected() {
        let settings = PresenceSettings {
            heartbeat_interval: Duration::ZERO,
            sweep_interval: Duration::ZERO,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err().to_string();
        assert!(err.contains("heartbeat_interval must be non-zero"));
        assert!(err.contains("sweep_interval must be non-zero"));
    }

    #[test]
    fn stale_threshold_must_exceed_heartbeat() {
        let settings = PresenceSettings {
            stale_after: Duration::from_secs(3),
            ..Default::default()
        };
        assert!(matches!(
            settings.validate(),
            Err(CollabError::InvalidSettings(msg)) if msg.contains("stale_after")
        ));
    }

    #[test]
    fn empty_channel_is_rejected() {
        let settings = PresenceSettings {
            channel: String::new(),
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }
}

//! Wire types carried on the shared presence channel.
//!
//! Field names are camelCase so the envelope matches what browser tabs of the
//! dashboard post on the same channel:
//!
//! ```json
//! { "type": "PRESENCE", "projectId": "p1",
//!   "presence": { "userId": "u1", "userName": "Ada", "userColor": "#6366f1",
//!                 "activeSection": "notes", "lastSeen": 1718000000000 } }
//! ```

use serde::{Deserialize, Deserializer, Serialize};
use stitchflow_common::{CollabError, ProjectId};

/// Value of the `type` tag for presence messages.
pub const PRESENCE_TYPE: &str = "PRESENCE";

// ---------------------------------------------------------------------------
// Presence record
// ---------------------------------------------------------------------------

/// One participant's liveness and focus, as last broadcast by that participant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresenceRecord {
    pub user_id: String,
    pub user_name: String,
    pub user_color: String,
    /// Section the user has focus in. Empty strings decode as `None`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub active_section: Option<String>,
    /// Sender's clock at broadcast time, milliseconds since the Unix epoch.
    pub last_seen: u64,
}

impl PresenceRecord {
    /// Whether more than `stale_after_ms` has passed since `last_seen`.
    ///
    /// Timestamps ahead of `now_ms` are never stale.
    pub fn is_stale(&self, now_ms: u64, stale_after_ms: u64) -> bool {
        now_ms.saturating_sub(self.last_seen) > stale_after_ms
    }

    pub fn is_in_section(&self, section: &str) -> bool {
        self.active_section.as_deref() == Some(section)
    }
}

fn empty_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()))
}

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Messages exchanged on the shared channel. Only presence is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BusMessage {
    #[serde(rename = "PRESENCE", rename_all = "camelCase")]
    Presence {
        project_id: ProjectId,
        presence: PresenceRecord,
    },
}

impl BusMessage {
    pub fn presence(project_id: ProjectId, presence: PresenceRecord) -> Self {
        BusMessage::Presence {
            project_id,
            presence,
        }
    }

    /// Decode a raw channel message. Anything that is not a well-formed
    /// presence envelope yields `None`.
    pub fn decode(raw: serde_json::Value) -> Option<Self> {
        serde_json::from_value(raw).ok()
    }

    pub fn encode(&self) -> Result<serde_json::Value, CollabError> {
        serde_json::to_value(self).map_err(|e| CollabError::Encode(e.to_string()))
    }

    pub fn project_id(&self) -> &ProjectId {
        match self {
            BusMessage::Presence { project_id, .. } => project_id,
        }
    }
}

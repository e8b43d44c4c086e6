use serde::{Deserialize, Serialize};
use stitchflow_common::new_id;
use tracing::warn;

use crate::protocol::PresenceRecord;

/// Id used when the host supplies none. Distinct anonymous users share it
/// and therefore collide in each other's registries.
pub const DEFAULT_USER_ID: &str = "default";

/// Color used when the host supplies none.
pub const DEFAULT_USER_COLOR: &str = "#6366f1";

/// User descriptor supplied by the hosting application.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    pub id: Option<String>,
    pub name: String,
    pub color: Option<String>,
}

impl UserIdentity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            name: name.into(),
            color: None,
        }
    }

    /// Create an identity with a fresh random id.
    pub fn generate(name: impl Into<String>) -> Self {
        Self::new(new_id(), name)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    /// Apply the id and color fallbacks.
    pub fn resolve(&self, default_color: &str) -> ResolvedIdentity {
        let user_id = match self.id.as_deref() {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => {
                warn!(
                    name = %self.name,
                    "No user id supplied; falling back to {DEFAULT_USER_ID:?}, which collides with other anonymous users"
                );
                DEFAULT_USER_ID.to_string()
            }
        };
        let user_color = match self.color.as_deref() {
            Some(color) if !color.is_empty() => color.to_string(),
            _ => default_color.to_string(),
        };
        ResolvedIdentity {
            user_id,
            user_name: self.name.clone(),
            user_color,
        }
    }
}

/// Identity with fallbacks applied, as it appears on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: String,
    pub user_name: String,
    pub user_color: String,
}

impl ResolvedIdentity {
    /// Build this user's presence record as of `now_ms`.
    pub fn presence(&self, active_section: Option<String>, now_ms: u64) -> PresenceRecord {
        PresenceRecord {
            user_id: self.user_id.clone(),
            user_name: self.user_name.clone(),
            user_color: self.user_color.clone(),
            active_section,
            last_seen: now_ms,
        }
    }
}

//! Per-project registry of remote peers.

use std::time::Duration;

use stitchflow_common::ProjectId;

use crate::protocol::{BusMessage, PresenceRecord};

use super::types::PeerMap;

/// Outcome of applying one received message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Applied {
    /// First message from this peer.
    Joined(PresenceRecord),
    /// Peer's record was replaced.
    Updated(PresenceRecord),
    /// Message was for another project.
    ForeignProject,
    /// Message carried the local user's own id.
    SelfEcho,
}

/// Latest known presence of every other user on one project.
///
/// Records are replaced wholesale in arrival order; the local user is never
/// stored.
#[derive(Debug, Clone)]
pub struct PeerRegistry {
    local_user_id: String,
    peers: PeerMap,
}

impl PeerRegistry {
    pub fn new(local_user_id: impl Into<String>) -> Self {
        Self {
            local_user_id: local_user_id.into(),
            peers: PeerMap::new(),
        }
    }

    pub fn local_user_id(&self) -> &str {
        &self.local_user_id
    }

    /// Apply a message received on the shared channel.
    pub fn apply(&mut self, project_id: &ProjectId, message: BusMessage) -> Applied {
        let BusMessage::Presence {
            project_id: msg_project,
            presence,
        } = message;

        if msg_project != *project_id {
            return Applied::ForeignProject;
        }
        if presence.user_id == self.local_user_id {
            return Applied::SelfEcho;
        }

        match self
            .peers
            .insert(presence.user_id.clone(), presence.clone())
        {
            Some(_) => Applied::Updated(presence),
            None => Applied::Joined(presence),
        }
    }

    /// Evict peers silent for longer than `stale_after` as of `now_ms`, plus
    /// any entry for the local user. Returns the evicted records.
    pub fn sweep(&mut self, now_ms: u64, stale_after: Duration) -> Vec<PresenceRecord> {
        let threshold = stale_after.as_millis() as u64;
        let expired: Vec<String> = self
            .peers
            .iter()
            .filter(|(id, record)| {
                **id == self.local_user_id || record.is_stale(now_ms, threshold)
            })
            .map(|(id, _)| id.clone())
            .collect();

        expired
            .iter()
            .filter_map(|id| self.peers.remove(id))
            .collect()
    }

    pub fn get(&self, user_id: &str) -> Option<&PresenceRecord> {
        self.peers.get(user_id)
    }

    pub fn len(&self) -> usize {
        self.peers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PresenceRecord> {
        self.peers.values()
    }

    pub fn snapshot(&self) -> PeerMap {
        self.peers.clone()
    }

    /// Peers focused on `section`, ordered by user id.
    pub fn in_section(&self, section: &str) -> Vec<PresenceRecord> {
        peers_in_section(&self.peers, section)
    }
}

pub(crate) fn peers_in_section(peers: &PeerMap, section: &str) -> Vec<PresenceRecord> {
    let mut found: Vec<PresenceRecord> = peers
        .values()
        .filter(|record| record.is_in_section(section))
        .cloned()
        .collect();
    found.sort_by(|a, b| a.user_id.cmp(&b.user_id));
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: u64 = 1_718_000_000_000;

    fn record(user_id: &str, section: Option<&str>, last_seen: u64) -> PresenceRecord {
        PresenceRecord {
            user_id: user_id.into(),
            user_name: format!("User {user_id}"),
            user_color: "#6366f1".into(),
            active_section: section.map(str::to_string),
            last_seen,
        }
    }

    fn msg(project: &str, record: PresenceRecord) -> BusMessage {
        BusMessage::presence(project.into(), record)
    }

    #[test]
    fn first_message_joins_then_updates() {
        let mut reg = PeerRegistry::new("me");
        let p1 = ProjectId::from("p1");

        let first = reg.apply(&p1, msg("p1", record("u2", None, NOW)));
        assert!(matches!(first, Applied::Joined(ref r) if r.user_id == "u2"));

        let second = reg.apply(&p1, msg("p1", record("u2", Some("notes"), NOW + 3_000)));
        assert!(matches!(second, Applied::Updated(_)));
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get("u2").unwrap().last_seen, NOW + 3_000);
    }

    #[test]
    fn own_records_are_never_stored() {
        let mut reg = PeerRegistry::new("me");
        let p1 = ProjectId::from("p1");

        assert_eq!(
            reg.apply(&p1, msg("p1", record("me", Some("notes"), NOW))),
            Applied::SelfEcho
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn other_projects_are_ignored() {
        let mut reg = PeerRegistry::new("me");
        let a = ProjectId::from("A");

        assert_eq!(
            reg.apply(&a, msg("B", record("u2", None, NOW))),
            Applied::ForeignProject
        );
        assert!(reg.is_empty());
    }

    #[test]
    fn records_are_replaced_not_merged() {
        let mut reg = PeerRegistry::new("me");
        let p1 = ProjectId::from("p1");

        reg.apply(&p1, msg("p1", record("u2", Some("notes"), NOW)));
        reg.apply(&p1, msg("p1", record("u2", None, NOW + 1)));

        assert_eq!(reg.get("u2").unwrap().active_section, None);
    }

    #[test]
    fn arrival_order_wins_over_timestamps() {
        let mut reg = PeerRegistry::new("me");
        let p1 = ProjectId::from("p1");

        reg.apply(&p1, msg("p1", record("u2", Some("records"), NOW + 5_000)));
        reg.apply(&p1, msg("p1", record("u2", Some("notes"), NOW)));

        let stored = reg.get("u2").unwrap();
        assert_eq!(stored.active_section.as_deref(), Some("notes"));
        assert_eq!(stored.last_seen, NOW);
    }

    #[test]
    fn sweep_evicts_only_stale_peers() {
        let mut reg = PeerRegistry::new("me");
        let p1 = ProjectId::from("p1");
        reg.apply(&p1, msg("p1", record("old", None, NOW - 11_000)));
        reg.apply(&p1, msg("p1", record("fresh", None, NOW - 9_000)));
        reg.apply(&p1, msg("p1", record("edge", None, NOW - 10_000)));

        let evicted = reg.sweep(NOW, Duration::from_secs(10));

        assert_eq!(evicted.len(), 1);
        assert_eq!(evicted[0].user_id, "old");
        assert!(reg.get("fresh").is_some());
        assert!(reg.get("edge").is_some());
    }

    #[test]
    fn sweep_on_empty_registry_is_noop() {
        let mut reg = PeerRegistry::new("me");
        assert!(reg.sweep(NOW, Duration::from_secs(10)).is_empty());
    }

    #[test]
    fn in_section_filters_and_sorts() {
        let mut reg = PeerRegistry::new("me");
        let p1 = ProjectId::from("p1");
        reg.apply(&p1, msg("p1", record("u3", Some("notes"), NOW)));
        reg.apply(&p1, msg("p1", record("u2", Some("notes"), NOW)));
        reg.apply(&p1, msg("p1", record("u4", Some("records"), NOW)));
        reg.apply(&p1, msg("p1", record("u5", None, NOW)));

        let ids: Vec<String> = reg
            .in_section("notes")
            .into_iter()
            .map(|r| r.user_id)
            .collect();
        assert_eq!(ids, vec!["u2", "u3"]);
        assert_eq!(reg.in_section("records").len(), 1);
        assert!(reg.in_section("fabrics").is_empty());
    }
}

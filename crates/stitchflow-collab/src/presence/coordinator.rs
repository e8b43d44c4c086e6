//! Public handle for one project view's presence.

use std::sync::Arc;

use stitchflow_common::{CollabError, ProjectId};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info};

use crate::identity::UserIdentity;
use crate::protocol::PresenceRecord;
use crate::transport::BroadcastTransport;

use super::clock::{Clock, SystemClock};
use super::registry::{peers_in_section, PeerRegistry};
use super::task::{Command, PresenceTask};
use super::types::{PeerMap, PresenceEvent, PresenceSettings};

const EVENT_CAPACITY: usize = 64;

// ---------------------------------------------------------------------------
// Coordinator
// ---------------------------------------------------------------------------

/// Presence for one user on one project.
///
/// Dropping the coordinator stops its task; [`shutdown`](Self::shutdown)
/// does the same and waits for it.
pub struct PresenceCoordinator {
    project_id: ProjectId,
    user_id: String,
    commands: mpsc::UnboundedSender<Command>,
    peers: watch::Receiver<PeerMap>,
    events: broadcast::Sender<PresenceEvent>,
    task: Option<JoinHandle<()>>,
}

impl PresenceCoordinator {
    /// Attach to the shared channel, announce the user, and start the
    /// heartbeat and sweep timers. Must be called within a Tokio runtime.
    ///
    /// Fails with [`CollabError::InvalidSettings`] before touching the
    /// transport if the timings cannot drive a live registry.
    pub fn start(
        project_id: impl Into<ProjectId>,
        identity: &UserIdentity,
        transport: Arc<dyn BroadcastTransport>,
        settings: PresenceSettings,
    ) -> Result<Self, CollabError> {
        Self::start_with_clock(
            project_id,
            identity,
            transport,
            settings,
            Arc::new(SystemClock),
        )
    }

    /// Like [`start`](Self::start) with an explicit timestamp source.
    pub fn start_with_clock(
        project_id: impl Into<ProjectId>,
        identity: &UserIdentity,
        transport: Arc<dyn BroadcastTransport>,
        settings: PresenceSettings,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, CollabError> {
        settings.validate()?;
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CollabError::Runtime(e.to_string()))?;

        let project_id = project_id.into();
        let me = identity.resolve(&settings.default_color);
        let inbound = transport.subscribe(&settings.channel)?;

        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (peers_tx, peers_rx) = watch::channel(PeerMap::new());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        info!(
            project = %project_id,
            user = %me.user_id,
            channel = %settings.channel,
            "Starting presence"
        );

        let user_id = me.user_id.clone();
        let task = PresenceTask {
            project_id: project_id.clone(),
            registry: PeerRegistry::new(me.user_id.clone()),
            me,
            settings,
            transport,
            clock,
            active_section: None,
            peers_tx,
            events_tx: events_tx.clone(),
        };

        let started = Instant::now();
        task.broadcast();
        let handle = runtime.spawn(task.run(started, inbound, command_rx));

        Ok(Self {
            project_id,
            user_id,
            commands: command_tx,
            peers: peers_rx,
            events: events_tx,
            task: Some(handle),
        })
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    /// Effective local user id, after fallbacks.
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// Current view of the other users on this project.
    pub fn peers(&self) -> PeerMap {
        self.peers.borrow().clone()
    }

    /// Receiver that is notified whenever the peer set changes.
    pub fn watch_peers(&self) -> watch::Receiver<PeerMap> {
        self.peers.clone()
    }

    /// Peers focused on `section`, ordered by user id.
    pub fn peers_in_section(&self, section: &str) -> Vec<PresenceRecord> {
        peers_in_section(&self.peers.borrow(), section)
    }

    /// Subscribe to join/update/leave transitions.
    pub fn events(&self) -> broadcast::Receiver<PresenceEvent> {
        self.events.subscribe()
    }

    /// Declare the section the local user is focused on; an empty string
    /// clears it. Broadcasts immediately and is carried by later heartbeats.
    pub fn focus_section(&self, section: &str) {
        let section = (!section.is_empty()).then(|| section.to_string());
        if self.commands.send(Command::Focus(section)).is_err() {
            debug!(project = %self.project_id, "Focus change after presence stopped");
        }
    }

    /// Stop the timers and detach from the transport. No leave message is
    /// sent; peers notice through their staleness sweep.
    pub async fn shutdown(mut self) {
        let _ = self.commands.send(Command::Shutdown);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
        info!(project = %self.project_id, user = %self.user_id, "Presence stopped");
    }
}

impl Drop for PresenceCoordinator {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

//! Background task that owns the registry.
//!
//! Heartbeats, sweeps, inbound messages and focus changes are all handled on
//! this one task, one at a time, so the registry needs no lock.

use std::sync::Arc;

use stitchflow_common::{format_epoch_ms, ProjectId};
use tokio::sync::{broadcast, mpsc, watch};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::identity::ResolvedIdentity;
use crate::protocol::BusMessage;
use crate::transport::{BroadcastTransport, Subscription};

use super::clock::Clock;
use super::registry::{Applied, PeerRegistry};
use super::types::{PeerMap, PresenceEvent, PresenceSettings};

/// Requests from the coordinator handle.
#[derive(Debug)]
pub(crate) enum Command {
    Focus(Option<String>),
    Shutdown,
}

pub(crate) struct PresenceTask {
    pub(crate) project_id: ProjectId,
    pub(crate) me: ResolvedIdentity,
    pub(crate) settings: PresenceSettings,
    pub(crate) transport: Arc<dyn BroadcastTransport>,
    pub(crate) clock: Arc<dyn Clock>,
    pub(crate) registry: PeerRegistry,
    pub(crate) active_section: Option<String>,
    pub(crate) peers_tx: watch::Sender<PeerMap>,
    pub(crate) events_tx: broadcast::Sender<PresenceEvent>,
}

impl PresenceTask {
    /// Run until shutdown is requested or the handle goes away.
    ///
    /// Both timers first fire one full period after `started`; the initial
    /// broadcast is sent by the caller before the task is spawned.
    pub(crate) async fn run(
        mut self,
        started: Instant,
        mut inbound: Subscription,
        mut commands: mpsc::UnboundedReceiver<Command>,
    ) {
        let mut heartbeat = interval_at(
            started + self.settings.heartbeat_interval,
            self.settings.heartbeat_interval,
        );
        heartbeat.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut sweep = interval_at(
            started + self.settings.sweep_interval,
            self.settings.sweep_interval,
        );
        sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut inbound_open = true;

        loop {
            tokio::select! {
                _ = heartbeat.tick() => self.broadcast(),
                _ = sweep.tick() => self.sweep(),
                message = inbound.recv(), if inbound_open => match message {
                    Some(raw) => self.receive(raw),
                    None => {
                        warn!(
                            project = %self.project_id,
                            "Broadcast transport closed, no longer receiving presence"
                        );
                        inbound_open = false;
                    }
                },
                command = commands.recv() => match command {
                    Some(Command::Focus(section)) => {
                        self.active_section = section;
                        self.broadcast();
                    }
                    Some(Command::Shutdown) | None => break,
                },
            }
        }

        debug!(
            project = %self.project_id,
            user = %self.me.user_id,
            "Presence task stopped"
        );
    }

    /// Publish the local user's presence with the current section.
    pub(crate) fn broadcast(&self) {
        let record = self
            .me
            .presence(self.active_section.clone(), self.clock.now_ms());
        let message = BusMessage::presence(self.project_id.clone(), record);
        let value = match message.encode() {
            Ok(value) => value,
            Err(e) => {
                warn!(error = %e, "Failed to encode presence");
                return;
            }
        };
        if let Err(e) = self.transport.publish(&self.settings.channel, value) {
            // Best effort: the next heartbeat supersedes a lost one.
            debug!(error = %e, "Presence broadcast failed");
        }
    }

    fn receive(&mut self, raw: serde_json::Value) {
        let Some(message) = BusMessage::decode(raw) else {
            debug!("Discarding unrecognized message on presence channel");
            return;
        };

        match self.registry.apply(&self.project_id, message) {
            Applied::Joined(record) => {
                info!(
                    project = %self.project_id,
                    user = %record.user_id,
                    name = %record.user_name,
                    "Peer joined"
                );
                self.publish_peers();
                self.emit(PresenceEvent::PeerJoined(record));
            }
            Applied::Updated(record) => {
                debug!(
                    user = %record.user_id,
                    section = ?record.active_section,
                    last_seen = %format_epoch_ms(record.last_seen),
                    "Peer refreshed"
                );
                self.publish_peers();
                self.emit(PresenceEvent::PeerUpdated(record));
            }
            Applied::ForeignProject | Applied::SelfEcho => {}
        }
    }

    fn sweep(&mut self) {
        let evicted = self
            .registry
            .sweep(self.clock.now_ms(), self.settings.stale_after);
        if evicted.is_empty() {
            return;
        }

        self.publish_peers();
        for record in evicted {
            info!(
                project = %self.project_id,
                user = %record.user_id,
                last_seen = %format_epoch_ms(record.last_seen),
                "Peer went stale"
            );
            self.emit(PresenceEvent::PeerLeft {
                user_id: record.user_id,
                user_name: record.user_name,
            });
        }
    }

    fn publish_peers(&self) {
        self.peers_tx.send_replace(self.registry.snapshot());
    }

    fn emit(&self, event: PresenceEvent) {
        // No listeners is fine.
        let _ = self.events_tx.send(event);
    }
}

//! Same-device collaboration presence for StitchFlow project views.
//!
//! Every open view of a project runs a [`PresenceCoordinator`]. Coordinators
//! share one application-wide broadcast topic, announce themselves with
//! periodic heartbeats, and keep a registry of the other users looking at the
//! same project and the section each one is focused on. Peers that stop
//! heartbeating are swept out after a staleness threshold.

pub mod identity;
pub mod presence;
pub mod protocol;
pub mod transport;

pub use identity::{ResolvedIdentity, UserIdentity, DEFAULT_USER_COLOR, DEFAULT_USER_ID};
pub use presence::{
    AnchoredClock, Applied, Clock, PeerMap, PeerRegistry, PresenceCoordinator, PresenceEvent,
    PresenceSettings, SystemClock, DEFAULT_CHANNEL,
};
pub use protocol::{BusMessage, PresenceRecord, PRESENCE_TYPE};
pub use transport::{BroadcastTransport, LocalBus, RelayFrame, RelayTransport, Subscription};

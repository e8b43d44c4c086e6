//! Presence coordination for one (project, user) pair.
//!
//! The coordinator broadcasts the local user's presence on start, on every
//! heartbeat and on every focus change, and keeps a registry of the other
//! users on the same project. Departure is never announced; peers disappear
//! when a sweep finds their last heartbeat older than the staleness threshold.

mod clock;
mod coordinator;
mod registry;
mod task;
mod types;


pub use clock::{AnchoredClock, Clock, SystemClock};
pub use coordinator::PresenceCoordinator;
pub use registry::{Applied, PeerRegistry};
pub use types::{PeerMap, PresenceEvent, PresenceSettings, DEFAULT_CHANNEL};

//! Broadcast transports.
//!
//! A transport is an any-to-any notification bus scoped by topic. Every
//! subscriber of a topic receives every message published on it, including
//! the publisher's own. Filtering by project or user is the caller's job.

mod local;
mod relay;

pub use local::LocalBus;
pub use relay::{RelayFrame, RelayTransport};

use stitchflow_common::CollabError;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tracing::warn;

/// Topic-scoped publish/subscribe bus.
pub trait BroadcastTransport: Send + Sync {
    /// Deliver `message` to every current subscriber of `topic`.
    ///
    /// Publishing to a topic nobody listens on is not an error.
    fn publish(&self, topic: &str, message: serde_json::Value) -> Result<(), CollabError>;

    /// Attach to `topic`. Dropping the returned subscription detaches.
    fn subscribe(&self, topic: &str) -> Result<Subscription, CollabError>;
}

/// Receiving end of a topic.
#[derive(Debug)]
pub struct Subscription {
    topic: String,
    rx: broadcast::Receiver<serde_json::Value>,
}

impl Subscription {
    pub(crate) fn new(topic: &str, rx: broadcast::Receiver<serde_json::Value>) -> Self {
        Self {
            topic: topic.to_string(),
            rx,
        }
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Wait for the next message. Returns `None` once the transport is closed.
    ///
    /// A subscriber that falls behind loses the overflowed messages; that is
    /// logged and receiving continues with the oldest retained one.
    pub async fn recv(&mut self) -> Option<serde_json::Value> {
        loop {
            match self.rx.recv().await {
                Ok(message) => return Some(message),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(topic = %self.topic, skipped, "Subscriber lagged, messages dropped");
                }
                Err(RecvError::Closed) => return None,
            }
        }
    }

    /// Take the next message if one is already queued.
    pub fn try_recv(&mut self) -> Option<serde_json::Value> {
        loop {
            match self.rx.try_recv() {
                Ok(message) => return Some(message),
                Err(TryRecvError::Lagged(skipped)) => {
                    warn!(topic = %self.topic, skipped, "Subscriber lagged, messages dropped");
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => return None,
            }
        }
    }
}

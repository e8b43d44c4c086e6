//! In-process broadcast bus.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use stitchflow_common::CollabError;
use tokio::sync::broadcast;
use tracing::debug;

use super::{BroadcastTransport, Subscription};

const DEFAULT_CAPACITY: usize = 256;

struct BusState {
    topics: HashMap<String, broadcast::Sender<serde_json::Value>>,
    closed: bool,
}

/// In-process bus with one broadcast channel per topic.
///
/// Clones share the same topics, so one `LocalBus` handed to every project
/// view plays the role of the application-wide channel.
#[derive(Clone)]
pub struct LocalBus {
    state: Arc<Mutex<BusState>>,
    capacity: usize,
}

impl LocalBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// `capacity` is the number of messages a slow subscriber may fall behind
    /// before it starts losing them.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(BusState {
                topics: HashMap::new(),
                closed: false,
            })),
            capacity: capacity.max(1),
        }
    }

    /// Shut the bus down. Current subscribers see end-of-stream; later
    /// publishes fail and later subscribes report the transport unavailable.
    pub fn close(&self) {
        let mut state = self.lock();
        state.closed = true;
        state.topics.clear();
        debug!("Local bus closed");
    }

    pub fn is_closed(&self) -> bool {
        self.lock().closed
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        self.lock()
            .topics
            .get(topic)
            .map(|tx| tx.receiver_count())
            .unwrap_or(0)
    }

    fn lock(&self) -> MutexGuard<'_, BusState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for LocalBus {
    fn default() -> Self {
        Self::new()
    }
}

impl BroadcastTransport for LocalBus {
    fn publish(&self, topic: &str, message: serde_json::Value) -> Result<(), CollabError> {
        let state = self.lock();
        if state.closed {
            return Err(CollabError::Closed);
        }
        if let Some(tx) = state.topics.get(topic) {
            // Err only means there are no receivers right now.
            let _ = tx.send(message);
        }
        Ok(())
    }

    fn subscribe(&self, topic: &str) -> Result<Subscription, CollabError> {
        let mut state = self.lock();
        if state.closed {
            return Err(CollabError::TransportUnavailable(
                "local bus is closed".into(),
            ));
        }
        let capacity = self.capacity;
        let rx = state
            .topics
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(capacity).0)
            .subscribe();
        Ok(Subscription::new(topic, rx))
    }
}

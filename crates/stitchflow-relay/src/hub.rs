//! Registry of connected clients and fan-out of their frames.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, RwLock};

pub type ClientId = u64;

/// Thread-safe client registry.
#[derive(Clone)]
pub struct Hub {
    clients: Arc<RwLock<HashMap<ClientId, mpsc::Sender<String>>>>,
    next_id: Arc<AtomicU64>,
}

impl Hub {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(RwLock::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Register a client's outbound queue and return its id.
    pub async fn register(&self, tx: mpsc::Sender<String>) -> ClientId {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.clients.write().await.insert(id, tx);
        id
    }

    /// Remove a client. Returns false if it was not registered.
    pub async fn unregister(&self, id: ClientId) -> bool {
        self.clients.write().await.remove(&id).is_some()
    }

    /// Queue `text` for every client except `from`. Returns how many clients
    /// it was queued for.
    ///
    /// A client whose queue is full misses the frame rather than stalling
    /// everyone else.
    pub async fn fan_out(&self, from: ClientId, text: &str) -> usize {
        let targets: Vec<(ClientId, mpsc::Sender<String>)> = self
            .clients
            .read()
            .await
            .iter()
            .filter(|(id, _)| **id != from)
            .map(|(id, tx)| (*id, tx.clone()))
            .collect();

        let mut delivered = 0;
        for (id, tx) in targets {
            match tx.try_send(text.to_string()) {
                Ok(()) => delivered += 1,
                Err(TrySendError::Full(_)) => {
                    tracing::debug!(client = id, "Client queue full, frame dropped");
                }
                Err(TrySendError::Closed(_)) => {
                    tracing::debug!(client = id, "Client queue closed");
                }
            }
        }
        delivered
    }

    /// Number of connected clients.
    pub async fn count(&self) -> usize {
        self.clients.read().await.len()
    }
}

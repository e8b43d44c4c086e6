//! Transport that spans processes through a `stitchflow-relay` hub.
//!
//! Local subscribers of the same process are served by an inner
//! [`LocalBus`]; every publish is also forwarded to the hub, which fans it
//! out to the other connected processes.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use stitchflow_common::CollabError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tracing::{debug, info, warn};

use super::{BroadcastTransport, LocalBus, Subscription};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Text frame exchanged with the hub.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelayFrame {
    pub topic: String,
    pub payload: serde_json::Value,
}

/// Broadcast transport backed by a WebSocket relay hub.
pub struct RelayTransport {
    local: LocalBus,
    outbound: mpsc::UnboundedSender<String>,
    reader: JoinHandle<()>,
    writer: JoinHandle<()>,
}

impl RelayTransport {
    /// Connect to the hub at `url` (e.g. `ws://127.0.0.1:19850`).
    ///
    /// Fails with [`CollabError::TransportUnavailable`] if the hub cannot be
    /// reached. There is no reconnect: when the hub goes away, subscribers
    /// see end-of-stream.
    pub async fn connect(url: &str) -> Result<Self, CollabError> {
        let (ws_stream, _) = tokio::time::timeout(
            CONNECT_TIMEOUT,
            tokio_tungstenite::connect_async(url),
        )
        .await
        .map_err(|_| {
            CollabError::TransportUnavailable(format!(
                "timed out connecting to relay {url} after {}s",
                CONNECT_TIMEOUT.as_secs()
            ))
        })?
        .map_err(|e| CollabError::TransportUnavailable(format!("relay {url}: {e}")))?;

        info!(url = %url, "Connected to relay");

        let (mut ws_write, mut ws_read) = ws_stream.split();
        let local = LocalBus::new();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<String>();

        let writer = tokio::spawn(async move {
            while let Some(text) = outbound_rx.recv().await {
                if let Err(e) = ws_write.send(WsMessage::Text(text.into())).await {
                    warn!(error = %e, "Relay write failed");
                    break;
                }
            }
            let _ = ws_write.close().await;
        });

        let inbound = local.clone();
        let reader = tokio::spawn(async move {
            while let Some(msg_result) = ws_read.next().await {
                match msg_result {
                    Ok(WsMessage::Text(text)) => match serde_json::from_str::<RelayFrame>(&text) {
                        Ok(frame) => {
                            if inbound.publish(&frame.topic, frame.payload).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            debug!(error = %e, "Ignoring unrecognized relay frame");
                        }
                    },
                    Ok(WsMessage::Close(_)) => {
                        info!("Relay closed connection");
                        break;
                    }
                    Err(e) => {
                        warn!(error = %e, "Relay connection error");
                        break;
                    }
                    _ => {}
                }
            }
            inbound.close();
        });

        Ok(Self {
            local,
            outbound,
            reader,
            writer,
        })
    }

    /// Whether the hub connection is still up.
    pub fn is_connected(&self) -> bool {
        !self.local.is_closed() && !self.outbound.is_closed()
    }
}

impl BroadcastTransport for RelayTransport {
    fn publish(&self, topic: &str, message: serde_json::Value) -> Result<(), CollabError> {
        let frame = RelayFrame {
            topic: topic.to_string(),
            payload: message,
        };
        let text =
            serde_json::to_string(&frame).map_err(|e| CollabError::Encode(e.to_string()))?;
        self.local.publish(topic, frame.payload)?;
        self.outbound.send(text).map_err(|_| CollabError::Closed)
    }

    fn subscribe(&self, topic: &str) -> Result<Subscription, CollabError> {
        self.local.subscribe(topic)
    }
}

impl Drop for RelayTransport {
    fn drop(&mut self) {
        self.reader.abort();
        self.writer.abort();
    }
}

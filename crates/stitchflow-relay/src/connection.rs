//! Per-connection handler: register, then shuttle frames both ways.

use std::net::SocketAddr;

use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

use crate::hub::Hub;

const CLIENT_QUEUE: usize = 256;

/// Handle a single WebSocket connection until either side closes it.
pub async fn handle_connection(
    ws: tokio_tungstenite::WebSocketStream<tokio::net::TcpStream>,
    addr: SocketAddr,
    hub: Hub,
) {
    let (mut sink, mut stream) = ws.split();

    let (tx, mut rx) = mpsc::channel::<String>(CLIENT_QUEUE);
    let id = hub.register(tx).await;

    tracing::info!(peer = %addr, client = id, "Client connected");

    loop {
        tokio::select! {
            // Frames from other clients → this client's WebSocket
            Some(text) = rx.recv() => {
                if sink.send(Message::Text(text.into())).await.is_err() {
                    break;
                }
            }

            // Frames from this client → everyone else
            frame = stream.next() => {
                match frame {
                    Some(Ok(Message::Text(text))) => {
                        let delivered = hub.fan_out(id, text.as_str()).await;
                        tracing::trace!(client = id, delivered, "Frame relayed");
                    }
                    Some(Ok(Message::Ping(data))) => {
                        let _ = sink.send(Message::Pong(data)).await;
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(peer = %addr, error = %e, "WS error");
                        break;
                    }
                    _ => {}
                }
            }
        }
    }

    hub.unregister(id).await;
    tracing::info!(peer = %addr, client = id, "Client disconnected");
}

//! stitchflow-relay: same-device WebSocket hub for presence traffic.
//!
//! Every text frame a client sends is forwarded verbatim to every other
//! connected client, so several dashboard processes on one machine share a
//! single broadcast scope. The hub never inspects payloads; filtering by
//! topic and project happens in the clients.

mod connection;
mod hub;

use std::time::Duration;

use clap::Parser;
use tokio::net::TcpListener;
use tokio_tungstenite::accept_async;

use crate::connection::handle_connection;
use crate::hub::Hub;

#[derive(Parser)]
#[command(name = "stitchflow-relay", version, about = "Same-device presence relay for StitchFlow")]
struct Args {
    /// Port to listen on.
    #[arg(short, long, default_value_t = 19850)]
    port: u16,

    /// Address to bind. Keep it on loopback unless you mean to share presence
    /// beyond this machine.
    #[arg(long, default_value = "127.0.0.1")]
    bind: String,

    /// Seconds between client-count log lines.
    #[arg(long, default_value_t = 60)]
    stats_interval: u64,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "stitchflow_relay=info".into()),
        )
        .init();

    let args = Args::parse();
    let hub = Hub::new();

    let addr = format!("{}:{}", args.bind, args.port);
    let listener = TcpListener::bind(&addr).await?;

    tracing::info!("stitchflow-relay listening on {}", addr);

    let stats_hub = hub.clone();
    let stats_interval = Duration::from_secs(args.stats_interval.max(1));
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(stats_interval).await;
            let count = stats_hub.count().await;
            tracing::debug!(clients = count, "Stats tick");
        }
    });

    loop {
        tokio::select! {
            accepted = listener.accept() => match accepted {
                Ok((stream, peer)) => {
                    let hub = hub.clone();
                    tokio::spawn(async move {
                        match accept_async(stream).await {
                            Ok(ws) => handle_connection(ws, peer, hub).await,
                            Err(e) => {
                                tracing::warn!(peer = %peer, error = %e, "WS handshake failed");
                            }
                        }
                    });
                }
                Err(e) => {
                    tracing::warn!(error = %e, "TCP accept error");
                }
            },
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Shutting down");
                return Ok(());
            }
        }
    }
}

mod cli;
mod input;
mod settings;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use stitchflow_collab::{
    BroadcastTransport, LocalBus, PeerMap, PresenceCoordinator, PresenceEvent, RelayTransport,
};
use stitchflow_common::format_epoch_ms;
use stitchflow_config::StitchflowConfig;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use crate::input::Input;

#[tokio::main]
async fn main() {
    let args = cli::parse();

    // Config comes first so its log level can seed the filter; a load
    // failure is reported once logging is up.
    let loaded = match args.config.as_deref() {
        Some(path) => stitchflow_config::load_config_from(Path::new(path)),
        None => stitchflow_config::load_config(),
    };
    let configured_level = loaded
        .as_ref()
        .map(|config| config.logging.level)
        .unwrap_or_default();

    let log_directive = args
        .log_level
        .clone()
        .unwrap_or_else(|| configured_level.as_directive().to_string());
    let filter = match log_directive.parse() {
        Ok(directive) => EnvFilter::from_default_env().add_directive(directive),
        Err(_) => EnvFilter::from_default_env().add_directive(LevelFilter::INFO.into()),
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!("StitchFlow v{} starting...", env!("CARGO_PKG_VERSION"));
    if let Some(ref path) = args.config {
        tracing::info!("Using config override: {path}");
    }
    let config = match settings::resolve_config(args.config.is_some(), loaded) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{e}");
            std::process::exit(1);
        }
    };

    if !config.presence.enabled {
        tracing::info!("Presence is disabled in config; nothing to do");
        return;
    }

    if let Err(e) = run(&args, &config).await {
        tracing::error!("{e}");
        std::process::exit(1);
    }
    tracing::info!("Shutdown complete");
}

async fn run(args: &cli::Args, config: &StitchflowConfig) -> stitchflow_common::Result<()> {
    let transport = open_transport(settings::relay_url(args.relay.as_deref(), &config.relay)).await;
    let identity = settings::identity(args);
    let presence = settings::presence_settings(&config.presence);

    let coordinator =
        PresenceCoordinator::start(args.project.as_str(), &identity, transport, presence)?;
    tracing::info!(
        project = %coordinator.project_id(),
        user = coordinator.user_id(),
        "Joined project. Type a section name to focus it, an empty line to clear, /peers to list"
    );

    let mut events = coordinator.events();
    let mut sections = HashMap::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => match input::parse_line(&line) {
                    Input::Focus(section) => {
                        coordinator.focus_section(&section);
                        tracing::info!("Focused on {section:?}");
                    }
                    Input::Clear => {
                        coordinator.focus_section("");
                        tracing::info!("Focus cleared");
                    }
                    Input::ListPeers => print_peers(&coordinator.peers()),
                    Input::Unknown(cmd) => tracing::warn!("Unknown command: {cmd}"),
                },
                Ok(None) => {
                    tracing::info!("stdin closed");
                    break;
                }
                Err(e) => {
                    tracing::warn!("Failed to read stdin: {e}");
                    break;
                }
            },
            event = events.recv() => match event {
                Ok(event) => log_event(&event, &mut sections),
                Err(RecvError::Lagged(n)) => tracing::warn!("Missed {n} presence events"),
                Err(RecvError::Closed) => break,
            },
            _ = &mut ctrl_c => {
                tracing::info!("Interrupted");
                break;
            }
        }
    }

    coordinator.shutdown().await;
    Ok(())
}

/// Connect to the relay when one is requested, otherwise stay in-process.
async fn open_transport(relay_url: Option<String>) -> Arc<dyn BroadcastTransport> {
    let Some(url) = relay_url else {
        tracing::info!("No relay configured; presence is local to this process");
        return Arc::new(LocalBus::new());
    };
    match RelayTransport::connect(&url).await {
        Ok(relay) => {
            tracing::info!("Connected to relay at {url}");
            Arc::new(relay)
        }
        Err(e) => {
            tracing::warn!("Relay unavailable, presence is local to this process: {e}");
            Arc::new(LocalBus::new())
        }
    }
}

/// Log a presence transition. Heartbeats that change nothing visible are
/// logged at debug only.
fn log_event(event: &PresenceEvent, sections: &mut HashMap<String, Option<String>>) {
    match event {
        PresenceEvent::PeerJoined(peer) => {
            sections.insert(peer.user_id.clone(), peer.active_section.clone());
            tracing::info!(
                "{} joined ({})",
                peer.user_name,
                peer.active_section.as_deref().unwrap_or("no section")
            );
        }
        PresenceEvent::PeerUpdated(peer) => {
            let previous = sections.insert(peer.user_id.clone(), peer.active_section.clone());
            if previous.as_ref() == Some(&peer.active_section) {
                tracing::debug!("{} heartbeat", peer.user_name);
            } else {
                tracing::info!(
                    "{} is in {}",
                    peer.user_name,
                    peer.active_section.as_deref().unwrap_or("no section")
                );
            }
        }
        PresenceEvent::PeerLeft { user_id, user_name } => {
            sections.remove(user_id);
            tracing::info!("{user_name} left");
        }
    }
}

fn print_peers(peers: &PeerMap) {
    if peers.is_empty() {
        println!("No one else here.");
        return;
    }
    let mut peers: Vec<_> = peers.values().collect();
    peers.sort_by(|a, b| a.user_name.cmp(&b.user_name));
    for peer in peers {
        println!(
            "  {:<20} {:<8} {:<12} last seen {}",
            peer.user_name,
            peer.user_color,
            peer.active_section.as_deref().unwrap_or("-"),
            format_epoch_ms(peer.last_seen)
        );
    }
}

//! Where the same-device relay hub lives and whether to use it.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// Port `stitchflow-relay` listens on by default.
pub const DEFAULT_RELAY_PORT: u16 = 19850;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// `ws://` or `wss://` address of the hub.
    pub url: String,
    /// Join the hub on startup without `--relay`.
    pub auto_connect: bool,
    /// Permit a hub on another machine. Presence is a same-device feature,
    /// so non-loopback hosts are rejected unless this is set.
    pub allow_remote: bool,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            url: format!("ws://127.0.0.1:{DEFAULT_RELAY_PORT}"),
            auto_connect: false,
            allow_remote: false,
        }
    }
}

impl RelayConfig {
    /// Host part of `url`, without scheme, port, path or IPv6 brackets.
    pub fn host(&self) -> Option<&str> {
        let rest = self
            .url
            .strip_prefix("ws://")
            .or_else(|| self.url.strip_prefix("wss://"))?;
        let authority = rest.split(['/', '?', '#']).next()?;
        let authority = authority.rsplit('@').next()?;

        let host = if let Some(bracketed) = authority.strip_prefix('[') {
            bracketed.split(']').next()?
        } else {
            authority.split(':').next()?
        };
        (!host.is_empty()).then_some(host)
    }

    /// Whether `url` points at this machine.
    pub fn is_loopback(&self) -> bool {
        match self.host() {
            Some(host) if host.eq_ignore_ascii_case("localhost") => true,
            Some(host) => host.parse::<IpAddr>().is_ok_and(|ip| ip.is_loopback()),
            None => false,
        }
    }
}

use crate::schema::StitchflowConfig;

/// The relay must be a WebSocket URL on this machine unless remote hubs are
/// explicitly allowed.
pub(crate) fn validate_relay(errors: &mut Vec<String>, config: &StitchflowConfig) {
    let relay = &config.relay;
    let url = &relay.url;
    if !(url.starts_with("ws://") || url.starts_with("wss://")) {
        errors.push(format!("relay.url = {url:?} must start with ws:// or wss://"));
        return;
    }
    match relay.host() {
        None => errors.push(format!("relay.url = {url:?} has no host")),
        Some(host) if !relay.allow_remote && !relay.is_loopback() => errors.push(format!(
            "relay.url host {host:?} is not loopback; set relay.allow_remote = true to use it"
        )),
        Some(_) => {}
    }
}

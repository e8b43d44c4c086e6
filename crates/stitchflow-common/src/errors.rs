use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CollabError {
    #[error("broadcast transport unavailable: {0}")]
    TransportUnavailable(String),

    #[error("failed to encode message: {0}")]
    Encode(String),

    #[error("no async runtime: {0}")]
    Runtime(String),

    #[error("invalid presence settings: {0}")]
    InvalidSettings(String),

    #[error("transport closed")]
    Closed,
}

#[derive(Debug, thiserror::Error)]
pub enum StitchflowError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Collab(#[from] CollabError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_error_display() {
        let err = ConfigError::FileNotFound(PathBuf::from("/tmp/missing.toml"));
        assert_eq!(err.to_string(), "config file not found: /tmp/missing.toml");

        let err = ConfigError::ParseError("unexpected token".into());
        assert_eq!(err.to_string(), "config parse error: unexpected token");

        let err = ConfigError::ValidationError("presence.channel is empty".into());
        assert_eq!(
            err.to_string(),
            "config validation error: presence.channel is empty"
        );
    }

    #[test]
    fn collab_error_display() {
        let err = CollabError::TransportUnavailable("bus closed".into());
        assert_eq!(err.to_string(), "broadcast transport unavailable: bus closed");

        let err = CollabError::Encode("key must be a string".into());
        assert_eq!(err.to_string(), "failed to encode message: key must be a string");

        let err = CollabError::Runtime("must be called from a Tokio runtime".into());
        assert_eq!(err.to_string(), "no async runtime: must be called from a Tokio runtime");

        let err = CollabError::InvalidSettings("sweep_interval must be non-zero".into());
        assert_eq!(
            err.to_string(),
            "invalid presence settings: sweep_interval must be non-zero"
        );

        assert_eq!(CollabError::Closed.to_string(), "transport closed");
    }

    #[test]
    fn stitchflow_error_from_config() {
        let config_err = ConfigError::ParseError("bad toml".into());
        let err: StitchflowError = config_err.into();
        assert!(matches!(err, StitchflowError::Config(_)));
        assert!(err.to_string().contains("bad toml"));
    }

    #[test]
    fn stitchflow_error_from_collab() {
        let collab_err = CollabError::TransportUnavailable("relay refused".into());
        let err: StitchflowError = collab_err.into();
        assert!(matches!(err, StitchflowError::Collab(_)));
        assert!(err.to_string().contains("relay refused"));
    }
}

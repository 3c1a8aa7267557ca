//! Client configuration with TOML support

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CleverClientError, Result};

/// Connection settings for the Clever backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout in seconds (default: 10s)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Connect timeout in seconds (default: 10s)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            request_timeout_secs: default_request_timeout(),
            connect_timeout_secs: default_connect_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://mobileapp-backend.clever.dk".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_connect_timeout() -> u64 {
    10
}

impl ClientConfig {
    /// Configuration pointing at another backend, e.g. a test server
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// At least one second
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// At least one second
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs.max(1))
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| CleverClientError::Config(e.to_string()))
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            CleverClientError::Config(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = ClientConfig::from_toml("request_timeout_secs = 3").unwrap();
        assert_eq!(config.base_url, "https://mobileapp-backend.clever.dk");
        assert_eq!(config.request_timeout(), Duration::from_secs(3));
        assert_eq!(config.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_zero_timeouts_are_raised() {
        let config =
            ClientConfig::from_toml("request_timeout_secs = 0\nconnect_timeout_secs = 0").unwrap();
        assert_eq!(config.request_timeout(), Duration::from_secs(1));
        assert_eq!(config.connect_timeout(), Duration::from_secs(1));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("client.toml");
        std::fs::write(&path, "base_url = \"http://127.0.0.1:9000\"\n").unwrap();
        let config = ClientConfig::from_toml_file(&path).unwrap();
        assert_eq!(config.base_url, "http://127.0.0.1:9000");
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(
            ClientConfig::from_toml("request_timeout_secs = \"soon\""),
            Err(CleverClientError::Config(_))
        ));
    }
}

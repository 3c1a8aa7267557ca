//! Account configuration file for clever-cli
//!
//! Written after `login` and `reauth`; every other command reads it.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use clever_client::ClientConfig;
use clever_coordinator::CoordinatorConfig;
use clever_core::Credentials;

/// Charge point bound to the account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargePointConfig {
    pub box_id: String,
    #[serde(default = "default_connector")]
    pub connector_id: u32,
}

fn default_connector() -> u32 {
    1
}

/// Saved credentials and settings of one account
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountConfig {
    pub email: String,
    /// Long-lived user secret
    pub api_token: String,
    /// Short-lived key used in request paths
    pub api_key: String,
    /// Monthly subscription fee in DKK
    #[serde(default)]
    pub subscription_fee: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub charge_point: Option<ChargePointConfig>,
    #[serde(default)]
    pub client: ClientConfig,
    #[serde(default)]
    pub coordinator: CoordinatorConfig,
}

impl AccountConfig {
    pub fn new(credentials: Credentials, client: ClientConfig) -> Self {
        Self {
            email: credentials.email,
            api_token: credentials.api_token,
            api_key: credentials.api_key,
            subscription_fee: 0.0,
            charge_point: None,
            client,
            coordinator: CoordinatorConfig::default(),
        }
    }

    pub fn credentials(&self) -> Credentials {
        Credentials {
            email: self.email.clone(),
            api_token: self.api_token.clone(),
            api_key: self.api_key.clone(),
        }
    }

    /// Replace the credentials, keeping every other setting
    pub fn update_credentials(&mut self, credentials: Credentials) {
        self.email = credentials.email;
        self.api_token = credentials.api_token;
        self.api_key = credentials.api_key;
    }

    /// Load from `path`, or from the default location
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = Self::resolve(path)?;
        if !path.exists() {
            anyhow::bail!(
                "No account configured at {}, run `clever-cli login <email>` first",
                path.display()
            );
        }
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Write to `path`, or to the default location
    pub fn save(&self, path: Option<&Path>) -> Result<PathBuf> {
        let path = Self::resolve(path)?;
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create config directory: {}", dir.display()))?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(path)
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Could not determine config directory")?
            .join("clever-cli");

        Ok(config_dir.join("config.toml"))
    }

    fn resolve(path: Option<&Path>) -> Result<PathBuf> {
        match path {
            Some(path) => Ok(path.to_path_buf()),
            None => Self::config_path(),
        }
    }
}

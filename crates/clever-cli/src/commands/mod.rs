//! Command implementations for clever-cli

pub mod account;
pub mod control;
pub mod login;
pub mod status;
pub mod watch;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clever_client::{CleverClient, Transport};
use clever_coordinator::{
    ChargePointCoordinator, ChargePointRefresher, SubscriptionCoordinator, SubscriptionRefresher,
};

use crate::config::AccountConfig;

pub use account::{installations, profile};
pub use control::{boost, departure, flex, preheat, range, BoostMode, Toggle};
pub use login::{login, reauth};
pub use status::status;
pub use watch::watch;

/// Loaded account plus the transport all commands share
pub struct Account {
    pub config: AccountConfig,
    pub config_path: Option<PathBuf>,
    pub transport: Arc<Transport>,
}

impl Account {
    pub fn open(config: AccountConfig, config_path: Option<PathBuf>) -> Result<Self> {
        let transport = Transport::new(config.client.clone())
            .context("Failed to create Clever client")?;
        Ok(Self {
            config,
            config_path,
            transport: Arc::new(transport),
        })
    }

    pub fn client(&self) -> CleverClient {
        CleverClient::from_credentials(self.transport.clone(), &self.config.credentials())
    }

    pub fn subscription_coordinator(&self) -> SubscriptionCoordinator {
        SubscriptionRefresher::new(self.client(), self.config.subscription_fee)
            .into_coordinator(&self.config.coordinator)
    }

    /// Coordinator of the bound charge point, `None` when none is configured
    pub fn charge_point_coordinator(&self) -> Option<ChargePointCoordinator> {
        let cp = self.config.charge_point.as_ref()?;
        Some(
            ChargePointRefresher::new(
                self.client(),
                cp.box_id.clone(),
                cp.connector_id,
                self.config.subscription_fee,
            )
            .into_coordinator(&self.config.coordinator),
        )
    }

    pub fn require_charge_point(&self) -> Result<ChargePointCoordinator> {
        self.charge_point_coordinator().context(
            "No charge point configured, run `clever-cli login` again with --box-id",
        )
    }
}

impl Drop for Account {
    fn drop(&mut self) {
        self.transport.close();
    }
}

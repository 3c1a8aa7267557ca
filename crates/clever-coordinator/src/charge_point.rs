//! Charge-point-tier coordinator: live session, installation and the
//! consumption of one charge box

use std::future::Future;

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use tracing::{debug, instrument, warn};

use clever_client::{ChargePoint, CleverClient};
use clever_core::{
    aggregate, ChargePointInstallation, ChargePointLiveState, ConsumptionAggregate,
    EnergySurcharge,
};

use crate::config::CoordinatorConfig;
use crate::coordinator::{Coordinator, CoordinatorSnapshot, Refresh};
use crate::error::{CoordinatorError, Result};

pub type ChargePointCoordinator = Coordinator<ChargePointRefresher>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargePointSnapshot {
    /// Includes the total of the bound box
    pub consumption: ConsumptionAggregate,
    pub surcharge: EnergySurcharge,
    pub subscription_fee: f64,
    /// `None` when no session is active or recent
    pub state: Option<ChargePointLiveState>,
    /// Installation of the bound connector, if the account lists it
    pub installation: Option<ChargePointInstallation>,
}

/// Reads everything shown for one connector
#[derive(Debug, Clone)]
pub struct ChargePointRefresher {
    client: CleverClient,
    charge_point: ChargePoint,
    subscription_fee: f64,
}

impl ChargePointRefresher {
    pub fn new(
        client: CleverClient,
        box_id: impl Into<String>,
        connector_id: u32,
        subscription_fee: f64,
    ) -> Self {
        let charge_point = client.charge_point(box_id, connector_id);
        Self {
            client,
            charge_point,
            subscription_fee,
        }
    }

    pub fn charge_point(&self) -> &ChargePoint {
        &self.charge_point
    }

    pub fn into_coordinator(self, config: &CoordinatorConfig) -> ChargePointCoordinator {
        Coordinator::new(self, config.charge_point_interval())
    }

    fn select_installation(
        &self,
        installations: Vec<ChargePointInstallation>,
    ) -> Option<ChargePointInstallation> {
        let cp = &self.charge_point;
        let found = installations
            .into_iter()
            .find(|i| i.charge_box_id == cp.box_id() && i.connector_id == cp.connector_id());
        if found.is_none() {
            warn!(
                box_id = cp.box_id(),
                connector = cp.connector_id(),
                "Charge point not among installations"
            );
        }
        found
    }
}

#[async_trait]
impl Refresh for ChargePointRefresher {
    type Output = ChargePointSnapshot;

    fn name(&self) -> &str {
        "charge_point"
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<ChargePointSnapshot> {
        debug!(box_id = self.charge_point.box_id(), "Reading charge point");
        let state = self.charge_point.get_state().await?;
        let installations = self.client.get_installations().await?;
        let history = self.client.get_transactions().await?;
        let surcharge = self.client.get_energy_surcharge().await?;

        let consumption = aggregate(
            &history.records,
            Some(self.charge_point.box_id()),
            &Local::now(),
        )?;

        Ok(ChargePointSnapshot {
            consumption,
            surcharge,
            subscription_fee: self.subscription_fee,
            state,
            installation: self.select_installation(installations),
        })
    }
}

/// Result of a command the backend accepted
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    /// Latest snapshot after the follow-up refresh, stale if that refresh
    /// failed. `None` when nothing was ever published.
    pub snapshot: Option<CoordinatorSnapshot<ChargePointSnapshot>>,
    /// Failure of the follow-up refresh
    pub refresh_error: Option<CoordinatorError>,
}

impl ChargePointCoordinator {
    /// Send a command to the bound charge point, then refresh once the
    /// backend had `settle` to apply it.
    ///
    /// Only a failed command is an `Err`. A failed refresh after an accepted
    /// command is reported in [`CommandOutcome::refresh_error`] and leaves the
    /// previous snapshot in place, flagged stale.
    pub async fn execute<F, Fut>(
        &self,
        settle: std::time::Duration,
        command: F,
    ) -> Result<CommandOutcome>
    where
        F: FnOnce(ChargePoint) -> Fut,
        Fut: Future<Output = clever_client::Result<()>>,
    {
        command(self.refresher().charge_point().clone()).await?;
        match self.refresh_after(settle).await {
            Ok(snapshot) => Ok(CommandOutcome {
                snapshot: Some(snapshot),
                refresh_error: None,
            }),
            Err(e) => {
                warn!(error = %e, "Command accepted, refresh afterwards failed");
                Ok(CommandOutcome {
                    snapshot: self.snapshot(),
                    refresh_error: Some(e),
                })
            }
        }
    }
}

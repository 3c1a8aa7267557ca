//! Subscription-tier coordinator: account consumption and pricing

use async_trait::async_trait;
use chrono::Local;
use serde::Serialize;
use tracing::instrument;

use clever_client::CleverClient;
use clever_core::{aggregate, ConsumptionAggregate, EnergySurcharge};

use crate::config::CoordinatorConfig;
use crate::coordinator::{Coordinator, Refresh};
use crate::error::Result;

pub type SubscriptionCoordinator = Coordinator<SubscriptionRefresher>;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionSnapshot {
    pub consumption: ConsumptionAggregate,
    pub surcharge: EnergySurcharge,
    /// Monthly fee in DKK, supplied by the host
    pub subscription_fee: f64,
}

/// Reads the transaction history and surcharge for one account
#[derive(Debug, Clone)]
pub struct SubscriptionRefresher {
    client: CleverClient,
    subscription_fee: f64,
}

impl SubscriptionRefresher {
    pub fn new(client: CleverClient, subscription_fee: f64) -> Self {
        Self {
            client,
            subscription_fee,
        }
    }

    pub fn client(&self) -> &CleverClient {
        &self.client
    }

    pub fn into_coordinator(self, config: &CoordinatorConfig) -> SubscriptionCoordinator {
        Coordinator::new(self, config.subscription_interval())
    }
}

#[async_trait]
impl Refresh for SubscriptionRefresher {
    type Output = SubscriptionSnapshot;

    fn name(&self) -> &str {
        "subscription"
    }

    #[instrument(skip(self))]
    async fn refresh(&self) -> Result<SubscriptionSnapshot> {
        let history = self.client.get_transactions().await?;
        let surcharge = self.client.get_energy_surcharge().await?;

        Ok(SubscriptionSnapshot {
            consumption: aggregate(&history.records, None, &Local::now())?,
            surcharge,
            subscription_fee: self.subscription_fee,
        })
    }
}

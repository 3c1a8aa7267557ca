//! Clever command client: account reads and charge point commands

use std::fmt;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use clever_core::{
    parse, ChargePointInstallation, ChargePointLiveState, Credentials, DepartureTime,
    DesiredRangeBody, DepartureTimeBody, EnergySurcharge, Envelope, FlexEnableBody,
    FlexMigrationBody, FlexRequest, SchemaError, TransactionHistory, UserProfile,
};

use crate::endpoint::{ChargePointPath, Endpoint};
use crate::error::Result;
use crate::transport::Transport;

/// Account-level client for one API key
#[derive(Clone)]
pub struct CleverClient {
    transport: Arc<Transport>,
    api_key: String,
}

impl fmt::Debug for CleverClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleverClient")
            .field("base_url", &self.transport.base_url().as_str())
            .finish_non_exhaustive()
    }
}

impl CleverClient {
    pub fn new(transport: Arc<Transport>, api_key: impl Into<String>) -> Self {
        Self {
            transport,
            api_key: api_key.into(),
        }
    }

    pub fn from_credentials(transport: Arc<Transport>, credentials: &Credentials) -> Self {
        Self::new(transport, credentials.api_key.clone())
    }

    pub fn transport(&self) -> &Arc<Transport> {
        &self.transport
    }

    /// Handle for commands on one connector of a charge box
    pub fn charge_point(&self, box_id: impl Into<String>, connector_id: u32) -> ChargePoint {
        ChargePoint {
            transport: self.transport.clone(),
            api_key: self.api_key.clone(),
            box_id: box_id.into(),
            connector_id,
        }
    }

    async fn get<T: serde::de::DeserializeOwned>(
        &self,
        entity: &'static str,
        endpoint: Endpoint<'_>,
    ) -> Result<T> {
        let payload = self.transport.call(&endpoint, None).await?;
        let envelope: Envelope<T> = parse(entity, payload)?;
        Ok(envelope.data)
    }

    /// Customer profile
    #[instrument(skip(self))]
    pub async fn get_user_info(&self) -> Result<UserProfile> {
        self.get(
            "UserProfile",
            Endpoint::Profile {
                api_key: &self.api_key,
            },
        )
        .await
    }

    /// Full charging history
    #[instrument(skip(self))]
    pub async fn get_transactions(&self) -> Result<TransactionHistory> {
        let history: TransactionHistory = self
            .get(
                "TransactionHistory",
                Endpoint::ConsumptionHistory {
                    api_key: &self.api_key,
                },
            )
            .await?;
        debug!(records = history.records.len(), "Fetched transactions");
        Ok(history)
    }

    /// Charge points installed at the customer's home
    #[instrument(skip(self))]
    pub async fn get_installations(&self) -> Result<Vec<ChargePointInstallation>> {
        let installations: Vec<ChargePointInstallation> = self
            .get(
                "ChargePointInstallation",
                Endpoint::Installations {
                    api_key: &self.api_key,
                },
            )
            .await?;
        debug!(count = installations.len(), "Fetched installations");
        Ok(installations)
    }

    /// Estimated energy surcharge for the current period
    #[instrument(skip(self))]
    pub async fn get_energy_surcharge(&self) -> Result<EnergySurcharge> {
        self.get(
            "EnergySurcharge",
            Endpoint::EnergySurcharge {
                api_key: &self.api_key,
            },
        )
        .await
    }
}

/// Commands and live state for one connector of a home charge box.
///
/// Mutations do not refresh any cached state; callers re-read afterwards.
#[derive(Clone)]
pub struct ChargePoint {
    transport: Arc<Transport>,
    api_key: String,
    box_id: String,
    connector_id: u32,
}

impl fmt::Debug for ChargePoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChargePoint")
            .field("box_id", &self.box_id)
            .field("connector_id", &self.connector_id)
            .finish_non_exhaustive()
    }
}

impl ChargePoint {
    pub fn box_id(&self) -> &str {
        &self.box_id
    }

    pub fn connector_id(&self) -> u32 {
        self.connector_id
    }

    fn path(&self) -> ChargePointPath<'_> {
        ChargePointPath {
            api_key: &self.api_key,
            box_id: &self.box_id,
            connector_id: self.connector_id,
        }
    }

    async fn post(&self, endpoint: Endpoint<'_>, body: Option<Value>) -> Result<()> {
        self.transport.call(&endpoint, body.as_ref()).await?;
        info!(
            command = endpoint.name(),
            box_id = %self.box_id,
            connector = self.connector_id,
            "Charge point command accepted"
        );
        Ok(())
    }

    /// Live state of the connector, `None` when there is no recent session
    #[instrument(skip(self), fields(box_id = %self.box_id))]
    pub async fn get_state(&self) -> Result<Option<ChargePointLiveState>> {
        let payload = self
            .transport
            .call(&Endpoint::ChargePointState(self.path()), None)
            .await?;
        let envelope: Envelope<Option<ChargePointLiveState>> =
            parse("ChargePointLiveState", payload)?;
        Ok(envelope.data)
    }

    /// Enable flex charging with a complete schedule, or disable it.
    ///
    /// Enabling always sends all three settings in one `migrate` call, which
    /// also moves an already enabled configuration to the new values.
    #[instrument(skip(self), fields(box_id = %self.box_id))]
    pub async fn set_flex(&self, request: &FlexRequest) -> Result<()> {
        match request {
            FlexRequest::Enable(schedule) => {
                let body = to_body(FlexMigrationBody::from(schedule))?;
                self.post(Endpoint::FlexMigrate(self.path()), Some(body))
                    .await
            }
            FlexRequest::Disable => {
                let body = to_body(FlexEnableBody { enable: false })?;
                self.post(Endpoint::FlexEnable(self.path()), Some(body))
                    .await
            }
        }
    }

    /// Change only the departure time of an enabled flex schedule
    #[instrument(skip(self), fields(box_id = %self.box_id))]
    pub async fn set_departure_time(&self, time: DepartureTime) -> Result<()> {
        let body = to_body(DepartureTimeBody { time })?;
        self.post(Endpoint::FlexSchedule(self.path()), Some(body))
            .await
    }

    /// Change only the desired energy of an enabled flex schedule
    #[instrument(skip(self), fields(box_id = %self.box_id))]
    pub async fn set_desired_range_kwh(&self, kwh: u32) -> Result<()> {
        let body = to_body(DesiredRangeBody { range: kwh })?;
        self.post(Endpoint::FlexRange(self.path()), Some(body))
            .await
    }

    /// Switch climate preheat on or off
    #[instrument(skip(self), fields(box_id = %self.box_id))]
    pub async fn set_climate_preheat(&self, enable: bool) -> Result<()> {
        self.post(
            Endpoint::Preheat {
                charge_point: self.path(),
                enable,
            },
            None,
        )
        .await
    }

    /// Skip smart charging for the current session, or return to it.
    /// Switching off goes through [`ChargePoint::disable_boost`].
    #[instrument(skip(self), fields(box_id = %self.box_id))]
    pub async fn set_unlimited_boost(&self, enable: bool) -> Result<()> {
        if !enable {
            return self.disable_boost().await;
        }
        self.post(Endpoint::Boost(self.path()), None).await
    }

    /// Skip smart charging for 30 minutes
    #[instrument(skip(self), fields(box_id = %self.box_id))]
    pub async fn set_timed_boost(&self) -> Result<()> {
        self.post(Endpoint::TimedBoost(self.path()), None).await
    }

    /// Return to smart charging
    #[instrument(skip(self), fields(box_id = %self.box_id))]
    pub async fn disable_boost(&self) -> Result<()> {
        self.post(Endpoint::Unboost(self.path()), None).await
    }
}

fn to_body<T: Serialize>(body: T) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| SchemaError::new("request body", e.to_string()).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    #[test]
    fn test_debug_hides_api_key() {
        let transport = Arc::new(Transport::new(ClientConfig::default()).unwrap());
        let client = CleverClient::new(transport, "very-secret-key");
        let charger = client.charge_point("1456125", 1);
        assert!(!format!("{:?}", client).contains("very-secret-key"));
        let printed = format!("{:?}", charger);
        assert!(!printed.contains("very-secret-key"));
        assert!(printed.contains("1456125"));
    }
}

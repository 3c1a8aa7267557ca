//! Home charge point installation

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// `preheatInMinutes` value reported while preheat is switched on
pub const PREHEAT_ENABLED_MINUTES: i64 = 30;

/// A charge point installed at the customer's home
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargePointInstallation {
    #[serde(rename = "installationId")]
    pub installation_id: String,
    #[serde(rename = "chargeBoxId")]
    pub charge_box_id: String,
    #[serde(rename = "connectorId")]
    pub connector_id: u32,
    #[serde(rename = "smartChargingIsEnabled", default)]
    pub smart_charging_enabled: Option<bool>,
    #[serde(rename = "smartChargingVersion", default)]
    pub smart_charging_version: Option<String>,
    #[serde(rename = "smartChargingData", default)]
    pub smart_charging_data: Option<Value>,
    /// Only present while smart charging is enabled
    #[serde(rename = "smartChargingConfiguration", default)]
    pub smart_charging_configuration: Option<SmartChargingConfiguration>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmartChargingConfiguration {
    #[serde(rename = "userConfiguration")]
    pub user_configuration: UserConfiguration,
}

/// Flex settings as last saved by the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserConfiguration {
    pub status: Value,
    #[serde(rename = "carCategory")]
    pub car_category: String,
    #[serde(rename = "departureTime")]
    pub departure_time: Value,
    #[serde(rename = "desiredRange")]
    pub desired_range: Value,
    #[serde(rename = "configuredEffect")]
    pub configured_effect: Value,
    #[serde(rename = "preheatInMinutes")]
    pub preheat_in_minutes: Value,
    pub rules: Vec<Value>,
}

impl ChargePointInstallation {
    pub fn smart_charging_enabled(&self) -> bool {
        self.smart_charging_enabled == Some(true)
    }

    /// User configuration, only while smart charging is on
    pub fn user_configuration(&self) -> Option<&UserConfiguration> {
        if !self.smart_charging_enabled() {
            return None;
        }
        self.smart_charging_configuration
            .as_ref()
            .map(|c| &c.user_configuration)
    }

    /// Planned departure as `HH:MM`
    pub fn planned_departure(&self) -> Option<&str> {
        self.user_configuration()?.departure_time.get("time")?.as_str()
    }

    /// Energy the user asked for before departure, in kWh
    pub fn desired_range_kwh(&self) -> Option<f64> {
        self.user_configuration()?
            .desired_range
            .get("desiredRange")?
            .as_f64()
    }

    /// Number of phases flex charging is configured for
    pub fn configured_phase_count(&self) -> Option<u64> {
        self.user_configuration()?
            .configured_effect
            .get("phaseCount")?
            .as_u64()
    }

    /// Preheat is on when the backend reports the 30 minute lead time.
    /// Always off while smart charging is disabled.
    pub fn preheat_enabled(&self) -> bool {
        self.user_configuration()
            .and_then(|c| c.preheat_in_minutes.as_i64())
            .is_some_and(|m| m == PREHEAT_ENABLED_MINUTES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse, Envelope};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn configured() -> Value {
        json!({
            "installationId": "inst-1",
            "chargeBoxId": "1456125",
            "connectorId": 1,
            "smartChargingIsEnabled": true,
            "smartChargingVersion": "v3",
            "smartChargingData": null,
            "smartChargingConfiguration": {
                "userConfiguration": {
                    "status": "Active",
                    "carCategory": "Large",
                    "departureTime": {"time": "06:30"},
                    "desiredRange": {"desiredRange": 40},
                    "configuredEffect": {"phaseCount": 3},
                    "preheatInMinutes": 30,
                    "rules": []
                }
            }
        })
    }

    #[test]
    fn test_configured_accessors() {
        let inst: ChargePointInstallation = parse("ChargePointInstallation", configured()).unwrap();
        assert!(inst.smart_charging_enabled());
        assert_eq!(inst.planned_departure(), Some("06:30"));
        assert_eq!(inst.desired_range_kwh(), Some(40.0));
        assert_eq!(inst.configured_phase_count(), Some(3));
        assert!(inst.preheat_enabled());
    }

    #[test]
    fn test_configuration_absent_when_disabled() {
        let inst: ChargePointInstallation = parse(
            "ChargePointInstallation",
            json!({
                "installationId": "inst-1",
                "chargeBoxId": "1456125",
                "connectorId": 1,
                "smartChargingIsEnabled": false
            }),
        )
        .unwrap();
        assert!(inst.smart_charging_configuration.is_none());
        assert!(!inst.preheat_enabled());
        assert_eq!(inst.planned_departure(), None);
    }

    #[test]
    fn test_missing_box_id_is_named() {
        let mut value = configured();
        value.as_object_mut().unwrap().remove("chargeBoxId");
        let err = parse::<ChargePointInstallation>("ChargePointInstallation", value).unwrap_err();
        assert!(err.message.contains("`chargeBoxId`"), "{}", err.message);
    }

    #[test]
    fn test_wrong_type_in_list_item_is_named() {
        let mut bad = configured();
        bad["connectorId"] = json!("x");
        let value = json!({
            "status": true,
            "statusMessage": "OK",
            "timestamp": "t",
            "data": [configured(), bad]
        });
        let err = parse::<Envelope<Vec<ChargePointInstallation>>>("ChargePointInstallation", value)
            .unwrap_err();
        assert!(
            err.message.starts_with("data[1].connectorId: invalid type"),
            "{}",
            err.message
        );
    }

    #[test]
    fn test_round_trip_with_configuration() {
        let inst: ChargePointInstallation = parse("ChargePointInstallation", configured()).unwrap();
        let value = serde_json::to_value(&inst).unwrap();
        assert_eq!(value["smartChargingConfiguration"]["userConfiguration"]["preheatInMinutes"], 30);
        let again: ChargePointInstallation = parse("ChargePointInstallation", value).unwrap();
        assert_eq!(again, inst);
    }

    #[test]
    fn test_round_trip_without_configuration() {
        let inst: ChargePointInstallation = parse(
            "ChargePointInstallation",
            json!({
                "installationId": "inst-2",
                "chargeBoxId": "1456125",
                "connectorId": 2
            }),
        )
        .unwrap();
        let value = serde_json::to_value(&inst).unwrap();
        let again: ChargePointInstallation = parse("ChargePointInstallation", value).unwrap();
        assert_eq!(again, inst);
        assert_eq!(again.smart_charging_enabled, None);
    }
}

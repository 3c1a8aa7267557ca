//! Live state of a charging session

use serde::{Deserialize, Serialize};

/// Current or most recent session on a connector.
///
/// The backend omits this entirely when there is no active or recent session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChargePointLiveState {
    #[serde(rename = "transactionId")]
    pub transaction_id: i64,
    pub timestamp: String,
    pub status: String,
    #[serde(rename = "consumedWh")]
    pub consumed_wh: f64,
    pub started: String,
    #[serde(rename = "postponedUntil")]
    pub postponed_until: String,
    #[serde(rename = "soC")]
    pub state_of_charge: i64,
    #[serde(rename = "chargingPlan", default)]
    pub charging_plan: Option<ChargingPlan>,
}

/// Smart charging plan attached to a session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChargingPlan {
    #[serde(rename = "boostStatus", default)]
    pub boost_status: Option<BoostStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoostStatus {
    #[serde(rename = "isBoosted")]
    pub is_boosted: bool,
}

impl ChargePointLiveState {
    /// Energy delivered in this session, in kWh rounded to two decimals
    pub fn session_kwh(&self) -> f64 {
        (self.consumed_wh / 1_000.0 * 100.0).round() / 100.0
    }

    /// Whether the session currently bypasses smart charging
    pub fn is_boosted(&self) -> bool {
        self.charging_plan
            .as_ref()
            .and_then(|p| p.boost_status.as_ref())
            .is_some_and(|b| b.is_boosted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{parse, Envelope};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn session(plan: serde_json::Value) -> serde_json::Value {
        json!({
            "transactionId": 5,
            "timestamp": "2024-03-01T10:00:00Z",
            "status": "Charging",
            "consumedWh": 12345.0,
            "started": "2024-03-01T08:00:00Z",
            "postponedUntil": "",
            "soC": 64,
            "chargingPlan": plan
        })
    }

    #[test]
    fn test_absent_state_is_not_an_error() {
        let env: Envelope<Option<ChargePointLiveState>> = parse(
            "ChargePointLiveState",
            json!({"status": false, "statusMessage": "No transaction", "timestamp": "t", "data": null}),
        )
        .unwrap();
        assert!(env.data.is_none());
    }

    #[test]
    fn test_boost_and_session_energy() {
        let state: ChargePointLiveState = parse(
            "ChargePointLiveState",
            json!({
                "transactionId": 5,
                "timestamp": "2024-03-01T10:00:00Z",
                "status": "Charging",
                "consumedWh": 12345.0,
                "started": "2024-03-01T08:00:00Z",
                "postponedUntil": "",
                "soC": 64,
                "chargingPlan": {"boostStatus": {"isBoosted": true}, "slots": []}
            }),
        )
        .unwrap();
        assert!(state.is_boosted());
        assert_eq!(state.session_kwh(), 12.35);
        assert_eq!(state.state_of_charge, 64);
    }

    #[test]
    fn test_round_trip_with_and_without_plan() {
        for plan in [json!({"boostStatus": {"isBoosted": false}}), json!(null)] {
            let state: ChargePointLiveState = parse("ChargePointLiveState", session(plan)).unwrap();
            let value = serde_json::to_value(&state).unwrap();
            let again: ChargePointLiveState = parse("ChargePointLiveState", value).unwrap();
            assert_eq!(again, state);
            assert!(!again.is_boosted());
        }
    }
}

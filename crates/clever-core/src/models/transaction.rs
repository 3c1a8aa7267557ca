//! Charging history

use serde::{Deserialize, Serialize};

/// One completed charging session.
///
/// Times are epoch integers in the backend's microsecond-scaled unit; see
/// [`crate::TIMESTAMP_SCALE`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub id: String,
    #[serde(rename = "chargePointId")]
    pub charge_box_id: String,
    #[serde(rename = "transactionId")]
    pub transaction_id: i64,
    #[serde(rename = "startTimeLocal")]
    pub start_time_local: i64,
    #[serde(rename = "stopTimeLocal")]
    pub stop_time_local: i64,
    #[serde(rename = "startTimeUtc")]
    pub start_time_utc: i64,
    #[serde(rename = "stopTimeUtc")]
    pub stop_time_utc: i64,
    #[serde(rename = "kWh")]
    pub kwh: f64,
}

/// Payload of the consumption history endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionHistory {
    #[serde(rename = "isDelta")]
    pub is_delta: bool,
    #[serde(rename = "consumptionRecords")]
    pub records: Vec<TransactionRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn record_json() -> serde_json::Value {
        json!({
            "id": "a1",
            "chargePointId": "1456125",
            "transactionId": 991,
            "startTimeLocal": 1_700_000_000_000_000_i64,
            "stopTimeLocal": 1_700_003_600_000_000_i64,
            "startTimeUtc": 1_699_996_400_000_000_i64,
            "stopTimeUtc": 1_700_000_000_000_000_i64,
            "kWh": 11.4,
            "priceDkk": 42.0,
            "location": {"name": "Home"}
        })
    }

    #[test]
    fn test_parse_ignores_unknown_fields() {
        let record: TransactionRecord = parse("TransactionRecord", record_json()).unwrap();
        assert_eq!(record.charge_box_id, "1456125");
        assert_eq!(record.kwh, 11.4);
    }

    #[test]
    fn test_reserialize_keeps_backend_names() {
        let record: TransactionRecord = parse("TransactionRecord", record_json()).unwrap();
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("chargePointId").is_some());
        assert!(value.get("kWh").is_some());
        let again: TransactionRecord = parse("TransactionRecord", value).unwrap();
        assert_eq!(again, record);
    }

    #[test]
    fn test_wrong_type_names_field() {
        let mut value = record_json();
        value["kWh"] = json!("lots");
        let err = parse::<TransactionRecord>("TransactionRecord", value).unwrap_err();
        assert_eq!(
            err.message,
            "kWh: invalid type: string \"lots\", expected f64"
        );
    }

    #[test]
    fn test_wrong_type_in_history_names_record() {
        let mut bad = record_json();
        bad["kWh"] = json!("lots");
        let value = json!({
            "isDelta": false,
            "consumptionRecords": [record_json(), record_json(), record_json(), bad]
        });
        let err = parse::<TransactionHistory>("TransactionHistory", value).unwrap_err();
        assert!(
            err.message.starts_with("consumptionRecords[3].kWh: invalid type"),
            "{}",
            err.message
        );
    }
}

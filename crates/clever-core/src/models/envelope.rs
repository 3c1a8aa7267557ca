//! Response envelope shared by every backend endpoint

use serde::{Deserialize, Serialize};

/// Standard response wrapper: `{status, statusMessage, timestamp, data}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub status: bool,
    #[serde(rename = "statusMessage")]
    pub status_message: String,
    pub timestamp: String,
    pub data: T,
}

/// Envelope of endpoints whose payload carries no data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub status: bool,
    #[serde(rename = "statusMessage")]
    pub status_message: String,
    pub timestamp: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse;
    use serde_json::json;

    #[test]
    fn test_optional_data_absent() {
        let env: Envelope<Option<String>> = parse(
            "ApiKey",
            json!({"status": false, "statusMessage": "Unknown secret", "timestamp": "t"}),
        )
        .unwrap();
        assert_eq!(env.data, None);
        assert_eq!(env.status_message, "Unknown secret");
    }

    #[test]
    fn test_missing_status_message_is_schema_error() {
        let err = parse::<Acknowledgement>("Acknowledgement", json!({"status": true, "timestamp": "t"}))
            .unwrap_err();
        assert_eq!(err.entity, "Acknowledgement");
        assert!(err.message.contains("statusMessage"), "{}", err.message);
    }
}

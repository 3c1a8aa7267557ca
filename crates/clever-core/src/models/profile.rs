//! Customer profile

use serde::{Deserialize, Serialize};

/// Identity and connector capabilities of a customer.
///
/// `customer_id` is stable and used as the external identity of the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub id: String,
    #[serde(rename = "chAdeMO")]
    pub chademo: bool,
    pub ccs: bool,
    #[serde(rename = "type2Slow")]
    pub type2_slow: bool,
    #[serde(rename = "type2Fast")]
    pub type2_fast: bool,
    #[serde(rename = "customerId")]
    pub customer_id: String,
    #[serde(rename = "appPushToken")]
    pub app_push_token: String,
    #[serde(rename = "carModel")]
    pub car_model: String,
    #[serde(rename = "carMake")]
    pub car_make: String,
    #[serde(rename = "carTypeId")]
    pub car_type_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_round_trip_keeps_backend_names() {
        let profile: UserProfile = parse(
            "UserProfile",
            json!({
                "firstname": "Ada",
                "lastname": "Lovelace",
                "email": "ev@example.com",
                "id": "u-1",
                "chAdeMO": false,
                "ccs": true,
                "type2Slow": true,
                "type2Fast": false,
                "customerId": "C-1001",
                "appPushToken": "",
                "carModel": "Model Y",
                "carMake": "Tesla",
                "carTypeId": "42",
                "marketingConsent": true
            }),
        )
        .unwrap();
        let value = serde_json::to_value(&profile).unwrap();
        assert_eq!(value["chAdeMO"], false);
        assert_eq!(value["customerId"], "C-1001");
        let again: UserProfile = parse("UserProfile", value).unwrap();
        assert_eq!(again, profile);
    }
}

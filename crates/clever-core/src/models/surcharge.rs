//! Energy surcharge (energitillæg)

use serde::{Deserialize, Serialize};

/// Per-kWh surcharge estimated for a billing period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnergySurcharge {
    #[serde(rename = "startDate")]
    pub start_date: String,
    #[serde(rename = "endDate")]
    pub end_date: String,
    #[serde(rename = "energySurchargePriceDkk")]
    pub price_dkk_per_kwh: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::parse;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_round_trip() {
        let surcharge: EnergySurcharge = parse(
            "EnergySurcharge",
            json!({
                "startDate": "2024-03-01",
                "endDate": "2024-03-31",
                "energySurchargePriceDkk": 0.7125,
                "currency": "DKK"
            }),
        )
        .unwrap();
        assert_eq!(surcharge.price_dkk_per_kwh, 0.7125);
        let again: EnergySurcharge =
            parse("EnergySurcharge", serde_json::to_value(&surcharge).unwrap()).unwrap();
        assert_eq!(again, surcharge);
    }
}

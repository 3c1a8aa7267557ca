//! Backend URL templates
//!
//! Every endpoint is a fixed template with named parameters. Path parameters
//! are inserted as single percent-encoded segments and query parameters are
//! form-encoded, so caller-supplied values can never change the route.
//! Empty segments reproduce the doubled slashes the official mobile app sends.

use reqwest::Method;
use url::Url;

use crate::error::Result;

/// Identifies one connector on one charge box for a given account
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChargePointPath<'a> {
    pub api_key: &'a str,
    pub box_id: &'a str,
    pub connector_id: u32,
}

/// Every backend operation this client performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint<'a> {
    VerifyEmail { email: &'a str },
    VerifySignupToken { token: &'a str, email: &'a str },
    RegisterProfile,
    LoginWithSecretCode { secret: &'a str, email: &'a str },
    Profile { api_key: &'a str },
    ConsumptionHistory { api_key: &'a str },
    Installations { api_key: &'a str },
    EnergySurcharge { api_key: &'a str },
    ChargePointState(ChargePointPath<'a>),
    FlexMigrate(ChargePointPath<'a>),
    FlexEnable(ChargePointPath<'a>),
    FlexRange(ChargePointPath<'a>),
    FlexSchedule(ChargePointPath<'a>),
    Preheat { charge_point: ChargePointPath<'a>, enable: bool },
    Boost(ChargePointPath<'a>),
    TimedBoost(ChargePointPath<'a>),
    Unboost(ChargePointPath<'a>),
}

impl<'a> Endpoint<'a> {
    /// Stable name used in logs; never contains credentials
    pub fn name(&self) -> &'static str {
        match self {
            Self::VerifyEmail { .. } => "verify_email",
            Self::VerifySignupToken { .. } => "verify_signup_token",
            Self::RegisterProfile => "register_profile",
            Self::LoginWithSecretCode { .. } => "login_with_secret_code",
            Self::Profile { .. } => "profile",
            Self::ConsumptionHistory { .. } => "consumption_history",
            Self::Installations { .. } => "installations",
            Self::EnergySurcharge { .. } => "energy_surcharge",
            Self::ChargePointState(_) => "charge_point_state",
            Self::FlexMigrate(_) => "flex_migrate",
            Self::FlexEnable(_) => "flex_enable",
            Self::FlexRange(_) => "flex_range",
            Self::FlexSchedule(_) => "flex_schedule",
            Self::Preheat { .. } => "preheat",
            Self::Boost(_) => "boost",
            Self::TimedBoost(_) => "timebox_boost",
            Self::Unboost(_) => "unboost",
        }
    }

    pub fn method(&self) -> Method {
        match self {
            Self::VerifyEmail { .. }
            | Self::VerifySignupToken { .. }
            | Self::LoginWithSecretCode { .. }
            | Self::Profile { .. }
            | Self::ConsumptionHistory { .. }
            | Self::Installations { .. }
            | Self::EnergySurcharge { .. }
            | Self::ChargePointState(_) => Method::GET,
            Self::RegisterProfile
            | Self::FlexMigrate(_)
            | Self::FlexEnable(_)
            | Self::FlexRange(_)
            | Self::FlexSchedule(_)
            | Self::Preheat { .. }
            | Self::Boost(_)
            | Self::TimedBoost(_)
            | Self::Unboost(_) => Method::POST,
        }
    }

    fn segments(&self) -> Vec<String> {
        match *self {
            Self::VerifyEmail { .. } => fixed(&["api", "mobile", "customer", "verifyEmail"]),
            Self::VerifySignupToken { .. } => {
                fixed(&["api", "mobile", "customer", "verifySignupToken"])
            }
            Self::RegisterProfile => fixed(&["api", "", "v2", "customer", "registerProfile"]),
            Self::LoginWithSecretCode { .. } => {
                fixed(&["api", "mobile", "customer", "loginWithSecretCode"])
            }
            Self::Profile { api_key } => fixed(&["api", "", "v2", "customer", api_key, "getProfile"]),
            Self::ConsumptionHistory { api_key } => {
                fixed(&["api", "", "v2", "consumption", api_key, "history"])
            }
            Self::Installations { api_key } => fixed(&["api", "", "v3", api_key, "installations"]),
            Self::EnergySurcharge { api_key } => fixed(&[
                "api",
                "v3",
                "energysurcharge",
                api_key,
                "estimatedenergysurcharge",
            ]),
            Self::ChargePointState(cp) => {
                let connector = cp.connector_id.to_string();
                fixed(&[
                    "api",
                    "",
                    "v4",
                    "transactions",
                    cp.api_key,
                    cp.box_id,
                    "connector",
                    connector.as_str(),
                ])
            }
            Self::FlexMigrate(cp) => flex_segments(&cp, "migrate"),
            Self::FlexEnable(cp) => flex_segments(&cp, "enable"),
            Self::FlexRange(cp) => flex_segments(&cp, "range"),
            Self::FlexSchedule(cp) => flex_segments(&cp, "schedule"),
            Self::Preheat { charge_point, .. } => {
                let mut segments = smart_charging_segments(&charge_point);
                segments.extend(["settings".to_string(), "preheat".to_string()]);
                segments
            }
            Self::Boost(cp) => {
                let mut segments = smart_charging_segments(&cp);
                segments.push("boost".to_string());
                segments
            }
            Self::TimedBoost(cp) => {
                let mut segments = smart_charging_segments(&cp);
                segments.push("timebox-boost".to_string());
                segments
            }
            Self::Unboost(cp) => {
                let mut segments = smart_charging_segments(&cp);
                segments.push("unboost".to_string());
                segments
            }
        }
    }

    fn query(&self) -> Vec<(&'static str, String)> {
        match *self {
            Self::VerifyEmail { email } => vec![("email", email.to_string())],
            Self::VerifySignupToken { token, email } => {
                vec![("token", token.to_string()), ("email", email.to_string())]
            }
            Self::LoginWithSecretCode { secret, email } => {
                vec![("secret", secret.to_string()), ("email", email.to_string())]
            }
            Self::ChargePointState(cp) => vec![
                ("chargepointId", cp.box_id.to_string()),
                ("connector", cp.connector_id.to_string()),
            ],
            Self::Preheat { enable, .. } => vec![("enable", enable.to_string())],
            _ => Vec::new(),
        }
    }

    /// Full request URL relative to the backend base URL
    pub fn url(&self, base_url: &Url) -> Result<Url> {
        let mut url = base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| url::ParseError::RelativeUrlWithCannotBeABaseBase)?;
            path.pop_if_empty();
            path.extend(self.segments());
        }

        let query = self.query();
        if query.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(query);
        }

        Ok(url)
    }
}

fn fixed(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn flex_segments(cp: &ChargePointPath<'_>, action: &str) -> Vec<String> {
    let connector = cp.connector_id.to_string();
    fixed(&[
        "api",
        "",
        "v3",
        "flex",
        cp.api_key,
        "chargepoints",
        cp.box_id,
        "connectors",
        connector.as_str(),
        action,
    ])
}

fn smart_charging_segments(cp: &ChargePointPath<'_>) -> Vec<String> {
    let connector = cp.connector_id.to_string();
    fixed(&[
        "api",
        "",
        "v4",
        "smartcharging",
        cp.api_key,
        "chargePoints",
        cp.box_id,
        "connectors",
        connector.as_str(),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://mobileapp-backend.clever.dk").unwrap()
    }

    fn cp() -> ChargePointPath<'static> {
        ChargePointPath {
            api_key: "KEY",
            box_id: "1456125",
            connector_id: 1,
        }
    }

    #[test]
    fn test_charge_point_state_url() {
        let url = Endpoint::ChargePointState(cp()).url(&base()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://mobileapp-backend.clever.dk/api//v4/transactions/KEY/1456125/connector/1?chargepointId=1456125&connector=1"
        );
    }

    #[test]
    fn test_preheat_url_carries_flag() {
        let url = Endpoint::Preheat {
            charge_point: cp(),
            enable: false,
        }
        .url(&base())
        .unwrap();
        assert_eq!(
            url.as_str(),
            "https://mobileapp-backend.clever.dk/api//v4/smartcharging/KEY/chargePoints/1456125/connectors/1/settings/preheat?enable=false"
        );
    }

    #[test]
    fn test_query_values_are_encoded() {
        let url = Endpoint::VerifyEmail {
            email: "ev+home@example.com",
        }
        .url(&base())
        .unwrap();
        assert_eq!(url.query(), Some("email=ev%2Bhome%40example.com"));
    }

    #[test]
    fn test_path_values_cannot_escape_segment() {
        let url = Endpoint::Profile {
            api_key: "../../admin?x=1",
        }
        .url(&base())
        .unwrap();
        assert_eq!(url.query(), None);
        assert!(url.path().starts_with("/api//v2/customer/"));
        assert!(url.path().ends_with("/getProfile"));
        assert!(!url.path().contains("/admin"));
    }

    #[test]
    fn test_base_url_with_prefix() {
        let base = Url::parse("http://127.0.0.1:8080/proxy/").unwrap();
        let url = Endpoint::RegisterProfile.url(&base).unwrap();
        assert_eq!(url.path(), "/proxy/api//v2/customer/registerProfile");
    }

    #[test]
    fn test_methods() {
        assert_eq!(Endpoint::ChargePointState(cp()).method(), Method::GET);
        assert_eq!(Endpoint::Unboost(cp()).method(), Method::POST);
        assert_eq!(Endpoint::RegisterProfile.method(), Method::POST);
    }
}

//! Onboarding payloads and the credentials they produce

use std::fmt;

use serde::{Deserialize, Serialize};

/// Value of `result` once the emailed link has been accepted
pub const VERIFIED: &str = "Verified";

/// Sentinel the backend returns in place of a user secret on rejection
pub const NULL_SECRET: &str = "null";

/// Payload of `verifySignupToken`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignupVerification {
    pub result: String,
    #[serde(rename = "firstName", default)]
    pub first_name: Option<String>,
    #[serde(rename = "lastName", default)]
    pub last_name: Option<String>,
}

impl SignupVerification {
    pub fn is_verified(&self) -> bool {
        self.result == VERIFIED
    }
}

/// Payload of `registerProfile`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileRegistration {
    #[serde(rename = "userSecret")]
    pub user_secret: String,
    #[serde(rename = "verificationResponse", default)]
    pub verification_response: Option<VerificationResponse>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationResponse {
    pub result: String,
}

impl ProfileRegistration {
    /// Whether the backend refused the registration
    pub fn is_rejected(&self) -> bool {
        self.user_secret == NULL_SECRET
    }

    /// The backend's reason for rejecting the registration
    pub fn rejection_reason(&self) -> String {
        self.verification_response
            .as_ref()
            .map(|r| r.result.clone())
            .unwrap_or_else(|| "profile registration rejected".to_string())
    }
}

/// Account credentials minted by onboarding.
///
/// `api_token` is the long-lived per-user secret; `api_key` is re-derived from
/// it on every re-authentication and is the value embedded in request paths.
/// The host persists these; nothing in this workspace stores them.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub api_token: String,
    pub api_key: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("api_token", &"<redacted>")
            .field("api_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_debug_hides_secrets() {
        let creds = Credentials {
            email: "ev@example.com".to_string(),
            api_token: "secret-token".to_string(),
            api_key: "secret-key".to_string(),
        };
        let printed = format!("{:?}", creds);
        assert!(printed.contains("ev@example.com"));
        assert!(!printed.contains("secret-token"));
        assert!(!printed.contains("secret-key"));
    }

    #[test]
    fn test_rejection_reason_falls_back() {
        let reg = ProfileRegistration {
            user_secret: NULL_SECRET.to_string(),
            verification_response: None,
        };
        assert!(reg.is_rejected());
        assert_eq!(reg.rejection_reason(), "profile registration rejected");
    }
}

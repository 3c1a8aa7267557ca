//! Onboarding handshake: email address to API credentials
//!
//! Four strictly sequential steps, each modelled as a value that only the
//! previous step can produce:
//!
//! 1. [`AuthClient::send_auth_email`] asks the backend to email a link
//! 2. [`AwaitingLink::verify_link`] exchanges the link's secret code
//! 3. [`LinkVerified::register`] registers the profile for a user secret
//! 4. [`ProfileRegistered::obtain_credentials`] trades the secret for an API key
//!
//! Re-authentication repeats step 4 only, see [`AuthClient::reauthenticate`].

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{info, instrument};
use url::Url;

use clever_core::{
    parse, Acknowledgement, Credentials, Envelope, ProfileRegistration, SchemaError,
    SignupVerification,
};

use crate::endpoint::Endpoint;
use crate::error::{CleverClientError, Result};
use crate::transport::Transport;

/// Query parameter of the emailed link that carries the secret code
const SECRET_CODE_PARAM: &str = "secretCode";

/// Extract the secret code from an emailed confirmation link
pub fn extract_secret_code(link: &str) -> Result<String> {
    let url = Url::parse(link.trim())
        .map_err(|e| CleverClientError::InvalidLink(format!("{}: {}", link, e)))?;
    url.query_pairs()
        .find(|(key, _)| key == SECRET_CODE_PARAM)
        .map(|(_, value)| value.into_owned())
        .filter(|code| !code.is_empty())
        .ok_or_else(|| {
            CleverClientError::InvalidLink(format!("no {} parameter in link", SECRET_CODE_PARAM))
        })
}

#[derive(Debug, Serialize)]
struct RegisterProfileBody<'a> {
    email: &'a str,
    #[serde(rename = "firstName")]
    first_name: &'a str,
    #[serde(rename = "lastName")]
    last_name: &'a str,
    token: &'a str,
}

/// Runs the individual handshake calls
#[derive(Debug, Clone)]
pub struct AuthClient {
    transport: Arc<Transport>,
}

impl AuthClient {
    pub fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Step 1: have the backend email a confirmation link
    #[instrument(skip(self))]
    pub async fn send_auth_email(&self, email: &str) -> Result<AwaitingLink> {
        let payload = self.transport.call(&Endpoint::VerifyEmail { email }, None).await?;
        let ack: Acknowledgement = parse("Acknowledgement", payload)?;
        info!(status = ack.status, "Confirmation email requested");
        Ok(AwaitingLink {
            email: email.to_string(),
        })
    }

    /// Step 2 as a single call. Fails with [`CleverClientError::Clever`]
    /// unless the backend reports the link as `Verified`.
    #[instrument(skip(self, link))]
    pub async fn verify_link(&self, link: &str, email: &str) -> Result<LinkVerified> {
        let secret_code = extract_secret_code(link)?;
        let payload = self
            .transport
            .call(
                &Endpoint::VerifySignupToken {
                    token: &secret_code,
                    email,
                },
                None,
            )
            .await?;

        let envelope: Envelope<SignupVerification> = parse("SignupVerification", payload)?;
        let verification = envelope.data;
        if !verification.is_verified() {
            return Err(CleverClientError::Clever(verification.result));
        }

        let first_name = verification
            .first_name
            .ok_or_else(|| SchemaError::missing_field("SignupVerification", "firstName"))?;
        let last_name = verification
            .last_name
            .ok_or_else(|| SchemaError::missing_field("SignupVerification", "lastName"))?;

        info!("Confirmation link verified");
        Ok(LinkVerified {
            email: email.to_string(),
            secret_code,
            first_name,
            last_name,
        })
    }

    /// Step 3 as a single call. Fails with the backend's reason when the
    /// returned secret is the `"null"` sentinel.
    #[instrument(skip(self, secret_code))]
    pub async fn obtain_user_secret(
        &self,
        email: &str,
        first_name: &str,
        last_name: &str,
        secret_code: &str,
    ) -> Result<String> {
        let body = serde_json::to_value(RegisterProfileBody {
            email,
            first_name,
            last_name,
            token: secret_code,
        })
        .map_err(|e| SchemaError::new("RegisterProfile", e.to_string()))?;

        let payload = self
            .transport
            .call(&Endpoint::RegisterProfile, Some(&body))
            .await?;
        let envelope: Envelope<ProfileRegistration> = parse("ProfileRegistration", payload)?;
        let registration = envelope.data;
        if registration.is_rejected() {
            return Err(CleverClientError::Clever(registration.rejection_reason()));
        }

        info!("Profile registered");
        Ok(registration.user_secret)
    }

    /// Step 4 as a single call: exchange the long-lived user secret for a
    /// fresh API key. Fails when the response carries no data.
    #[instrument(skip(self, user_secret))]
    pub async fn obtain_api_token(&self, user_secret: &str, email: &str) -> Result<String> {
        let payload = self
            .transport
            .call(
                &Endpoint::LoginWithSecretCode {
                    secret: user_secret,
                    email,
                },
                None,
            )
            .await?;
        let envelope: Envelope<Option<Value>> = parse("ApiToken", payload)?;
        match envelope.data {
            None | Some(Value::Null) => Err(CleverClientError::Clever(envelope.status_message)),
            Some(Value::String(api_key)) => Ok(api_key),
            Some(other) => Err(SchemaError::new(
                "ApiToken",
                format!("invalid type for `data`: expected a string, got {}", other),
            )
            .into()),
        }
    }

    /// Refresh an expired API key from stored credentials. Only step 4 runs.
    pub async fn reauthenticate(&self, credentials: &Credentials) -> Result<Credentials> {
        let api_key = self
            .obtain_api_token(&credentials.api_token, &credentials.email)
            .await?;
        info!(email = %credentials.email, "Re-authenticated");
        Ok(Credentials {
            email: credentials.email.clone(),
            api_token: credentials.api_token.clone(),
            api_key,
        })
    }
}

/// Handshake after step 1: waiting for the user to paste the emailed link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AwaitingLink {
    email: String,
}

impl AwaitingLink {
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Step 2
    pub async fn verify_link(self, auth: &AuthClient, link: &str) -> Result<LinkVerified> {
        auth.verify_link(link, &self.email).await
    }
}

/// Handshake after step 2
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkVerified {
    email: String,
    secret_code: String,
    first_name: String,
    last_name: String,
}

impl LinkVerified {
    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Step 3
    pub async fn register(self, auth: &AuthClient) -> Result<ProfileRegistered> {
        let user_secret = auth
            .obtain_user_secret(
                &self.email,
                &self.first_name,
                &self.last_name,
                &self.secret_code,
            )
            .await?;
        Ok(ProfileRegistered {
            email: self.email,
            user_secret,
        })
    }
}

/// Handshake after step 3
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileRegistered {
    email: String,
    user_secret: String,
}

impl ProfileRegistered {
    /// Step 4. The returned credentials are for the host to persist.
    pub async fn obtain_credentials(self, auth: &AuthClient) -> Result<Credentials> {
        let api_key = auth.obtain_api_token(&self.user_secret, &self.email).await?;
        info!(email = %self.email, "Onboarding complete");
        Ok(Credentials {
            email: self.email,
            api_token: self.user_secret,
            api_key,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_secret_code() {
        let code = extract_secret_code(
            "https://clever.dk/app/verify?email=ev%40example.com&secretCode=ABC123",
        )
        .unwrap();
        assert_eq!(code, "ABC123");
    }

    #[test]
    fn test_extract_secret_code_missing() {
        assert!(matches!(
            extract_secret_code("https://clever.dk/app/verify?email=ev%40example.com"),
            Err(CleverClientError::InvalidLink(_))
        ));
        assert!(matches!(
            extract_secret_code("not a link"),
            Err(CleverClientError::InvalidLink(_))
        ));
    }
}

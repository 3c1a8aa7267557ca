//! Login and reauth commands

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use clever_client::{AuthClient, CleverClient, ClientConfig, Transport};

use super::Account;
use crate::config::{AccountConfig, ChargePointConfig};
use crate::output::OutputContext;

/// Charge point to bind at login
pub struct ChargePointChoice {
    pub box_id: Option<String>,
    pub connector_id: u32,
}

/// Run the email handshake and save the resulting credentials
pub async fn login(
    client_config: ClientConfig,
    email: &str,
    choice: ChargePointChoice,
    subscription_fee: f64,
    config_path: Option<&Path>,
    ctx: &OutputContext,
) -> Result<()> {
    let transport = Arc::new(
        Transport::new(client_config.clone()).context("Failed to create Clever client")?,
    );
    let outcome = handshake(&transport, email, ctx).await;
    let credentials = match outcome {
        Ok(credentials) => credentials,
        Err(e) => {
            transport.close();
            return Err(e);
        }
    };

    let mut config = AccountConfig::new(credentials, client_config);
    config.subscription_fee = subscription_fee;

    let account = Account::open(config, config_path.map(Path::to_path_buf))?;
    let charge_point = match choice.box_id {
        Some(box_id) => Some(ChargePointConfig {
            box_id,
            connector_id: choice.connector_id,
        }),
        None => discover_charge_point(&account.client(), ctx).await?,
    };

    let mut config = account.config.clone();
    config.charge_point = charge_point;
    let path = config.save(config_path)?;
    ctx.success(&format!("Logged in, configuration saved to {}", path.display()));
    Ok(())
}

async fn handshake(
    transport: &Arc<Transport>,
    email: &str,
    ctx: &OutputContext,
) -> Result<clever_core::Credentials> {
    let auth = AuthClient::new(transport.clone());

    let pending = auth
        .send_auth_email(email)
        .await
        .context("Failed to request confirmation email")?;
    ctx.info(&format!("A confirmation link was sent to {}", pending.email()));

    let link = prompt("Paste the link from the email: ").await?;
    let verified = pending
        .verify_link(&auth, &link)
        .await
        .context("Confirmation link was not accepted")?;
    ctx.info(&format!(
        "Verified {} {}",
        verified.first_name(),
        verified.last_name()
    ));

    let registered = verified
        .register(&auth)
        .await
        .context("Profile registration failed")?;
    registered
        .obtain_credentials(&auth)
        .await
        .context("Failed to obtain API key")
}

/// Offer the first installation of the account as the bound charge point
async fn discover_charge_point(
    client: &CleverClient,
    ctx: &OutputContext,
) -> Result<Option<ChargePointConfig>> {
    let installations = client
        .get_installations()
        .await
        .context("Failed to read installations")?;
    debug!(count = installations.len(), "Installations found");

    match installations.into_iter().next() {
        Some(installation) => {
            ctx.info(&format!(
                "Using charge box {} connector {}",
                installation.charge_box_id, installation.connector_id
            ));
            Ok(Some(ChargePointConfig {
                box_id: installation.charge_box_id,
                connector_id: installation.connector_id,
            }))
        }
        None => {
            ctx.warn("No home charger found, only account readouts are available");
            Ok(None)
        }
    }
}

/// Exchange the saved user secret for a fresh API key
pub async fn reauth(account: &Account, ctx: &OutputContext) -> Result<()> {
    let auth = AuthClient::new(account.transport.clone());
    let credentials = auth
        .reauthenticate(&account.config.credentials())
        .await
        .context("Re-authentication failed")?;

    let mut config = account.config.clone();
    config.update_credentials(credentials);
    let path = config.save(account.config_path.as_deref())?;
    ctx.success(&format!("API key refreshed in {}", path.display()));
    Ok(())
}

async fn prompt(message: &str) -> Result<String> {
    use std::io::Write;

    print!("{}", message);
    std::io::stdout().flush().context("Failed to write prompt")?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let line = lines
        .next_line()
        .await
        .context("Failed to read input")?
        .context("No input given")?;
    Ok(line.trim().to_string())
}

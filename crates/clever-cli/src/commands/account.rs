//! Profile and installations commands

use anyhow::{Context, Result};

use super::Account;
use crate::output::{InstallationRow, OutputContext};

/// Show the customer profile
pub async fn profile(account: &Account, ctx: &OutputContext) -> Result<()> {
    let profile = account
        .client()
        .get_user_info()
        .await
        .context("Failed to read profile")?;

    ctx.print_kv(&[
        ("Name", format!("{} {}", profile.firstname, profile.lastname)),
        ("Email", profile.email),
        ("Customer", profile.customer_id),
        ("Car", format!("{} {}", profile.car_make, profile.car_model)),
        ("CCS", profile.ccs.to_string()),
        ("CHAdeMO", profile.chademo.to_string()),
        ("Type 2", profile.type2_slow.to_string()),
    ]);
    Ok(())
}

/// List the charge points installed for the account
pub async fn installations(account: &Account, ctx: &OutputContext) -> Result<()> {
    let installations = account
        .client()
        .get_installations()
        .await
        .context("Failed to read installations")?;

    let rows: Vec<InstallationRow> = installations
        .into_iter()
        .map(|i| InstallationRow {
            smart_charging: (if i.smart_charging_enabled() { "on" } else { "off" }).to_string(),
            installation_id: i.installation_id,
            box_id: i.charge_box_id,
            connector_id: i.connector_id,
        })
        .collect();

    ctx.print(&rows);
    Ok(())
}

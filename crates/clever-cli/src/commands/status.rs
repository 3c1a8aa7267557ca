//! Status command - one refresh, then the readouts

use anyhow::{Context, Result};
use clever_coordinator::Readout;

use super::Account;
use crate::output::OutputContext;

/// Show readouts of the charge point, or of the account when none is bound
pub async fn status(account: &Account, selection: &[Readout], ctx: &OutputContext) -> Result<()> {
    match account.charge_point_coordinator() {
        Some(coordinator) => {
            let snapshot = coordinator
                .first_refresh()
                .await
                .context("Failed to read charge point")?;
            ctx.print_readouts(&snapshot, &select(Readout::CHARGE_POINT, selection));
        }
        None => {
            let snapshot = account
                .subscription_coordinator()
                .first_refresh()
                .await
                .context("Failed to read subscription")?;
            ctx.print_readouts(&snapshot, &select(Readout::SUBSCRIPTION, selection));
        }
    }
    Ok(())
}

/// Readouts of `available` that were asked for, all of them when none were
pub fn select(available: &[Readout], selection: &[Readout]) -> Vec<Readout> {
    available
        .iter()
        .copied()
        .filter(|r| selection.is_empty() || selection.contains(r))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_select() {
        assert_eq!(select(Readout::SUBSCRIPTION, &[]), Readout::SUBSCRIPTION.to_vec());
        assert_eq!(
            select(Readout::SUBSCRIPTION, &[Readout::Boosted, Readout::LastCharge]),
            vec![Readout::LastCharge]
        );
    }
}

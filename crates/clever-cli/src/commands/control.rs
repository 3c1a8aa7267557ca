//! Charge point commands
//!
//! Every command waits for the backend to apply the change, then refreshes
//! and prints the readouts it affects.

use std::future::Future;

use anyhow::{Context, Result};
use clap::ValueEnum;

use clever_client::ChargePoint;
use clever_coordinator::Readout;
use clever_core::{DepartureTime, FlexRequest};

use super::Account;
use crate::output::OutputContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

impl Toggle {
    fn enabled(self) -> bool {
        self == Self::On
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BoostMode {
    /// Charge at full power until switched off
    On,
    /// Charge at full power for 30 minutes
    Timed,
    /// Return to smart charging
    Off,
}

async fn run<F, Fut>(
    account: &Account,
    ctx: &OutputContext,
    done: &str,
    affected: &[Readout],
    command: F,
) -> Result<()>
where
    F: FnOnce(ChargePoint) -> Fut,
    Fut: Future<Output = clever_client::Result<()>>,
{
    let coordinator = account.require_charge_point()?;
    let spinner = ctx.spinner("Waiting for the charger...");
    let outcome = coordinator
        .execute(account.config.coordinator.settle_delay(), command)
        .await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let outcome = outcome.context("Command failed")?;
    ctx.success(done);
    if let Some(e) = &outcome.refresh_error {
        ctx.warn(&format!(
            "Command was accepted, but reading back the charger failed: {}",
            e
        ));
    }
    if let Some(snapshot) = &outcome.snapshot {
        ctx.print_readouts(snapshot, affected);
    }
    Ok(())
}

/// Enable flex charging with a full schedule, or disable it
pub async fn flex(
    account: &Account,
    enable: bool,
    phase_count: Option<u8>,
    departure: Option<&str>,
    range_kwh: Option<u32>,
    ctx: &OutputContext,
) -> Result<()> {
    let request = FlexRequest::from_parts(enable, phase_count, departure, range_kwh)?;
    let done = if request.is_enable() {
        "Flex charging enabled"
    } else {
        "Flex charging disabled"
    };
    run(
        account,
        ctx,
        done,
        &[
            Readout::SmartCharging,
            Readout::PlannedDeparture,
            Readout::DesiredRange,
            Readout::ConfiguredEffect,
        ],
        |cp| async move { cp.set_flex(&request).await },
    )
    .await
}

pub async fn departure(account: &Account, time: DepartureTime, ctx: &OutputContext) -> Result<()> {
    run(
        account,
        ctx,
        &format!("Departure set to {}", time),
        &[Readout::PlannedDeparture],
        |cp| async move { cp.set_departure_time(time).await },
    )
    .await
}

pub async fn range(account: &Account, kwh: u32, ctx: &OutputContext) -> Result<()> {
    run(
        account,
        ctx,
        &format!("Desired range set to {} kWh", kwh),
        &[Readout::DesiredRange],
        |cp| async move { cp.set_desired_range_kwh(kwh).await },
    )
    .await
}

pub async fn preheat(account: &Account, state: Toggle, ctx: &OutputContext) -> Result<()> {
    let enable = state.enabled();
    run(
        account,
        ctx,
        if enable { "Preheat on" } else { "Preheat off" },
        &[Readout::Preheat],
        |cp| async move { cp.set_climate_preheat(enable).await },
    )
    .await
}

pub async fn boost(account: &Account, mode: BoostMode, ctx: &OutputContext) -> Result<()> {
    let done = match mode {
        BoostMode::On => "Boost on",
        BoostMode::Timed => "Boost on for 30 minutes",
        BoostMode::Off => "Boost off",
    };
    run(
        account,
        ctx,
        done,
        &[Readout::Boosted, Readout::ChargerStatus],
        |cp| async move {
            match mode {
                BoostMode::On => cp.set_unlimited_boost(true).await,
                BoostMode::Timed => cp.set_timed_boost().await,
                BoostMode::Off => cp.disable_boost().await,
            }
        },
    )
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flex_enable_needs_schedule() {
        assert!(FlexRequest::from_parts(true, Some(3), None, Some(20)).is_err());
        assert!(FlexRequest::from_parts(true, Some(3), Some("06:30"), Some(20))
            .unwrap()
            .is_enable());
    }

    #[test]
    fn test_toggle() {
        assert!(Toggle::On.enabled());
        assert!(!Toggle::Off.enabled());
    }
}

//! Closed table of values derived from a published snapshot
//!
//! Each [`Readout`] has a stable key and a value function over a
//! [`ReadoutSource`]. Charge point readouts evaluated against a subscription
//! snapshot see no session and no installation.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset};

use clever_core::{
    ChargePointInstallation, ChargePointLiveState, ConsumptionAggregate, EnergySurcharge,
};

use crate::charge_point::ChargePointSnapshot;
use crate::subscription::SubscriptionSnapshot;

/// Charger status shown when there is no session
pub const UNPLUGGED: &str = "Unplugged";

/// Snapshot data the readouts are computed from
pub trait ReadoutSource {
    fn consumption(&self) -> &ConsumptionAggregate;
    fn surcharge(&self) -> &EnergySurcharge;
    fn subscription_fee(&self) -> f64;

    fn live_state(&self) -> Option<&ChargePointLiveState> {
        None
    }

    fn installation(&self) -> Option<&ChargePointInstallation> {
        None
    }
}

impl ReadoutSource for SubscriptionSnapshot {
    fn consumption(&self) -> &ConsumptionAggregate {
        &self.consumption
    }

    fn surcharge(&self) -> &EnergySurcharge {
        &self.surcharge
    }

    fn subscription_fee(&self) -> f64 {
        self.subscription_fee
    }
}

impl ReadoutSource for ChargePointSnapshot {
    fn consumption(&self) -> &ConsumptionAggregate {
        &self.consumption
    }

    fn surcharge(&self) -> &EnergySurcharge {
        &self.surcharge
    }

    fn subscription_fee(&self) -> f64 {
        self.subscription_fee
    }

    fn live_state(&self) -> Option<&ChargePointLiveState> {
        self.state.as_ref()
    }

    fn installation(&self) -> Option<&ChargePointInstallation> {
        self.installation.as_ref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Readout {
    KwhThisMonth,
    KwhThisMonthBox,
    LastCharge,
    EnergySurcharge,
    SubscriptionFee,
    ChargerStatus,
    SessionKwh,
    StateOfCharge,
    SmartCharging,
    PlannedDeparture,
    DesiredRange,
    ConfiguredEffect,
    Preheat,
    Boosted,
}

impl Readout {
    /// Readouts of the subscription coordinator
    pub const SUBSCRIPTION: &'static [Readout] = &[
        Readout::KwhThisMonth,
        Readout::LastCharge,
        Readout::EnergySurcharge,
        Readout::SubscriptionFee,
    ];

    /// Readouts of the charge point coordinator
    pub const CHARGE_POINT: &'static [Readout] = &[
        Readout::KwhThisMonth,
        Readout::KwhThisMonthBox,
        Readout::LastCharge,
        Readout::EnergySurcharge,
        Readout::SubscriptionFee,
        Readout::ChargerStatus,
        Readout::SessionKwh,
        Readout::StateOfCharge,
        Readout::SmartCharging,
        Readout::PlannedDeparture,
        Readout::DesiredRange,
        Readout::ConfiguredEffect,
        Readout::Preheat,
        Readout::Boosted,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::KwhThisMonth => "kwh_this_month",
            Self::KwhThisMonthBox => "kwh_this_month_box",
            Self::LastCharge => "last_charge",
            Self::EnergySurcharge => "energy_surcharge",
            Self::SubscriptionFee => "subscription_fee",
            Self::ChargerStatus => "charger_status",
            Self::SessionKwh => "session_kwh",
            Self::StateOfCharge => "state_of_charge",
            Self::SmartCharging => "smart_charging",
            Self::PlannedDeparture => "planned_departure",
            Self::DesiredRange => "desired_range",
            Self::ConfiguredEffect => "configured_effect",
            Self::Preheat => "preheat",
            Self::Boosted => "boosted",
        }
    }

    pub fn value<S: ReadoutSource + ?Sized>(self, source: &S) -> ReadoutValue {
        let installation = source.installation();
        let smart_charging = installation.is_some_and(|i| i.smart_charging_enabled());

        match self {
            Self::KwhThisMonth => ReadoutValue::Energy(source.consumption().kwh_this_month),
            Self::KwhThisMonthBox => source
                .consumption()
                .kwh_this_month_for_box
                .map_or(ReadoutValue::Unavailable, ReadoutValue::Energy),
            Self::LastCharge => ReadoutValue::Timestamp(source.consumption().last_charge),
            Self::EnergySurcharge => ReadoutValue::PricePerKwh(source.surcharge().price_dkk_per_kwh),
            Self::SubscriptionFee => ReadoutValue::Money(source.subscription_fee()),
            Self::ChargerStatus => ReadoutValue::Text(
                source
                    .live_state()
                    .map_or_else(|| UNPLUGGED.to_string(), |s| s.status.clone()),
            ),
            Self::SessionKwh => {
                ReadoutValue::Energy(source.live_state().map_or(0.0, |s| s.session_kwh()))
            }
            Self::StateOfCharge => source
                .live_state()
                .map_or(ReadoutValue::Unavailable, |s| {
                    ReadoutValue::Percent(s.state_of_charge)
                }),
            Self::SmartCharging => ReadoutValue::Switch(smart_charging),
            Self::PlannedDeparture => installation
                .and_then(|i| i.planned_departure())
                .map_or(ReadoutValue::Unavailable, |t| ReadoutValue::Text(t.to_string())),
            Self::DesiredRange => installation
                .and_then(|i| i.desired_range_kwh())
                .map_or(ReadoutValue::Unavailable, ReadoutValue::Energy),
            Self::ConfiguredEffect => installation
                .and_then(|i| i.configured_phase_count())
                .map_or(ReadoutValue::Unavailable, ReadoutValue::Phases),
            Self::Preheat => {
                ReadoutValue::Switch(smart_charging && installation.is_some_and(|i| i.preheat_enabled()))
            }
            Self::Boosted => ReadoutValue::Switch(
                smart_charging && source.live_state().is_some_and(|s| s.is_boosted()),
            ),
        }
    }
}

impl fmt::Display for Readout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Readout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::CHARGE_POINT
            .iter()
            .copied()
            .find(|r| r.key() == s)
            .ok_or_else(|| format!("unknown readout: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReadoutValue {
    /// kWh
    Energy(f64),
    /// DKK
    Money(f64),
    /// DKK per kWh
    PricePerKwh(f64),
    Timestamp(DateTime<FixedOffset>),
    Text(String),
    Percent(i64),
    Phases(u64),
    Switch(bool),
    Unavailable,
}

impl fmt::Display for ReadoutValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Energy(kwh) => write!(f, "{:.2} kWh", kwh),
            Self::Money(dkk) => write!(f, "{:.2} DKK", dkk),
            Self::PricePerKwh(dkk) => write!(f, "{:.4} DKK/kWh", dkk),
            Self::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S %:z")),
            Self::Text(text) => f.write_str(text),
            Self::Percent(pct) => write!(f, "{}%", pct),
            Self::Phases(n) => write!(f, "{} phase(s)", n),
            Self::Switch(true) => f.write_str("on"),
            Self::Switch(false) => f.write_str("off"),
            Self::Unavailable => f.write_str("unavailable"),
        }
    }
}

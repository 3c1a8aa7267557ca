//! Derived consumption figures

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Monthly consumption derived from a transaction history.
///
/// `kwh_this_month_for_box` is `None` when no charge box was asked about and
/// `Some(0.0)` when a box was given but had no sessions this month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsumptionAggregate {
    pub kwh_this_month: f64,
    pub kwh_this_month_for_box: Option<f64>,
    pub last_charge: DateTime<FixedOffset>,
}

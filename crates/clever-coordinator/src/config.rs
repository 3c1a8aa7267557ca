//! Polling intervals

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Refresh interval of the subscription coordinator
pub const SUBSCRIPTION_INTERVAL: Duration = Duration::from_secs(60 * 60);

/// Refresh interval of the charge point coordinator
pub const CHARGE_POINT_INTERVAL: Duration = Duration::from_secs(60);

/// Pause between a mutation and the refresh that observes it
pub const SETTLE_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoordinatorConfig {
    #[serde(default = "default_subscription_interval")]
    pub subscription_interval_secs: u64,

    #[serde(default = "default_charge_point_interval")]
    pub charge_point_interval_secs: u64,

    /// Wait after a command before forcing a refresh
    #[serde(default = "default_settle_delay")]
    pub settle_delay_secs: u64,
}

fn default_subscription_interval() -> u64 {
    SUBSCRIPTION_INTERVAL.as_secs()
}

fn default_charge_point_interval() -> u64 {
    CHARGE_POINT_INTERVAL.as_secs()
}

fn default_settle_delay() -> u64 {
    SETTLE_DELAY.as_secs()
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            subscription_interval_secs: default_subscription_interval(),
            charge_point_interval_secs: default_charge_point_interval(),
            settle_delay_secs: default_settle_delay(),
        }
    }
}

impl CoordinatorConfig {
    pub fn subscription_interval(&self) -> Duration {
        Duration::from_secs(self.subscription_interval_secs.max(1))
    }

    pub fn charge_point_interval(&self) -> Duration {
        Duration::from_secs(self.charge_point_interval_secs.max(1))
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_secs(self.settle_delay_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CoordinatorConfig::default();
        assert_eq!(config.subscription_interval(), Duration::from_secs(3600));
        assert_eq!(config.charge_point_interval(), Duration::from_secs(60));
        assert_eq!(config.settle_delay(), Duration::from_secs(2));
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let config = CoordinatorConfig {
            charge_point_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.charge_point_interval(), Duration::from_secs(1));
    }
}

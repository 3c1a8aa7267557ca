//! clever-coordinator - Periodic refresh of Clever account data
//!
//! Two coordinators publish snapshots for a host to read:
//!
//! - [`SubscriptionCoordinator`] polls hourly for the account's monthly
//!   consumption and the energy surcharge.
//! - [`ChargePointCoordinator`] polls every minute for one connector: live
//!   session, installation settings and the box's share of the consumption.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use clever_client::{CleverClient, ClientConfig, Transport};
//! use clever_coordinator::{CoordinatorConfig, Readout, SubscriptionRefresher};
//!
//! let transport = Arc::new(Transport::new(ClientConfig::default())?);
//! let client = CleverClient::new(transport, api_key);
//! let coordinator = Arc::new(
//!     SubscriptionRefresher::new(client, 99.0).into_coordinator(&CoordinatorConfig::default()),
//! );
//!
//! // fails with NotInitialized if the first refresh does
//! let _poll = coordinator.start().await?;
//! if let Some(snapshot) = coordinator.snapshot() {
//!     println!("{}", Readout::KwhThisMonth.value(snapshot.data.as_ref()));
//! }
//! ```

pub mod charge_point;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod readout;
pub mod subscription;

pub use charge_point::{
    ChargePointCoordinator, ChargePointRefresher, ChargePointSnapshot, CommandOutcome,
};
pub use config::{CoordinatorConfig, CHARGE_POINT_INTERVAL, SETTLE_DELAY, SUBSCRIPTION_INTERVAL};
pub use coordinator::{
    Coordinator, CoordinatorSnapshot, Phase, PollHandle, Refresh, MIN_INTERVAL,
};
pub use error::{CoordinatorError, Result};
pub use readout::{Readout, ReadoutSource, ReadoutValue, UNPLUGGED};
pub use subscription::{SubscriptionCoordinator, SubscriptionRefresher, SubscriptionSnapshot};

//! Clever Client Library
//!
//! Typed async client for the Clever EV charging backend: the onboarding
//! handshake that turns an email address into credentials, read operations for
//! subscription and charge point state, and the commands that change charger
//! behaviour.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use clever_client::{ClientConfig, CleverClient, Transport};
//!
//! #[tokio::main]
//! async fn main() -> clever_client::Result<()> {
//!     let transport = Arc::new(Transport::new(ClientConfig::default())?);
//!     let client = CleverClient::new(transport.clone(), "api-key");
//!
//!     let history = client.get_transactions().await?;
//!     println!("{} sessions", history.records.len());
//!
//!     let charger = client.charge_point("1456125", 1);
//!     charger.set_climate_preheat(true).await?;
//!
//!     transport.close();
//!     Ok(())
//! }
//! ```
//!
//! # Onboarding
//!
//! The handshake is a chain of typed steps; each one consumes the previous
//! step's output, so no step can run before its predecessor succeeded:
//!
//! ```rust,ignore
//! let auth = AuthClient::new(transport);
//! let pending = auth.send_auth_email("ev@example.com").await?;
//! // ... user pastes the emailed link ...
//! let verified = pending.verify_link(&auth, &link).await?;
//! let registered = verified.register(&auth).await?;
//! let credentials = registered.obtain_credentials(&auth).await?;
//! ```

mod auth;
mod client;
mod config;
mod endpoint;
mod error;
pub mod testing;
mod transport;

pub use auth::{extract_secret_code, AuthClient, AwaitingLink, LinkVerified, ProfileRegistered};
pub use client::{ChargePoint, CleverClient};
pub use config::ClientConfig;
pub use endpoint::{ChargePointPath, Endpoint};
pub use error::{CleverClientError, ConnectionError, Result};
pub use transport::Transport;

// Re-export the domain model for convenience
pub use clever_core as core;

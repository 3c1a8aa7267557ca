//! clever-core - Domain model and consumption aggregation for the Clever backend
//!
//! This crate holds the typed records every backend payload is parsed into,
//! the command payloads sent back, and the pure functions that derive monthly
//! consumption figures from a transaction history. Nothing in here performs I/O.

pub mod aggregation;
pub mod error;
pub mod models;

pub use aggregation::{
    aggregate, kwh_this_month, kwh_this_month_for_box, last_charge, month_start,
    month_start_boundary, TIMESTAMP_SCALE,
};
pub use error::{AggregationError, FlexRequestError, SchemaError};
pub use models::*;

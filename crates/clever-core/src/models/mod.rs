//! Typed records for every Clever backend payload
//!
//! Backend field names are mapped to internal names with an explicit
//! `#[serde(rename = "...")]` on every aliased field. Unknown fields are
//! ignored; declared fields are required unless typed as `Option`.

mod aggregate;
mod auth;
mod envelope;
mod flex;
mod installation;
mod profile;
mod state;
mod surcharge;
mod transaction;

pub use aggregate::*;
pub use auth::*;
pub use envelope::*;
pub use flex::*;
pub use installation::*;
pub use profile::*;
pub use state::*;
pub use surcharge::*;
pub use transaction::*;

use serde::de::DeserializeOwned;

use crate::error::SchemaError;

/// Parse a JSON payload into a typed record.
///
/// Either the whole record is populated or a [`SchemaError`] names the first
/// field that is missing or has the wrong type. Errors below the top level
/// are prefixed with their path, e.g. `consumptionRecords[3].kWh`.
pub fn parse<T: DeserializeOwned>(
    entity: &'static str,
    value: serde_json::Value,
) -> Result<T, SchemaError> {
    serde_path_to_error::deserialize(value).map_err(|e| {
        let path = e.path().to_string();
        let inner = e.into_inner();
        if path == "." {
            SchemaError::new(entity, inner.to_string())
        } else {
            SchemaError::new(entity, format!("{}: {}", path, inner))
        }
    })
}

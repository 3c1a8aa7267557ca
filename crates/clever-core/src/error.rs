//! Error types shared by the Clever domain model

use thiserror::Error;

/// A backend payload did not match the declared shape of a record.
///
/// `message` is the deserializer's description of the first offending field,
/// prefixed with its path below the top level, e.g. ``missing field
/// `chargeBoxId` `` or `consumptionRecords[3].kWh: invalid type: ...`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unexpected {entity} payload: {message}")]
pub struct SchemaError {
    /// Name of the record being parsed
    pub entity: &'static str,
    /// Description of the first missing or mismatched field
    pub message: String,
}

impl SchemaError {
    pub fn new(entity: &'static str, message: impl Into<String>) -> Self {
        Self {
            entity,
            message: message.into(),
        }
    }

    /// Error for a field that must be present in a particular response state
    pub fn missing_field(entity: &'static str, field: &str) -> Self {
        Self::new(entity, format!("missing field `{}`", field))
    }
}

/// Errors raised while deriving consumption figures
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AggregationError {
    /// The transaction history holds no records, so there is no last charge
    #[error("Transaction history is empty")]
    EmptyHistory,

    /// A record timestamp cannot be represented as a calendar time
    #[error("Timestamp out of range: {0}")]
    InvalidTimestamp(i64),

    /// Local midnight on the first of the month does not exist in this time zone
    #[error("Start of month does not exist in the local time zone")]
    NonexistentMonthStart,
}

/// Errors raised when assembling a flex charging request
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FlexRequestError {
    #[error("Enabling flex charging requires {0}")]
    MissingField(&'static str),

    #[error("Disabling flex charging takes no {0}")]
    UnexpectedField(&'static str),

    #[error("Invalid departure time {0:?}, expected HH:MM")]
    InvalidDepartureTime(String),

    #[error("Invalid phase count {0}, expected 1 to 3")]
    InvalidPhaseCount(u8),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_error_display_names_field() {
        let err = SchemaError::missing_field("ChargePointInstallation", "chargeBoxId");
        assert_eq!(
            err.to_string(),
            "Unexpected ChargePointInstallation payload: missing field `chargeBoxId`"
        );
    }
}

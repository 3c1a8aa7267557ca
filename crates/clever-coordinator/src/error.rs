//! Error types for coordinator operations

use clever_client::CleverClientError;
use clever_core::AggregationError;
use thiserror::Error;

/// Result type alias for coordinator operations
pub type Result<T> = std::result::Result<T, CoordinatorError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoordinatorError {
    /// A backend read failed
    #[error(transparent)]
    Client(#[from] CleverClientError),

    /// Transactions were fetched but could not be aggregated
    #[error("Aggregation failed: {0}")]
    Aggregation(#[from] AggregationError),

    /// The first refresh failed, so there is nothing to publish yet
    #[error("Coordinator '{name}' is not initialized: {source}")]
    NotInitialized {
        name: String,
        #[source]
        source: Box<CoordinatorError>,
    },
}

impl CoordinatorError {
    /// Whether the failure came from the network rather than the data
    pub fn is_connection(&self) -> bool {
        match self {
            Self::Client(e) => e.is_connection(),
            Self::Aggregation(_) => false,
            Self::NotInitialized { source, .. } => source.is_connection(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clever_client::ConnectionError;

    #[test]
    fn test_not_initialized_keeps_cause() {
        let err = CoordinatorError::NotInitialized {
            name: "subscription".to_string(),
            source: Box::new(CleverClientError::from(ConnectionError::Timeout).into()),
        };
        assert!(err.is_connection());
        assert_eq!(
            err.to_string(),
            "Coordinator 'subscription' is not initialized: Timeout while connecting to Clever backend"
        );
    }

    #[test]
    fn test_aggregation_is_not_connection() {
        let err = CoordinatorError::from(AggregationError::EmptyHistory);
        assert!(!err.is_connection());
    }
}

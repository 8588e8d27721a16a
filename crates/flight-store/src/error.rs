use thiserror::Error;

use crate::{FlightId, Version};

/// Errors that can occur when interacting with the flight store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The flight was modified by another writer since it was loaded.
    /// The expected version did not match the stored version.
    #[error(
        "Concurrency conflict for flight {flight_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        flight_id: FlightId,
        expected: Version,
        actual: Version,
    },

    /// A commit targeted a flight that was never stored.
    #[error("Flight not found: {0}")]
    FlightNotFound(FlightId),

    /// A flight with the same ID is already stored.
    #[error("Flight already exists: {0}")]
    FlightAlreadyExists(FlightId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A serialization/deserialization error occurred.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Returns true if this error reports a stale write.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, StoreError::ConcurrencyConflict { .. })
    }
}

/// Result type for flight store operations.
pub type Result<T> = std::result::Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_is_recognised() {
        let err = StoreError::ConcurrencyConflict {
            flight_id: FlightId::new(),
            expected: Version::first(),
            actual: Version::new(2),
        };
        assert!(err.is_concurrency_conflict());
        assert!(!StoreError::FlightNotFound(FlightId::new()).is_concurrency_conflict());
    }

    #[test]
    fn conflict_message_names_both_versions() {
        let flight_id = FlightId::new();
        let err = StoreError::ConcurrencyConflict {
            flight_id,
            expected: Version::new(3),
            actual: Version::new(4),
        };
        assert_eq!(
            err.to_string(),
            format!("Concurrency conflict for flight {flight_id}: expected version 3, found 4")
        );
    }
}

//! Domain error types.

use common::FlightId;
use flight_store::StoreError;
use thiserror::Error;

use crate::flight::BookingError;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// An error occurred in the flight store.
    #[error("Flight store error: {0}")]
    Store(#[from] StoreError),

    /// The flight rejected the booking request.
    #[error("Booking error: {0}")]
    Booking(#[from] BookingError),

    /// Flight not found.
    #[error("Flight not found: {0}")]
    FlightNotFound(FlightId),

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl DomainError {
    /// Returns true if the command lost an optimistic concurrency race.
    pub fn is_concurrency_conflict(&self) -> bool {
        matches!(self, DomainError::Store(e) if e.is_concurrency_conflict())
    }
}

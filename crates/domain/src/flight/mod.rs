//! Flight aggregate and related types.

mod aggregate;
mod booking;
mod commands;
mod service;
mod summary;
mod value_objects;

pub use aggregate::Flight;
pub use booking::Booking;
pub use commands::*;
pub use service::BookingService;
pub use summary::BookingSummary;
pub use value_objects::{Money, PassengerEmail, TimePlace};

use thiserror::Error;

/// Errors a flight returns when a booking request cannot be honoured.
///
/// These are expected business outcomes, not faults; none of them is worth
/// retrying against the same state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BookingError {
    /// More seats were requested than the flight has left.
    #[error("Not enough seats: requested {requested}, remaining {remaining}")]
    Overbook { requested: u32, remaining: u32 },

    /// No booking matches the passenger and seat count.
    #[error("Booking not found: {number_of_seats} seat(s) for {passenger_email}")]
    NotFound {
        passenger_email: PassengerEmail,
        number_of_seats: u32,
    },

    /// Invalid number of seats.
    #[error("Invalid number of seats: {0} (must be greater than 0)")]
    InvalidSeatCount(u32),

    /// Invalid passenger email.
    #[error("Invalid passenger email: {0:?}")]
    InvalidPassengerEmail(String),
}

impl BookingError {
    /// Returns true for errors caused by malformed input rather than flight state.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BookingError::InvalidSeatCount(_) | BookingError::InvalidPassengerEmail(_)
        )
    }
}

//! Domain layer for the flight booking system.
//!
//! This crate provides the seat inventory and booking consistency engine:
//! - Flight aggregate owning seat capacity and bookings
//! - FlightRepository for load, decide and conditional commit
//! - RetryPolicy bounding how often a conflicting command is re-run
//! - BookingService exposing the booking operations

pub mod error;
pub mod flight;
pub mod repository;
pub mod retry;
pub mod seed;

pub use error::DomainError;
pub use flight::{
    Booking, BookingError, BookingService, BookingSummary, CancelBooking, Flight, MakeBooking,
    Money, PassengerEmail, ScheduleFlight, TimePlace,
};
pub use repository::{CommandResult, FlightRepository};
pub use retry::RetryPolicy;

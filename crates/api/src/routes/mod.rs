//! HTTP route handlers.

pub mod bookings;
pub mod flights;
pub mod health;
pub mod metrics;

use domain::BookingService;
use flight_store::FlightStore;

/// Shared application state accessible from all handlers.
pub struct AppState<S: FlightStore> {
    pub booking_service: BookingService<S>,
}

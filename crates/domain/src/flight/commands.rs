//! Flight commands.

use common::FlightId;

use super::{Money, TimePlace};

/// Command to schedule a new flight.
#[derive(Debug, Clone)]
pub struct ScheduleFlight {
    /// The flight ID to schedule.
    pub flight_id: FlightId,

    pub airline: String,
    pub price: Money,
    pub departure: TimePlace,
    pub arrival: TimePlace,

    /// Total seat capacity.
    pub number_of_seats: u32,
}

impl ScheduleFlight {
    /// Creates a new ScheduleFlight command with a generated flight ID.
    pub fn new(
        airline: impl Into<String>,
        price: Money,
        departure: TimePlace,
        arrival: TimePlace,
        number_of_seats: u32,
    ) -> Self {
        Self {
            flight_id: FlightId::new(),
            airline: airline.into(),
            price,
            departure,
            arrival,
            number_of_seats,
        }
    }

    /// Uses the given flight ID instead of a generated one.
    pub fn with_id(mut self, flight_id: FlightId) -> Self {
        self.flight_id = flight_id;
        self
    }
}

/// Command to reserve seats on a flight.
///
/// The passenger email is carried raw; it is validated when the command is
/// executed.
#[derive(Debug, Clone)]
pub struct MakeBooking {
    /// The flight to book on.
    pub flight_id: FlightId,

    /// The passenger making the booking.
    pub passenger_email: String,

    /// Number of seats to reserve.
    pub number_of_seats: u32,
}

impl MakeBooking {
    /// Creates a new MakeBooking command.
    pub fn new(
        flight_id: FlightId,
        passenger_email: impl Into<String>,
        number_of_seats: u32,
    ) -> Self {
        Self {
            flight_id,
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }
}

/// Command to cancel a booking.
#[derive(Debug, Clone)]
pub struct CancelBooking {
    /// The flight holding the booking.
    pub flight_id: FlightId,

    /// The passenger who made the booking.
    pub passenger_email: String,

    /// Seat count of the booking to cancel; must match exactly.
    pub number_of_seats: u32,
}

impl CancelBooking {
    /// Creates a new CancelBooking command.
    pub fn new(
        flight_id: FlightId,
        passenger_email: impl Into<String>,
        number_of_seats: u32,
    ) -> Self {
        Self {
            flight_id,
            passenger_email: passenger_email.into(),
            number_of_seats,
        }
    }
}

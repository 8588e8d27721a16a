use serde::{Deserialize, Serialize};

use super::PassengerEmail;

/// A passenger's reservation of seats on the flight that owns it.
///
/// A booking is active while it is held by its flight. Cancelling removes it
/// for good; booking again creates a new record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booking {
    /// The passenger holding the seats.
    pub passenger_email: PassengerEmail,

    /// Number of seats reserved.
    pub number_of_seats: u32,
}

impl Booking {
    /// Creates a new booking.
    pub fn new(passenger_email: PassengerEmail, number_of_seats: u32) -> Self {
        Self {
            passenger_email,
            number_of_seats,
        }
    }

    /// Returns true if this booking is exactly the given passenger and seat count.
    pub fn matches(&self, passenger_email: &PassengerEmail, number_of_seats: u32) -> bool {
        self.passenger_email == *passenger_email && self.number_of_seats == number_of_seats
    }
}

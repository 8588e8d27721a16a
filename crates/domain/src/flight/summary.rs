use common::FlightId;
use serde::{Deserialize, Serialize};

use super::{Booking, Flight, Money, PassengerEmail, TimePlace};

/// One booking record together with the flight it was made on.
///
/// A passenger holding two bookings on the same flight gets two summaries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSummary {
    pub flight_id: FlightId,
    pub airline: String,
    pub price: Money,
    pub departure: TimePlace,
    pub arrival: TimePlace,
    pub number_of_booked_seats: u32,
    pub passenger_email: PassengerEmail,
}

impl BookingSummary {
    /// Builds the summary of a booking held by `flight`.
    pub fn new(flight: &Flight, booking: &Booking) -> Self {
        Self {
            flight_id: flight.id(),
            airline: flight.airline().to_string(),
            price: flight.price(),
            departure: flight.departure().clone(),
            arrival: flight.arrival().clone(),
            number_of_booked_seats: booking.number_of_seats,
            passenger_email: booking.passenger_email.clone(),
        }
    }

    /// Returns one summary per booking the passenger holds on `flight`.
    pub fn for_passenger(flight: &Flight, passenger_email: &PassengerEmail) -> Vec<Self> {
        flight
            .bookings_for(passenger_email)
            .map(|booking| Self::new(flight, booking))
            .collect()
    }
}

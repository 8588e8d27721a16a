//! Flight aggregate implementation.

use common::FlightId;
use flight_store::Version;
use serde::{Deserialize, Serialize};

use super::{Booking, BookingError, Money, PassengerEmail, ScheduleFlight, TimePlace};

/// Flight aggregate root.
///
/// Owns the seat capacity of one scheduled flight and every booking made on
/// it. Remaining seats are never stored; they are derived from the bookings
/// each time they are asked for, so they cannot drift.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    /// Unique flight identifier.
    id: FlightId,

    /// Version the flight was loaded at. Assigned by the store, never persisted
    /// inside the state itself.
    #[serde(skip)]
    version: Version,

    airline: String,
    price: Money,
    departure: TimePlace,
    arrival: TimePlace,

    /// Total seat capacity.
    number_of_seats: u32,

    /// Active bookings, in the order they were made.
    bookings: Vec<Booking>,
}

impl Flight {
    /// Schedules a new flight with no bookings.
    pub fn new(
        id: FlightId,
        airline: impl Into<String>,
        price: Money,
        departure: TimePlace,
        arrival: TimePlace,
        number_of_seats: u32,
    ) -> Self {
        Self {
            id,
            version: Version::initial(),
            airline: airline.into(),
            price,
            departure,
            arrival,
            number_of_seats,
            bookings: Vec::new(),
        }
    }

    /// Creates a flight from a scheduling command.
    pub fn schedule(cmd: ScheduleFlight) -> Self {
        Self::new(
            cmd.flight_id,
            cmd.airline,
            cmd.price,
            cmd.departure,
            cmd.arrival,
            cmd.number_of_seats,
        )
    }

    /// Sets the version the flight was loaded at or committed as.
    pub(crate) fn set_version(&mut self, version: Version) {
        self.version = version;
    }
}

// Query methods
impl Flight {
    /// Returns the flight ID.
    pub fn id(&self) -> FlightId {
        self.id
    }

    /// Returns the version this flight was loaded at.
    pub fn version(&self) -> Version {
        self.version
    }

    pub fn airline(&self) -> &str {
        &self.airline
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn departure(&self) -> &TimePlace {
        &self.departure
    }

    pub fn arrival(&self) -> &TimePlace {
        &self.arrival
    }

    /// Returns the total seat capacity.
    pub fn number_of_seats(&self) -> u32 {
        self.number_of_seats
    }

    /// Returns all active bookings in booking order.
    pub fn bookings(&self) -> &[Booking] {
        &self.bookings
    }

    /// Returns the bookings held by a passenger.
    pub fn bookings_for<'a>(
        &'a self,
        passenger_email: &'a PassengerEmail,
    ) -> impl Iterator<Item = &'a Booking> + 'a {
        self.bookings
            .iter()
            .filter(move |b| b.passenger_email == *passenger_email)
    }

    /// Returns the number of seats a passenger holds across all their bookings.
    pub fn seats_booked_by(&self, passenger_email: &PassengerEmail) -> u32 {
        self.bookings_for(passenger_email)
            .map(|b| b.number_of_seats)
            .sum()
    }

    /// Returns the number of seats taken by active bookings.
    pub fn booked_seats(&self) -> u32 {
        self.bookings.iter().map(|b| b.number_of_seats).sum()
    }

    /// Returns capacity minus the seats taken by active bookings.
    pub fn remaining_number_of_seats(&self) -> u32 {
        self.number_of_seats.saturating_sub(self.booked_seats())
    }
}

// Command methods
impl Flight {
    /// Reserves seats for a passenger.
    ///
    /// Fails with `Overbook` if fewer seats remain than requested; the flight
    /// is left untouched in that case. A passenger booking again gets a
    /// second booking record rather than a larger first one.
    pub fn make_booking(
        &mut self,
        passenger_email: PassengerEmail,
        number_of_seats: u32,
    ) -> Result<(), BookingError> {
        if number_of_seats == 0 {
            return Err(BookingError::InvalidSeatCount(number_of_seats));
        }

        let remaining = self.remaining_number_of_seats();
        if number_of_seats > remaining {
            return Err(BookingError::Overbook {
                requested: number_of_seats,
                remaining,
            });
        }

        self.bookings
            .push(Booking::new(passenger_email, number_of_seats));
        Ok(())
    }

    /// Cancels the booking matching both passenger and seat count exactly.
    ///
    /// The matching booking is removed in full; there is no partial
    /// cancellation. When a passenger holds several identical bookings, the
    /// oldest goes first.
    pub fn cancel_booking(
        &mut self,
        passenger_email: &PassengerEmail,
        number_of_seats: u32,
    ) -> Result<(), BookingError> {
        if number_of_seats == 0 {
            return Err(BookingError::InvalidSeatCount(number_of_seats));
        }

        let position = self
            .bookings
            .iter()
            .position(|b| b.matches(passenger_email, number_of_seats))
            .ok_or_else(|| BookingError::NotFound {
                passenger_email: passenger_email.clone(),
                number_of_seats,
            })?;

        self.bookings.remove(position);
        Ok(())
    }
}

//! Booking service providing a simplified API for flight operations.

use common::FlightId;
use flight_store::FlightStore;

use crate::error::DomainError;
use crate::repository::{CommandResult, FlightRepository};
use crate::retry::RetryPolicy;

use super::{
    BookingError, BookingSummary, CancelBooking, Flight, MakeBooking, PassengerEmail,
    ScheduleFlight,
};

/// Service for booking and cancelling seats on flights.
///
/// Wraps the flight repository: every command loads a flight, decides
/// against that snapshot, and commits conditionally on the loaded version.
pub struct BookingService<S: FlightStore> {
    repository: FlightRepository<S>,
}

impl<S: FlightStore> BookingService<S> {
    /// Creates a new booking service that retries a conflicting command once.
    pub fn new(store: S) -> Self {
        Self {
            repository: FlightRepository::new(store),
        }
    }

    /// Creates a new booking service with the given retry policy.
    pub fn with_retry_policy(store: S, retry: RetryPolicy) -> Self {
        Self {
            repository: FlightRepository::with_retry_policy(store, retry),
        }
    }

    /// Returns a reference to the underlying repository.
    pub fn repository(&self) -> &FlightRepository<S> {
        &self.repository
    }

    /// Schedules a new flight with all of its seats available.
    #[tracing::instrument(skip(self))]
    pub async fn schedule_flight(&self, cmd: ScheduleFlight) -> Result<Flight, DomainError> {
        self.repository.insert(Flight::schedule(cmd)).await
    }

    /// Loads a flight by ID.
    ///
    /// Returns None if the flight doesn't exist.
    #[tracing::instrument(skip(self))]
    pub async fn find_flight(&self, flight_id: FlightId) -> Result<Option<Flight>, DomainError> {
        self.repository.load(flight_id).await
    }

    /// Lists every flight.
    #[tracing::instrument(skip(self))]
    pub async fn list_flights(&self) -> Result<Vec<Flight>, DomainError> {
        self.repository.list().await
    }

    /// Lists every booking a passenger holds, across all flights.
    ///
    /// A blank address yields an empty list.
    #[tracing::instrument(skip(self, passenger_email))]
    pub async fn list_bookings(
        &self,
        passenger_email: &str,
    ) -> Result<Vec<BookingSummary>, DomainError> {
        let Ok(passenger_email) = PassengerEmail::parse(passenger_email) else {
            return Ok(Vec::new());
        };

        let flights = self.repository.list().await?;
        Ok(flights
            .iter()
            .flat_map(|flight| BookingSummary::for_passenger(flight, &passenger_email))
            .collect())
    }

    /// Reserves seats on a flight.
    #[tracing::instrument(
        skip(self, cmd),
        fields(flight_id = %cmd.flight_id, number_of_seats = cmd.number_of_seats)
    )]
    pub async fn make_booking(&self, cmd: MakeBooking) -> Result<CommandResult, DomainError> {
        let passenger_email = PassengerEmail::parse(&cmd.passenger_email)?;
        let number_of_seats = validate_seat_count(cmd.number_of_seats)?;

        let result = self
            .repository
            .execute(cmd.flight_id, |flight| {
                flight.make_booking(passenger_email.clone(), number_of_seats)
            })
            .await;

        match &result {
            Ok(r) => {
                metrics::counter!("bookings_made_total").increment(1);
                tracing::debug!(
                    remaining = r.flight.remaining_number_of_seats(),
                    version = %r.new_version,
                    "booking made"
                );
            }
            Err(DomainError::Booking(BookingError::Overbook { .. })) => {
                metrics::counter!("booking_overbook_rejections_total").increment(1);
            }
            Err(_) => {}
        }

        result
    }

    /// Cancels a booking matching the passenger and seat count exactly.
    #[tracing::instrument(
        skip(self, cmd),
        fields(flight_id = %cmd.flight_id, number_of_seats = cmd.number_of_seats)
    )]
    pub async fn cancel_booking(&self, cmd: CancelBooking) -> Result<CommandResult, DomainError> {
        let passenger_email = PassengerEmail::parse(&cmd.passenger_email)?;
        let number_of_seats = validate_seat_count(cmd.number_of_seats)?;

        let result = self
            .repository
            .execute(cmd.flight_id, |flight| {
                flight.cancel_booking(&passenger_email, number_of_seats)
            })
            .await?;

        metrics::counter!("bookings_cancelled_total").increment(1);
        Ok(result)
    }
}

fn validate_seat_count(number_of_seats: u32) -> Result<u32, BookingError> {
    if number_of_seats == 0 {
        return Err(BookingError::InvalidSeatCount(number_of_seats));
    }
    Ok(number_of_seats)
}

//! Booking endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::FlightId;
use domain::{BookingError, BookingSummary, CancelBooking, DomainError, MakeBooking};
use flight_store::FlightStore;
use serde::{Deserialize, Serialize};

use super::AppState;
use super::flights::{FlightResponse, TimePlaceResponse, format_price};
use crate::error::ApiError;

// -- Request types --

/// Body of both booking and cancellation requests.
#[derive(Debug, Deserialize)]
pub struct BookingRequest {
    pub flight_id: FlightId,
    pub passenger_email: String,
    pub number_of_seats: u32,
}

// -- Response types --

#[derive(Debug, Serialize)]
pub struct BookingResponse {
    pub flight_id: String,
    pub airline: String,
    pub price: String,
    pub departure: TimePlaceResponse,
    pub arrival: TimePlaceResponse,
    pub number_of_booked_seats: u32,
    pub passenger_email: String,
}

impl From<&BookingSummary> for BookingResponse {
    fn from(summary: &BookingSummary) -> Self {
        Self {
            flight_id: summary.flight_id.to_string(),
            airline: summary.airline.clone(),
            price: format_price(summary.price),
            departure: (&summary.departure).into(),
            arrival: (&summary.arrival).into(),
            number_of_booked_seats: summary.number_of_booked_seats,
            passenger_email: summary.passenger_email.to_string(),
        }
    }
}

// -- Handlers --

/// GET /bookings/{email}: every booking a passenger holds.
#[tracing::instrument(skip(state, email))]
pub async fn list<S: FlightStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(email): Path<String>,
) -> Result<Json<Vec<BookingResponse>>, ApiError> {
    let bookings = state.booking_service.list_bookings(&email).await?;
    Ok(Json(bookings.iter().map(BookingResponse::from).collect()))
}

/// POST /bookings: reserve seats on a flight.
///
/// Responds 201 with the flight's location on success.
#[tracing::instrument(skip(state, payload))]
pub async fn book<S: FlightStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let flight_id = req.flight_id;

    let result = state
        .booking_service
        .make_booking(MakeBooking::new(
            flight_id,
            req.passenger_email,
            req.number_of_seats,
        ))
        .await
        .map_err(|e| match e {
            DomainError::Booking(BookingError::NotFound { .. }) => {
                ApiError::Internal(format!("unexpected error while booking: {e}"))
            }
            e => e.into(),
        })?;

    tracing::debug!(%flight_id, attempts = result.attempts, "booking created");

    let location = format!("/flights/{flight_id}");
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(FlightResponse::from(&result.flight)),
    )
        .into_response())
}

/// DELETE /bookings: cancel a booking matching passenger and seat count.
#[tracing::instrument(skip(state, payload))]
pub async fn cancel<S: FlightStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<BookingRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    state
        .booking_service
        .cancel_booking(CancelBooking::new(
            req.flight_id,
            req.passenger_email,
            req.number_of_seats,
        ))
        .await
        .map_err(|e| match e {
            DomainError::Booking(BookingError::Overbook { .. }) => {
                ApiError::Internal(format!("unexpected error while cancelling a booking: {e}"))
            }
            e => e.into(),
        })?;

    Ok(StatusCode::NO_CONTENT)
}

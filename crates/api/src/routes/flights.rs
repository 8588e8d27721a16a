//! Flight listing endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use common::FlightId;
use domain::{Flight, Money, TimePlace};
use flight_store::FlightStore;
use serde::Serialize;

use super::AppState;
use crate::error::ApiError;

// -- Response types --

#[derive(Debug, Serialize)]
pub struct TimePlaceResponse {
    pub place: String,
    pub time: DateTime<Utc>,
}

impl From<&TimePlace> for TimePlaceResponse {
    fn from(tp: &TimePlace) -> Self {
        Self {
            place: tp.place.clone(),
            time: tp.time,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FlightResponse {
    pub id: String,
    pub airline: String,
    pub price: String,
    pub departure: TimePlaceResponse,
    pub arrival: TimePlaceResponse,
    pub remaining_number_of_seats: u32,
}

impl From<&Flight> for FlightResponse {
    fn from(flight: &Flight) -> Self {
        Self {
            id: flight.id().to_string(),
            airline: flight.airline().to_string(),
            price: format_price(flight.price()),
            departure: flight.departure().into(),
            arrival: flight.arrival().into(),
            remaining_number_of_seats: flight.remaining_number_of_seats(),
        }
    }
}

/// Formats a price as a plain decimal, e.g. `"259.00"`.
pub(crate) fn format_price(price: Money) -> String {
    let sign = if price.cents() < 0 { "-" } else { "" };
    format!("{sign}{}.{:02}", price.dollars().abs(), price.cents_part())
}

// -- Handlers --

/// GET /flights: every flight with its remaining seats.
#[tracing::instrument(skip(state))]
pub async fn list<S: FlightStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<FlightResponse>>, ApiError> {
    let flights = state.booking_service.list_flights().await?;
    Ok(Json(flights.iter().map(FlightResponse::from).collect()))
}

/// GET /flights/{id}: a single flight.
#[tracing::instrument(skip(state))]
pub async fn get<S: FlightStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(id): Path<String>,
) -> Result<Json<FlightResponse>, ApiError> {
    let flight_id = parse_flight_id(&id)?;
    let flight = state
        .booking_service
        .find_flight(flight_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Flight {flight_id} not found")))?;

    Ok(Json(FlightResponse::from(&flight)))
}

fn parse_flight_id(id: &str) -> Result<FlightId, ApiError> {
    FlightId::parse(id).map_err(|e| ApiError::BadRequest(format!("Invalid flight ID: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(Money::from_cents(25_900)), "259.00");
        assert_eq!(format_price(Money::from_cents(2_950)), "29.50");
        assert_eq!(format_price(Money::from_cents(5)), "0.05");
        assert_eq!(format_price(Money::from_cents(-150)), "-1.50");
    }
}

//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{BookingError, DomainError};
use flight_store::StoreError;

/// Message returned when a booking request asks for more seats than remain.
pub const OVERBOOK_MESSAGE: &str = "Not enough seats.";

/// Message returned when a booking lost a concurrency race it could not recover from.
pub const CONFLICT_MESSAGE: &str = "An error occurred while booking. Please try again.";

/// API-level error type that maps to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Resource not found.
    #[error("{0}")]
    NotFound(String),

    /// Bad request from the client.
    #[error("{0}")]
    BadRequest(String),

    /// Domain logic error.
    #[error(transparent)]
    Domain(DomainError),

    /// Internal server error.
    #[error("{0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Internal(msg) => internal(msg),
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String) {
    match &err {
        DomainError::Booking(booking_err) if booking_err.is_validation() => {
            (StatusCode::BAD_REQUEST, err.to_string())
        }
        DomainError::Booking(BookingError::Overbook { .. }) => {
            (StatusCode::CONFLICT, OVERBOOK_MESSAGE.to_string())
        }
        DomainError::Booking(BookingError::NotFound { .. }) => {
            (StatusCode::NOT_FOUND, err.to_string())
        }
        DomainError::FlightNotFound(_) => (StatusCode::NOT_FOUND, err.to_string()),
        DomainError::Store(StoreError::ConcurrencyConflict { .. }) => {
            (StatusCode::CONFLICT, CONFLICT_MESSAGE.to_string())
        }
        _ => internal(err.to_string()),
    }
}

fn internal(msg: String) -> (StatusCode, String) {
    tracing::error!(error = %msg, "internal server error");
    (StatusCode::INTERNAL_SERVER_ERROR, msg)
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::FlightId;
    use flight_store::Version;

    fn status_of(err: ApiError) -> StatusCode {
        err.into_response().status()
    }

    #[test]
    fn test_booking_errors_map_to_statuses() {
        let overbook = DomainError::from(BookingError::Overbook {
            requested: 3,
            remaining: 1,
        });
        assert_eq!(status_of(overbook.into()), StatusCode::CONFLICT);

        let invalid = DomainError::from(BookingError::InvalidSeatCount(0));
        assert_eq!(status_of(invalid.into()), StatusCode::BAD_REQUEST);

        let blank = DomainError::from(BookingError::InvalidPassengerEmail("  ".into()));
        assert_eq!(status_of(blank.into()), StatusCode::BAD_REQUEST);

        let missing = DomainError::FlightNotFound(FlightId::new());
        assert_eq!(status_of(missing.into()), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_conflict_maps_to_409() {
        let conflict = DomainError::from(StoreError::ConcurrencyConflict {
            flight_id: FlightId::new(),
            expected: Version::first(),
            actual: Version::new(2),
        });
        assert_eq!(status_of(conflict.into()), StatusCode::CONFLICT);
    }

    #[test]
    fn test_other_store_errors_are_internal() {
        let err = DomainError::from(StoreError::FlightAlreadyExists(FlightId::new()));
        assert_eq!(status_of(err.into()), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            status_of(ApiError::Internal("boom".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}

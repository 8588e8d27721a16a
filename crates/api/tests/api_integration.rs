//! Integration tests for the API server.

use std::sync::Arc;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use api::routes::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::{Duration, Utc};
use common::FlightId;
use domain::{
    BookingService, Flight, MakeBooking, Money, PassengerEmail, RetryPolicy, ScheduleFlight,
    TimePlace,
};
use flight_store::{FlightRecord, FlightStore, InMemoryFlightStore, StoreError, Version};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

fn schedule(number_of_seats: u32) -> ScheduleFlight {
    let departure = Utc::now() + Duration::days(1);
    ScheduleFlight::new(
        "Basiq Air",
        Money::from_cents(73_400),
        TimePlace::new("Amsterdam", departure),
        TimePlace::new("Glasgow, Scotland", departure + Duration::hours(2)),
        number_of_seats,
    )
}

/// Builds an app over an in-memory store holding one flight with the given capacity.
async fn setup_with_flight(
    number_of_seats: u32,
) -> (
    axum::Router,
    Arc<AppState<InMemoryFlightStore>>,
    FlightId,
) {
    let state = api::create_default_state(InMemoryFlightStore::new(), RetryPolicy::default());
    let flight = state
        .booking_service
        .schedule_flight(schedule(number_of_seats))
        .await
        .unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());
    (app, state, flight.id())
}

fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn booking_body(flight_id: FlightId, email: &str, seats: u32) -> serde_json::Value {
    serde_json::json!({
        "flight_id": flight_id.to_string(),
        "passenger_email": email,
        "number_of_seats": seats,
    })
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _, _) = setup_with_flight(1).await;

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_list_flights() {
    let (app, state, flight_id) = setup_with_flight(10).await;
    state
        .booking_service
        .schedule_flight(schedule(20))
        .await
        .unwrap();

    let response = app.oneshot(get_request("/flights")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let flights = json.as_array().unwrap();
    assert_eq!(flights.len(), 2);
    assert!(
        flights
            .iter()
            .any(|f| f["id"] == flight_id.to_string() && f["remaining_number_of_seats"] == 10)
    );
}

#[tokio::test]
async fn test_get_flight() {
    let (app, _, flight_id) = setup_with_flight(10).await;

    let response = app
        .oneshot(get_request(&format!("/flights/{flight_id}")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["id"], flight_id.to_string());
    assert_eq!(json["airline"], "Basiq Air");
    assert_eq!(json["price"], "734.00");
    assert_eq!(json["departure"]["place"], "Amsterdam");
    assert_eq!(json["arrival"]["place"], "Glasgow, Scotland");
    assert_eq!(json["remaining_number_of_seats"], 10);
}

#[tokio::test]
async fn test_get_flight_not_found() {
    let (app, _, _) = setup_with_flight(10).await;

    let response = app
        .oneshot(get_request(&format!("/flights/{}", FlightId::new())))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_flight_invalid_id() {
    let (app, _, _) = setup_with_flight(10).await;

    let response = app
        .oneshot(get_request("/flights/not-a-uuid"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_book_flight() {
    let (app, state, flight_id) = setup_with_flight(10).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/bookings",
            booking_body(flight_id, "a@x.com", 3),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(
        response.headers()[header::LOCATION],
        format!("/flights/{flight_id}").as_str()
    );
    let json = body_json(response).await;
    assert_eq!(json["remaining_number_of_seats"], 7);

    let flight = state
        .booking_service
        .find_flight(flight_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(flight.remaining_number_of_seats(), 7);
}

#[tokio::test]
async fn test_book_flight_overbook() {
    let (app, state, flight_id) = setup_with_flight(2).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/bookings",
            booking_body(flight_id, "a@x.com", 3),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(json["error"], "Not enough seats.");

    let flight = state
        .booking_service
        .find_flight(flight_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(flight.remaining_number_of_seats(), 2);
}

#[tokio::test]
async fn test_book_unknown_flight() {
    let (app, _, _) = setup_with_flight(2).await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/bookings",
            booking_body(FlightId::new(), "a@x.com", 1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_book_invalid_input() {
    let (app, _, flight_id) = setup_with_flight(2).await;

    for body in [
        booking_body(flight_id, "   ", 1),
        booking_body(flight_id, "a@x.com", 0),
        serde_json::json!({ "flight_id": "nope", "passenger_email": "a@x.com", "number_of_seats": 1 }),
        serde_json::json!({ "flight_id": flight_id.to_string(), "passenger_email": "a@x.com", "number_of_seats": -1 }),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/bookings", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_cancel_booking() {
    let (app, state, flight_id) = setup_with_flight(10).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/bookings",
            booking_body(flight_id, "a@x.com", 3),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app
        .clone()
        .oneshot(json_request(
            "DELETE",
            "/bookings",
            booking_body(flight_id, "a@x.com", 3),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let flight = state
        .booking_service
        .find_flight(flight_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(flight.remaining_number_of_seats(), 10);

    // Booking already cancelled
    let response = app
        .oneshot(json_request(
            "DELETE",
            "/bookings",
            booking_body(flight_id, "a@x.com", 3),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_requires_exact_seat_count() {
    let (app, _, flight_id) = setup_with_flight(10).await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/bookings",
            booking_body(flight_id, "a@x.com", 3),
        ))
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "DELETE",
            "/bookings",
            booking_body(flight_id, "a@x.com", 2),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_unknown_flight() {
    let (app, _, _) = setup_with_flight(10).await;

    let response = app
        .oneshot(json_request(
            "DELETE",
            "/bookings",
            booking_body(FlightId::new(), "a@x.com", 1),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cancel_invalid_input() {
    let (app, _, flight_id) = setup_with_flight(10).await;

    for body in [
        booking_body(flight_id, "a@x.com", 0),
        booking_body(flight_id, "   ", 1),
        serde_json::json!({ "flight_id": flight_id.to_string(), "number_of_seats": 1 }),
    ] {
        let response = app
            .clone()
            .oneshot(json_request("DELETE", "/bookings", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn test_list_bookings_for_passenger() {
    let (app, _, flight_id) = setup_with_flight(10).await;

    for (email, seats) in [("a@x.com", 1), ("b@x.com", 2), ("a@x.com", 4)] {
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/bookings",
                booking_body(flight_id, email, seats),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get_request("/bookings/a@x.com")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let bookings = json.as_array().unwrap();
    assert_eq!(bookings.len(), 2);
    assert!(bookings.iter().all(|b| b["passenger_email"] == "a@x.com"));
    assert!(bookings.iter().all(|b| b["flight_id"] == flight_id.to_string()));
    assert!(bookings.iter().all(|b| b["airline"] == "Basiq Air"));
    let mut seats: Vec<u64> = bookings
        .iter()
        .map(|b| b["number_of_booked_seats"].as_u64().unwrap())
        .collect();
    seats.sort_unstable();
    assert_eq!(seats, vec![1, 4]);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _, flight_id) = setup_with_flight(10).await;

    app.clone()
        .oneshot(json_request(
            "POST",
            "/bookings",
            booking_body(flight_id, "a@x.com", 1),
        ))
        .await
        .unwrap();

    let response = app.oneshot(get_request("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("bookings_made_total"));
}

/// Store that commits a rival booking right before the first commit it is asked to make.
#[derive(Clone)]
struct RacingStore {
    inner: InMemoryFlightStore,
    raced: Arc<AtomicBool>,
}

#[async_trait::async_trait]
impl FlightStore for RacingStore {
    async fn insert(&self, record: FlightRecord) -> flight_store::Result<Version> {
        self.inner.insert(record).await
    }

    async fn load(&self, flight_id: FlightId) -> flight_store::Result<Option<FlightRecord>> {
        self.inner.load(flight_id).await
    }

    async fn commit(&self, record: FlightRecord) -> flight_store::Result<Version> {
        if !self.raced.swap(true, Ordering::SeqCst) {
            let current = self.inner.load(record.flight_id).await?.unwrap();
            let version = current.version;
            let mut flight: Flight = current.into_state()?;
            let rival = PassengerEmail::parse("rival@x.com").unwrap();
            flight.make_booking(rival, 1).unwrap();
            self.inner
                .commit(FlightRecord::from_state(record.flight_id, version, &flight)?)
                .await?;
        }
        self.inner.commit(record).await
    }

    async fn list(&self) -> flight_store::Result<Vec<FlightRecord>> {
        self.inner.list().await
    }

    async fn ping(&self) -> flight_store::Result<()> {
        self.inner.ping().await
    }
}

#[tokio::test]
async fn test_book_flight_conflict_without_retry() {
    let store = RacingStore {
        inner: InMemoryFlightStore::new(),
        raced: Arc::new(AtomicBool::new(false)),
    };
    let state = api::create_default_state(store, RetryPolicy::Never);
    let flight = state
        .booking_service
        .schedule_flight(schedule(5))
        .await
        .unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());

    let response = app
        .oneshot(json_request(
            "POST",
            "/bookings",
            booking_body(flight.id(), "a@x.com", 1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "An error occurred while booking. Please try again."
    );
}

#[tokio::test]
async fn test_cancel_booking_conflict_without_retry() {
    let inner = InMemoryFlightStore::new();
    let store = RacingStore {
        inner: inner.clone(),
        raced: Arc::new(AtomicBool::new(false)),
    };
    let state = api::create_default_state(store, RetryPolicy::Never);
    let flight = state
        .booking_service
        .schedule_flight(schedule(5))
        .await
        .unwrap();
    BookingService::new(inner)
        .make_booking(MakeBooking::new(flight.id(), "a@x.com", 2))
        .await
        .unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());

    let response = app
        .oneshot(json_request(
            "DELETE",
            "/bookings",
            booking_body(flight.id(), "a@x.com", 2),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let json = body_json(response).await;
    assert_eq!(
        json["error"],
        "An error occurred while booking. Please try again."
    );

    let stored = state
        .booking_service
        .find_flight(flight.id())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.bookings().len(), 2);
    assert_eq!(stored.remaining_number_of_seats(), 2);
}

/// Store whose records cannot be read back as flights and whose connection is gone.
#[derive(Clone)]
struct BrokenStore;

#[async_trait::async_trait]
impl FlightStore for BrokenStore {
    async fn insert(&self, _record: FlightRecord) -> flight_store::Result<Version> {
        Ok(Version::first())
    }

    async fn load(&self, flight_id: FlightId) -> flight_store::Result<Option<FlightRecord>> {
        Ok(Some(FlightRecord::new(
            flight_id,
            Version::first(),
            serde_json::json!({ "seats": "many" }),
        )))
    }

    async fn commit(&self, record: FlightRecord) -> flight_store::Result<Version> {
        Err(StoreError::FlightNotFound(record.flight_id))
    }

    async fn list(&self) -> flight_store::Result<Vec<FlightRecord>> {
        Ok(Vec::new())
    }

    async fn ping(&self) -> flight_store::Result<()> {
        Err(StoreError::Database(sqlx::Error::PoolClosed))
    }
}

#[tokio::test]
async fn test_cancel_unrecognised_error_is_internal() {
    let state = api::create_default_state(BrokenStore, RetryPolicy::default());
    let app = api::create_app(state, get_metrics_handle());

    let response = app
        .oneshot(json_request(
            "DELETE",
            "/bookings",
            booking_body(FlightId::new(), "a@x.com", 1),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("Serialization"));
}

#[tokio::test]
async fn test_health_check_reports_unavailable_store() {
    let state = api::create_default_state(BrokenStore, RetryPolicy::default());
    let app = api::create_app(state, get_metrics_handle());

    let response = app.oneshot(get_request("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let json = body_json(response).await;
    assert_eq!(json["status"], "unavailable");
}

//! HTTP API server with observability for the flight booking system.
//!
//! Provides REST endpoints for listing flights and making or cancelling
//! bookings, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::get;
use domain::{BookingService, RetryPolicy};
use flight_store::FlightStore;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: FlightStore + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check::<S>))
        .route("/flights", get(routes::flights::list::<S>))
        .route("/flights/{id}", get(routes::flights::get::<S>))
        .route(
            "/bookings",
            axum::routing::post(routes::bookings::book::<S>)
                .delete(routes::bookings::cancel::<S>),
        )
        .route("/bookings/{email}", get(routes::bookings::list::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state around a flight store.
pub fn create_default_state<S: FlightStore + 'static>(
    store: S,
    retry: RetryPolicy,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        booking_service: BookingService::with_retry_policy(store, retry),
    })
}

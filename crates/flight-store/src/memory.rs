use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{FlightId, FlightRecord, Result, StoreError, Version, store::FlightStore};

/// In-memory flight store implementation.
///
/// Provides the same optimistic concurrency semantics as the PostgreSQL
/// implementation: the version check and the write happen under one lock.
#[derive(Clone, Default)]
pub struct InMemoryFlightStore {
    flights: Arc<RwLock<HashMap<FlightId, FlightRecord>>>,
}

impl InMemoryFlightStore {
    /// Creates a new empty in-memory flight store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl FlightStore for InMemoryFlightStore {
    async fn insert(&self, mut record: FlightRecord) -> Result<Version> {
        let mut store = self.flights.write().await;

        if store.contains_key(&record.flight_id) {
            return Err(StoreError::FlightAlreadyExists(record.flight_id));
        }

        record.version = Version::first();
        record.updated_at = Utc::now();
        store.insert(record.flight_id, record);

        Ok(Version::first())
    }

    async fn load(&self, flight_id: FlightId) -> Result<Option<FlightRecord>> {
        let store = self.flights.read().await;
        Ok(store.get(&flight_id).cloned())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn commit(&self, mut record: FlightRecord) -> Result<Version> {
        let flight_id = record.flight_id;
        let expected = record.version;

        let mut store = self.flights.write().await;

        let current = store
            .get(&flight_id)
            .ok_or(StoreError::FlightNotFound(flight_id))?;

        if current.version != expected {
            tracing::debug!(
                %flight_id,
                %expected,
                actual = %current.version,
                "stale flight commit rejected"
            );
            return Err(StoreError::ConcurrencyConflict {
                flight_id,
                expected,
                actual: current.version,
            });
        }

        let new_version = expected.next();
        record.version = new_version;
        record.updated_at = Utc::now();
        store.insert(flight_id, record);

        Ok(new_version)
    }

    async fn list(&self) -> Result<Vec<FlightRecord>> {
        let store = self.flights.read().await;
        let mut records: Vec<_> = store.values().cloned().collect();
        records.sort_by_key(|r| r.flight_id);
        Ok(records)
    }
}

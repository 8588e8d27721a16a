use async_trait::async_trait;

use crate::{FlightId, FlightRecord, Result, Version};

/// Core trait for flight store implementations.
///
/// A flight store persists whole flight aggregates and detects stale writes.
/// It holds no locks between a load and the matching commit; instead every
/// commit is conditioned on the version the flight was loaded at.
/// All implementations must be thread-safe (Send + Sync).
#[async_trait]
pub trait FlightStore: Send + Sync {
    /// Stores a newly scheduled flight at [`Version::first`].
    ///
    /// The version carried by `record` is ignored. Fails with
    /// `FlightAlreadyExists` if a flight with the same ID is stored.
    async fn insert(&self, record: FlightRecord) -> Result<Version>;

    /// Loads the current record of a flight.
    ///
    /// Returns None if the flight doesn't exist.
    async fn load(&self, flight_id: FlightId) -> Result<Option<FlightRecord>>;

    /// Commits a mutated flight.
    ///
    /// `record.version` must be the version the flight was loaded at. If the
    /// stored version differs, the commit is rejected with
    /// `ConcurrencyConflict` and nothing is written.
    ///
    /// Returns the new version of the flight after the commit.
    async fn commit(&self, record: FlightRecord) -> Result<Version>;

    /// Returns every stored flight, ordered by flight ID.
    async fn list(&self) -> Result<Vec<FlightRecord>>;

    /// Checks that the store can serve requests.
    async fn ping(&self) -> Result<()>;
}

/// Extension trait providing convenience methods for flight stores.
#[async_trait]
pub trait FlightStoreExt: FlightStore {
    /// Checks if a flight is stored.
    async fn exists(&self, flight_id: FlightId) -> Result<bool> {
        Ok(self.load(flight_id).await?.is_some())
    }

    /// Checks if the store holds no flights at all.
    async fn is_empty(&self) -> Result<bool> {
        Ok(self.list().await?.is_empty())
    }
}

// Blanket implementation for all FlightStore implementations
impl<T: FlightStore + ?Sized> FlightStoreExt for T {}

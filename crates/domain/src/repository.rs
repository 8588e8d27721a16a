//! Loading and conditional committing of flights.

use std::time::Instant;

use common::FlightId;
use flight_store::{FlightRecord, FlightStore, Version};

use crate::error::DomainError;
use crate::flight::{BookingError, Flight};
use crate::retry::RetryPolicy;

/// Result of command execution.
#[derive(Debug)]
pub struct CommandResult {
    /// The flight as committed.
    pub flight: Flight,

    /// The version the flight was committed as.
    pub new_version: Version,

    /// Number of attempts it took, 1 when there was no conflict.
    pub attempts: u32,
}

/// Executes commands against flights held in a [`FlightStore`].
///
/// Each attempt:
/// 1. Loads the flight and remembers the version it was loaded at
/// 2. Runs the command against the in-memory flight
/// 3. Commits the mutated flight on condition that the version is unchanged
///
/// A conflicting commit is retried according to the [`RetryPolicy`].
pub struct FlightRepository<S: FlightStore> {
    store: S,
    retry: RetryPolicy,
}

impl<S: FlightStore> FlightRepository<S> {
    /// Creates a new repository with the default retry policy.
    pub fn new(store: S) -> Self {
        Self::with_retry_policy(store, RetryPolicy::default())
    }

    /// Creates a new repository with the given retry policy.
    pub fn with_retry_policy(store: S, retry: RetryPolicy) -> Self {
        Self { store, retry }
    }

    /// Returns a reference to the underlying flight store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads a flight, returning None if it doesn't exist.
    pub async fn load(&self, flight_id: FlightId) -> Result<Option<Flight>, DomainError> {
        match self.store.load(flight_id).await? {
            Some(record) => Ok(Some(Self::restore(record)?)),
            None => Ok(None),
        }
    }

    /// Loads a flight, failing with `FlightNotFound` if it doesn't exist.
    pub async fn load_required(&self, flight_id: FlightId) -> Result<Flight, DomainError> {
        self.load(flight_id)
            .await?
            .ok_or(DomainError::FlightNotFound(flight_id))
    }

    /// Loads every stored flight.
    pub async fn list(&self) -> Result<Vec<Flight>, DomainError> {
        self.store
            .list()
            .await?
            .into_iter()
            .map(Self::restore)
            .collect()
    }

    /// Stores a newly scheduled flight.
    pub async fn insert(&self, mut flight: Flight) -> Result<Flight, DomainError> {
        let record = FlightRecord::from_state(flight.id(), Version::initial(), &flight)?;
        let version = self.store.insert(record).await?;
        flight.set_version(version);
        Ok(flight)
    }

    /// Commits a flight on condition that it is still at the version it was
    /// loaded at. Returns the new version.
    pub async fn commit(&self, flight: &Flight) -> Result<Version, DomainError> {
        let start = Instant::now();
        let record = FlightRecord::from_state(flight.id(), flight.version(), flight)?;
        let result = self.store.commit(record).await;
        metrics::histogram!("booking_commit_duration_seconds")
            .record(start.elapsed().as_secs_f64());
        Ok(result?)
    }

    /// Executes a command and commits the mutated flight.
    ///
    /// The command function receives a freshly loaded flight on every
    /// attempt and either mutates it or rejects the command. Rejections are
    /// returned as they are and never retried.
    pub async fn execute<F>(
        &self,
        flight_id: FlightId,
        mut command_fn: F,
    ) -> Result<CommandResult, DomainError>
    where
        F: FnMut(&mut Flight) -> Result<(), BookingError> + Send,
    {
        let mut attempt = 1;
        loop {
            let mut flight = self.load_required(flight_id).await?;
            let loaded_version = flight.version();

            command_fn(&mut flight)?;

            match self.commit(&flight).await {
                Ok(new_version) => {
                    flight.set_version(new_version);
                    return Ok(CommandResult {
                        flight,
                        new_version,
                        attempts: attempt,
                    });
                }
                Err(e) if e.is_concurrency_conflict() => {
                    metrics::counter!("booking_conflicts_total").increment(1);
                    if !self.retry.allows_retry(attempt) {
                        return Err(e);
                    }
                    tracing::warn!(
                        %flight_id,
                        %loaded_version,
                        attempt,
                        "flight changed since it was loaded, retrying"
                    );
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }

    fn restore(record: FlightRecord) -> Result<Flight, DomainError> {
        let version = record.version;
        let mut flight: Flight = record.into_state()?;
        flight.set_version(version);
        Ok(flight)
    }
}

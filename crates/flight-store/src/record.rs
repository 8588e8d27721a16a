use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{FlightId, Version};

/// A stored flight: the full aggregate state at a specific version.
///
/// The store never interprets `state`; it only compares versions when a
/// record is committed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlightRecord {
    /// The flight this record belongs to.
    pub flight_id: FlightId,

    /// The version the state was loaded at, or was committed as.
    pub version: Version,

    /// When the record was last written.
    pub updated_at: DateTime<Utc>,

    /// The serialized flight state.
    pub state: serde_json::Value,
}

impl FlightRecord {
    /// Creates a new record.
    pub fn new(flight_id: FlightId, version: Version, state: serde_json::Value) -> Self {
        Self {
            flight_id,
            version,
            updated_at: Utc::now(),
            state,
        }
    }

    /// Creates a record from a serializable state.
    pub fn from_state<T: Serialize>(
        flight_id: FlightId,
        version: Version,
        state: &T,
    ) -> Result<Self, serde_json::Error> {
        Ok(Self {
            flight_id,
            version,
            updated_at: Utc::now(),
            state: serde_json::to_value(state)?,
        })
    }

    /// Deserializes the record state into a concrete type.
    pub fn into_state<T: for<'de> Deserialize<'de>>(self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestState {
        seats: u32,
        airline: String,
    }

    #[test]
    fn record_new() {
        let id = FlightId::new();
        let state = serde_json::json!({"seats": 42});

        let record = FlightRecord::new(id, Version::new(5), state.clone());

        assert_eq!(record.flight_id, id);
        assert_eq!(record.version, Version::new(5));
        assert_eq!(record.state, state);
    }

    #[test]
    fn record_from_state_and_into_state() {
        let id = FlightId::new();
        let original = TestState {
            seats: 42,
            airline: "Deutsche BA".to_string(),
        };

        let record = FlightRecord::from_state(id, Version::first(), &original).unwrap();

        let restored: TestState = record.into_state().unwrap();
        assert_eq!(restored, original);
    }
}

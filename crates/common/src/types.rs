use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a scheduled flight.
///
/// Wraps a UUID so flight identifiers cannot be mixed up with other
/// UUID-based identifiers in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlightId(Uuid);

impl FlightId {
    /// Creates a new random flight ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a flight ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a flight ID from its hyphenated string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl Default for FlightId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for FlightId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for FlightId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<FlightId> for Uuid {
    fn from(id: FlightId) -> Self {
        id.0
    }
}

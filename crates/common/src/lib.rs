//! Shared types for the flight booking workspace.

mod types;

pub use types::FlightId;

pub mod error;
pub mod memory;
pub mod postgres;
pub mod record;
pub mod store;
pub mod version;

pub use common::FlightId;
pub use error::{Result, StoreError};
pub use memory::InMemoryFlightStore;
pub use postgres::PostgresFlightStore;
pub use record::FlightRecord;
pub use store::{FlightStore, FlightStoreExt};
pub use version::Version;

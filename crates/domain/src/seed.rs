//! Demo flights for an empty store.

use chrono::{DateTime, Duration, Utc};
use flight_store::{FlightStore, FlightStoreExt};

use crate::error::DomainError;
use crate::flight::{BookingService, Money, ScheduleFlight, TimePlace};

/// Returns a fixed set of upcoming flights, scheduled relative to `now`.
pub fn demo_flights(now: DateTime<Utc>) -> Vec<ScheduleFlight> {
    let flight = |airline: &str,
                  cents: i64,
                  from: &str,
                  departs_in: Duration,
                  to: &str,
                  duration: Duration,
                  seats: u32| {
        let departure = now + departs_in;
        ScheduleFlight::new(
            airline,
            Money::from_cents(cents),
            TimePlace::new(from, departure),
            TimePlace::new(to, departure + duration),
            seats,
        )
    };

    vec![
        flight(
            "American Airlines",
            25_900,
            "Los Angeles",
            Duration::hours(1),
            "Istanbul",
            Duration::hours(13),
            2,
        ),
        flight(
            "Deutsche BA",
            31_250,
            "Munich",
            Duration::hours(12),
            "Schiphol",
            Duration::hours(2),
            209,
        ),
        flight(
            "British Airways",
            52_075,
            "London, England",
            Duration::hours(24),
            "Vizzola-Ticino",
            Duration::hours(2) + Duration::minutes(30),
            7,
        ),
        flight(
            "Basiq Air",
            73_400,
            "Amsterdam",
            Duration::hours(39),
            "Glasgow, Scotland",
            Duration::hours(1) + Duration::minutes(50),
            2,
        ),
        flight(
            "BB Heliag",
            2_950,
            "Zurich",
            Duration::hours(46),
            "Baku",
            Duration::hours(5),
            8,
        ),
        flight(
            "ABA Air",
            4_800,
            "Praha Ruzyne",
            Duration::hours(56),
            "Paris",
            Duration::hours(2),
            5,
        ),
        flight(
            "AirBaltic",
            11_690,
            "Riga",
            Duration::days(3),
            "Oslo",
            Duration::hours(1) + Duration::minutes(45),
            60,
        ),
        flight(
            "American Airlines",
            79_900,
            "Chicago",
            Duration::days(4),
            "Dallas",
            Duration::hours(2) + Duration::minutes(30),
            100,
        ),
    ]
}

/// Schedules the demo flights if the store holds no flights yet.
///
/// Returns the number of flights scheduled.
pub async fn seed_demo_flights<S: FlightStore>(
    service: &BookingService<S>,
) -> Result<usize, DomainError> {
    if !service.repository().store().is_empty().await? {
        tracing::debug!("store already holds flights, skipping demo seed");
        return Ok(0);
    }

    let flights = demo_flights(Utc::now());
    let count = flights.len();
    for cmd in flights {
        service.schedule_flight(cmd).await?;
    }

    tracing::info!(count, "seeded demo flights");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flight_store::InMemoryFlightStore;

    #[test]
    fn test_demo_flights_are_upcoming_and_bookable() {
        let now = Utc::now();
        let flights = demo_flights(now);

        assert!(!flights.is_empty());
        for f in &flights {
            assert!(f.departure.time > now);
            assert!(f.arrival.time > f.departure.time);
            assert!(f.number_of_seats > 0);
            assert!(f.price.is_positive());
        }
    }

    #[tokio::test]
    async fn test_seed_only_fills_an_empty_store() {
        let service = BookingService::new(InMemoryFlightStore::new());

        let seeded = seed_demo_flights(&service).await.unwrap();
        assert_eq!(seeded, demo_flights(Utc::now()).len());
        assert_eq!(service.list_flights().await.unwrap().len(), seeded);

        assert_eq!(seed_demo_flights(&service).await.unwrap(), 0);
        assert_eq!(service.list_flights().await.unwrap().len(), seeded);
    }
}

//! Value objects for the flight domain.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::BookingError;

/// Email address identifying a passenger.
///
/// Not unique across flights; a passenger may also hold several bookings on
/// the same flight. The address is not checked for shape; surrounding
/// whitespace is the only thing normalised away, and comparison is otherwise
/// exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PassengerEmail(String);

impl PassengerEmail {
    /// Parses a passenger email, trimming surrounding whitespace.
    ///
    /// Fails only if nothing but whitespace is left.
    pub fn parse(raw: &str) -> Result<Self, BookingError> {
        let email = raw.trim();
        if email.is_empty() {
            return Err(BookingError::InvalidPassengerEmail(raw.to_string()));
        }
        Ok(Self(email.to_string()))
    }

    /// Returns the email as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for PassengerEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PassengerEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Creates a new Money amount from a whole dollar value.
    pub fn from_dollars(dollars: i64) -> Self {
        Self {
            cents: dollars * 100,
        }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

/// A place together with the moment a flight leaves or reaches it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimePlace {
    /// City or airport name.
    pub place: String,

    /// Scheduled time in UTC.
    pub time: DateTime<Utc>,
}

impl TimePlace {
    /// Creates a new time and place.
    pub fn new(place: impl Into<String>, time: DateTime<Utc>) -> Self {
        Self {
            place: place.into(),
            time,
        }
    }
}

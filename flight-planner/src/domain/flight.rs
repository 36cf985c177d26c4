//! Scheduled flight records.

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use super::{AirportCode, DomainError};

/// One scheduled flight leg.
///
/// Records are created once at ingest and never mutated afterwards. The
/// schedule index and every trip that uses a flight share it through an
/// `Arc<Flight>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flight {
    /// Flight number, when the source provides one.
    pub flight_no: Option<String>,

    /// Departure airport
    pub origin: AirportCode,

    /// Arrival airport
    pub destination: AirportCode,

    /// Scheduled departure time
    pub departure: NaiveDateTime,

    /// Scheduled arrival time
    pub arrival: NaiveDateTime,

    /// Fare without luggage
    pub base_price: Decimal,

    /// Fare for each checked bag
    pub bag_price: Decimal,

    /// Maximum number of checked bags
    pub bags_allowed: u32,
}

impl Flight {
    /// Checks that the flight arrives strictly after it departs.
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.arrival <= self.departure {
            return Err(DomainError::Integrity {
                origin: self.origin,
                destination: self.destination,
                departure: self.departure,
                arrival: self.arrival,
            });
        }
        Ok(())
    }

    /// Returns the fare for travelling with `bags` checked bags.
    pub fn price_for(&self, bags: u32) -> Decimal {
        self.base_price + Decimal::from(bags) * self.bag_price
    }

    /// Returns true if the flight can carry `bags` checked bags.
    pub fn allows_bags(&self, bags: u32) -> bool {
        self.bags_allowed >= bags
    }
}

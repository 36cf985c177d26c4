//! Domain error types.
//!
//! These errors represent validation failures and broken invariants
//! in the domain layer. They are distinct from ingest and request errors.

use chrono::NaiveDateTime;

use super::AirportCode;

/// Domain-level errors for validation and data consistency.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomainError {
    /// A flight was appended to a trip that does not end where it departs
    #[error("flight departs from {found} but trip ends at {expected}")]
    Connectivity {
        expected: AirportCode,
        found: AirportCode,
    },

    /// A flight cannot carry the number of bags the trip travels with
    #[error("trip carries {bags} bags but flight allows only {allowed}")]
    Capacity { bags: u32, allowed: u32 },

    /// A flight that does not arrive strictly after it departs
    #[error("flight {origin}->{destination} arrives at {arrival}, not after its departure at {departure}")]
    Integrity {
        origin: AirportCode,
        destination: AirportCode,
        departure: NaiveDateTime,
        arrival: NaiveDateTime,
    },
}

//! Domain types for the flight planner.
//!
//! This module contains the core domain model types: airport codes,
//! scheduled flights and the trips built from them. Types enforce their
//! invariants at construction time, so code that receives them can trust
//! their validity.

mod airport;
mod error;
mod flight;
mod trip;

pub use airport::{AirportCode, InvalidAirportCode};
pub use error::DomainError;
pub use flight::Flight;
pub use trip::Trip;

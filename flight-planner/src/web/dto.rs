//! Data transfer objects for web requests and responses.
//!
//! The trip document is also what the command line prints, so both
//! surfaces emit the same JSON.

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Flight, Trip};

/// Timestamp format used in every response.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Request to search for trips.
#[derive(Debug, Deserialize)]
pub struct SearchTripsRequest {
    /// Origin airport code
    pub origin: String,

    /// Destination airport code
    pub destination: String,

    /// Number of checked bags
    #[serde(default)]
    pub bags: u32,

    /// Search a return journey as well
    #[serde(default)]
    pub return_flight: bool,

    /// Further airports the trip may start from
    #[serde(default)]
    pub alt_origins: Vec<String>,

    /// Further airports the outbound journey may end at
    #[serde(default)]
    pub alt_destinations: Vec<String>,

    #[serde(default)]
    pub return_to_other_airport: bool,

    #[serde(default)]
    pub return_from_other_airport: bool,

    /// Minimum layover in minutes (server default when absent)
    pub min_transfer_mins: Option<i64>,

    /// Maximum layover in minutes (server default when absent)
    pub max_transfer_mins: Option<i64>,

    #[serde(default)]
    pub min_days_at_destination: u32,

    pub max_days_at_destination: Option<u32>,

    /// Earliest departure of the first flight
    pub min_departure: Option<NaiveDateTime>,

    /// Latest departure of the first flight
    pub max_departure: Option<NaiveDateTime>,

    /// Maximum transfers per direction
    pub max_transfers: Option<usize>,

    /// Sort keys, e.g. `["total_price", "departure"]`
    pub sort_by: Option<Vec<String>>,
}

/// Response for trip search.
#[derive(Debug, Serialize)]
pub struct SearchTripsResponse {
    /// Found trips, in the requested order
    pub trips: Vec<TripResult>,

    /// Number of routes explored
    pub routes_explored: usize,
}

/// A trip in search results.
///
/// Prices are emitted as JSON numbers.
#[derive(Debug, Serialize)]
pub struct TripResult {
    /// Outbound legs followed by return legs
    pub flights: Vec<FlightResult>,

    /// Smallest bag allowance over all flights
    pub bags_allowed: Option<u32>,

    pub bags_count: u32,

    pub destination: String,

    pub origin: String,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub total_price: Decimal,

    /// First departure to last arrival, e.g. `1 day, 2:05:00`
    pub travel_time: String,
}

/// A flight in a trip.
#[derive(Debug, Serialize)]
pub struct FlightResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flight_no: Option<String>,

    pub origin: String,

    pub destination: String,

    pub departure: String,

    pub arrival: String,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub base_price: Decimal,

    #[serde(serialize_with = "rust_decimal::serde::float::serialize")]
    pub bag_price: Decimal,

    pub bags_allowed: u32,
}

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}

// Conversion implementations

impl TripResult {
    /// Create from a domain Trip.
    pub fn from_trip(trip: &Trip) -> Self {
        Self {
            flights: trip
                .legs()
                .iter()
                .map(|f| FlightResult::from_flight(f))
                .collect(),
            bags_allowed: trip.bags_allowed(),
            bags_count: trip.bags_count(),
            destination: trip.destination().to_string(),
            origin: trip.origin().to_string(),
            total_price: trip.total_price(),
            travel_time: format_travel_time(trip.travel_time()),
        }
    }
}

impl FlightResult {
    /// Create from a domain Flight.
    pub fn from_flight(flight: &Flight) -> Self {
        Self {
            flight_no: flight.flight_no.clone(),
            origin: flight.origin.to_string(),
            destination: flight.destination.to_string(),
            departure: format_timestamp(&flight.departure),
            arrival: format_timestamp(&flight.arrival),
            base_price: flight.base_price,
            bag_price: flight.bag_price,
            bags_allowed: flight.bags_allowed,
        }
    }
}

/// Format a timestamp as `YYYY-MM-DDTHH:MM:SS`.
fn format_timestamp(time: &NaiveDateTime) -> String {
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Format a duration as `H:MM:SS`, with a leading day count once it
/// reaches 24 hours.
pub fn format_travel_time(duration: Duration) -> String {
    let days = duration.num_days();
    let secs = (duration - Duration::days(days)).num_seconds();
    let clock = format!("{}:{:02}:{:02}", secs / 3600, secs % 3600 / 60, secs % 60);

    match days {
        0 => clock,
        1 => format!("1 day, {clock}"),
        n => format!("{n} days, {clock}"),
    }
}

//! Trip types.
//!
//! A `Trip` is a (possibly partial) journey built one flight at a time by
//! the planner. Appending never changes the trip it is called on: each
//! branch of the search owns its own copy, so branches never observe each
//! other's legs.

use std::sync::Arc;

use chrono::{Duration, NaiveDateTime};
use rust_decimal::Decimal;

use super::{AirportCode, DomainError, Flight};

/// A sequence of connecting flights carrying a fixed number of bags.
///
/// # Invariants
///
/// - Within the outbound half, and within the return half, consecutive
///   legs connect (destination of one = origin of the next)
/// - Every leg allows at least `bags_count` bags
/// - `bags_allowed` is the minimum allowance over all legs
#[derive(Debug, Clone)]
pub struct Trip {
    origin: AirportCode,
    destination: AirportCode,
    legs: Vec<Arc<Flight>>,
    total_price: Decimal,
    bags_count: u32,
    bags_allowed: Option<u32>,
    /// Index of the first return leg, set once the return journey begins.
    return_start: Option<usize>,
}

impl Trip {
    /// Creates an empty trip starting at `origin` with `bags` checked bags.
    pub fn new(origin: AirportCode, bags: u32) -> Self {
        Self {
            origin,
            destination: origin,
            legs: Vec::new(),
            total_price: Decimal::ZERO,
            bags_count: bags,
            bags_allowed: None,
            return_start: None,
        }
    }

    /// Returns a new trip extended by `flight`.
    ///
    /// # Errors
    ///
    /// Returns `Err` if:
    /// - the flight does not depart from where the trip currently ends
    /// - the flight allows fewer bags than the trip carries
    ///
    /// # Examples
    ///
    /// ```
    /// use std::sync::Arc;
    /// use flight_planner::domain::{AirportCode, Flight, Trip};
    /// use rust_decimal::Decimal;
    ///
    /// let a = AirportCode::parse("AAA").unwrap();
    /// let b = AirportCode::parse("BBB").unwrap();
    /// let flight = Arc::new(Flight {
    ///     flight_no: None,
    ///     origin: a,
    ///     destination: b,
    ///     departure: "2021-09-01T10:00:00".parse().unwrap(),
    ///     arrival: "2021-09-01T12:00:00".parse().unwrap(),
    ///     base_price: Decimal::from(100),
    ///     bag_price: Decimal::from(10),
    ///     bags_allowed: 2,
    /// });
    ///
    /// let empty = Trip::new(a, 1);
    /// let trip = empty.append(flight).unwrap();
    ///
    /// assert_eq!(trip.destination(), b);
    /// assert_eq!(trip.total_price(), Decimal::from(110));
    /// assert!(empty.legs().is_empty());
    /// ```
    pub fn append(&self, flight: Arc<Flight>) -> Result<Trip, DomainError> {
        if flight.origin != self.destination {
            return Err(DomainError::Connectivity {
                expected: self.destination,
                found: flight.origin,
            });
        }
        if !flight.allows_bags(self.bags_count) {
            return Err(DomainError::Capacity {
                bags: self.bags_count,
                allowed: flight.bags_allowed,
            });
        }

        let mut next = self.clone();
        next.destination = flight.destination;
        next.total_price += flight.price_for(self.bags_count);
        next.bags_allowed = Some(match self.bags_allowed {
            Some(allowed) => allowed.min(flight.bags_allowed),
            None => flight.bags_allowed,
        });
        next.legs.push(flight);
        Ok(next)
    }

    /// Returns a copy of this trip whose return journey departs from `at`.
    ///
    /// Legs appended afterwards form the return half. `at` may differ from
    /// where the outbound half ended when returning from another airport.
    pub fn begin_return(&self, at: AirportCode) -> Trip {
        let mut next = self.clone();
        next.destination = at;
        next.return_start = Some(self.legs.len());
        next
    }

    /// Returns the airport the trip started from.
    pub fn origin(&self) -> AirportCode {
        self.origin
    }

    /// Returns the airport the trip currently ends at.
    pub fn destination(&self) -> AirportCode {
        self.destination
    }

    /// Returns all legs in order.
    pub fn legs(&self) -> &[Arc<Flight>] {
        &self.legs
    }

    /// Returns the legs of the outbound journey.
    pub fn outbound_legs(&self) -> &[Arc<Flight>] {
        let end = self.return_start.unwrap_or(self.legs.len());
        &self.legs[..end]
    }

    /// Returns the legs of the return journey (empty for one-way trips).
    pub fn return_legs(&self) -> &[Arc<Flight>] {
        match self.return_start {
            Some(start) => &self.legs[start..],
            None => &[],
        }
    }

    /// Returns true once the return journey has begun.
    pub fn is_round_trip(&self) -> bool {
        self.return_start.is_some()
    }

    /// Returns the number of changes, counted separately per direction.
    pub fn transfer_count(&self) -> usize {
        self.outbound_legs().len().saturating_sub(1) + self.return_legs().len().saturating_sub(1)
    }

    /// Returns the total price of all legs including bags.
    pub fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Returns the departure time of the first leg.
    pub fn departure(&self) -> Option<NaiveDateTime> {
        self.legs.first().map(|f| f.departure)
    }

    /// Returns the arrival time of the last leg.
    pub fn arrival(&self) -> Option<NaiveDateTime> {
        self.legs.last().map(|f| f.arrival)
    }

    /// Returns the time between first departure and last arrival.
    pub fn travel_time(&self) -> Duration {
        match (self.departure(), self.arrival()) {
            (Some(departure), Some(arrival)) => arrival.signed_duration_since(departure),
            _ => Duration::zero(),
        }
    }

    /// Returns the number of bags carried.
    pub fn bags_count(&self) -> u32 {
        self.bags_count
    }

    /// Returns the lowest bag allowance over all legs.
    pub fn bags_allowed(&self) -> Option<u32> {
        self.bags_allowed
    }
}

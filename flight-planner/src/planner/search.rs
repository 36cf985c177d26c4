//! Depth-first itinerary search.
//!
//! Finds every trip from the requested origins to the requested
//! destinations (and, for round trips, back again) that satisfies the
//! transfer windows, bag count and transfer budget. The search is
//! exhaustive and runs over an explicit stack of partial trips, so deep
//! itineraries cannot overflow the call stack.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, trace};

use crate::domain::{AirportCode, DomainError, Trip};
use crate::schedule::{FlightQuery, ScheduleIndex};

use super::config::SearchConfig;
use super::rank::{SortKey, rank_trips};

/// Error from itinerary search.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SearchError {
    /// A requested airport has no departures in the schedule
    #[error("unknown airport code {0}")]
    UnknownAirport(AirportCode),

    /// The same airport was requested as origin and destination
    #[error("origins and destinations overlap: {}", join_codes(.0))]
    OverlappingAirports(Vec<AirportCode>),

    /// Invalid search request
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Candidate generation offered a flight the trip cannot take
    #[error("search produced an invalid trip: {0}")]
    Domain(#[from] DomainError),
}

fn join_codes(codes: &[AirportCode]) -> String {
    codes
        .iter()
        .map(AirportCode::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Request for itinerary search.
#[derive(Debug, Clone)]
pub struct SearchRequest {
    /// Airports the trip may start from.
    pub origins: Vec<AirportCode>,

    /// Airports the outbound journey may end at.
    pub destinations: Vec<AirportCode>,

    /// Number of checked bags carried on every leg.
    pub bags: u32,

    /// Result order; empty keeps search order.
    pub sort_by: Vec<SortKey>,

    /// Also search a journey back from the destination.
    pub return_flight: bool,

    /// The return journey may end at any requested origin.
    pub return_to_other_airport: bool,

    /// The return journey may start at any requested destination.
    pub return_from_other_airport: bool,

    /// Earliest departure of the first flight.
    pub min_departure: Option<NaiveDateTime>,

    /// Latest departure of the first flight.
    pub max_departure: Option<NaiveDateTime>,

    /// Minimum days between outbound arrival and return departure.
    pub min_days_at_destination: u32,

    /// Maximum days between outbound arrival and return departure.
    pub max_days_at_destination: Option<u32>,
}

impl SearchRequest {
    /// Create a one-way request with default options.
    pub fn new(origins: Vec<AirportCode>, destinations: Vec<AirportCode>) -> Self {
        Self {
            origins,
            destinations,
            bags: 0,
            sort_by: SortKey::defaults(),
            return_flight: false,
            return_to_other_airport: false,
            return_from_other_airport: false,
            min_departure: None,
            max_departure: None,
            min_days_at_destination: 0,
            max_days_at_destination: None,
        }
    }

    /// Validate the search request against the schedule.
    ///
    /// Every requested airport is checked before the overlap test, so an
    /// unknown code is reported even when the lists also overlap.
    pub fn validate(&self, schedule: &ScheduleIndex) -> Result<(), SearchError> {
        if self.origins.is_empty() {
            return Err(SearchError::InvalidRequest(
                "at least one origin is required".to_string(),
            ));
        }
        if self.destinations.is_empty() {
            return Err(SearchError::InvalidRequest(
                "at least one destination is required".to_string(),
            ));
        }

        // Airports with arrivals only are treated as unknown
        if let Some(unknown) = self
            .origins
            .iter()
            .chain(&self.destinations)
            .find(|code| !schedule.contains(code))
        {
            return Err(SearchError::UnknownAirport(*unknown));
        }

        let mut overlap: Vec<AirportCode> = self
            .origins
            .iter()
            .filter(|code| self.destinations.contains(code))
            .copied()
            .collect();
        if !overlap.is_empty() {
            overlap.sort();
            overlap.dedup();
            return Err(SearchError::OverlappingAirports(overlap));
        }

        Ok(())
    }
}

/// Result of itinerary search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Found trips, in the requested order.
    pub trips: Vec<Trip>,

    /// Number of partial trips examined during search.
    pub routes_explored: usize,
}

/// Which half of the journey is being searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    Outbound,
    Return,
}

/// DFS state: a partial trip and the airports it has passed through
/// in the current direction (starting point included).
struct Frame {
    trip: Trip,
    visited: Vec<AirportCode>,
}

/// Itinerary planner over an in-memory schedule.
pub struct Planner<'a> {
    schedule: &'a ScheduleIndex,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(schedule: &'a ScheduleIndex, config: &'a SearchConfig) -> Self {
        Self { schedule, config }
    }

    /// Search for trips matching `request`.
    ///
    /// All validation happens before the search starts; a failure aborts
    /// the whole search with no partial results.
    pub fn search(&self, request: &SearchRequest) -> Result<SearchResult, SearchError> {
        self.validate_config()?;
        request.validate(self.schedule)?;

        let mut routes_explored = 0;

        let mut outbound = Vec::new();
        for origin in &request.origins {
            let seed = Trip::new(*origin, request.bags);
            let found = self.explore(request, Direction::Outbound, seed, &mut routes_explored)?;
            debug!(origin = %origin, trips = found.len(), "Outbound search complete");
            outbound.extend(found);
        }

        let trips = if request.return_flight {
            let mut round_trips = Vec::new();
            for trip in &outbound {
                let starts = if request.return_from_other_airport {
                    request.destinations.clone()
                } else {
                    vec![trip.destination()]
                };

                for start in starts {
                    let seed = trip.begin_return(start);
                    round_trips.extend(self.explore(
                        request,
                        Direction::Return,
                        seed,
                        &mut routes_explored,
                    )?);
                }
            }
            debug!(
                outbound = outbound.len(),
                round_trips = round_trips.len(),
                "Return search complete"
            );
            round_trips
        } else {
            outbound
        };

        let trips = rank_trips(trips, &request.sort_by);
        debug!(trips = trips.len(), routes_explored, "Search complete");

        Ok(SearchResult {
            trips,
            routes_explored,
        })
    }

    fn validate_config(&self) -> Result<(), SearchError> {
        if self.config.min_transfer_mins < 0 {
            return Err(SearchError::InvalidRequest(
                "minimum transfer time must not be negative".to_string(),
            ));
        }
        if self.config.min_transfer_mins > self.config.max_transfer_mins {
            return Err(SearchError::InvalidRequest(
                "minimum transfer time exceeds maximum transfer time".to_string(),
            ));
        }
        if self.config.max_transfer().is_none() {
            return Err(SearchError::InvalidRequest(format!(
                "maximum transfer time of {} minutes is out of range",
                self.config.max_transfer_mins
            )));
        }
        Ok(())
    }

    /// Exhaustively extend `seed` in one direction, returning completed trips
    /// in depth-first order (earlier departures first at every branch).
    fn explore(
        &self,
        request: &SearchRequest,
        direction: Direction,
        seed: Trip,
        routes_explored: &mut usize,
    ) -> Result<Vec<Trip>, SearchError> {
        let mut found = Vec::new();
        let start = seed.destination();
        let mut stack = vec![Frame {
            trip: seed,
            visited: vec![start],
        }];

        while let Some(frame) = stack.pop() {
            *routes_explored += 1;

            if is_complete(request, direction, &frame.trip) {
                found.push(frame.trip);
                continue;
            }

            // Pruning: transfer budget spent
            if !self.config.can_extend(frame.visited.len()) {
                continue;
            }

            let Some((time_from, time_to)) = self.window(request, direction, &frame) else {
                continue;
            };
            let excluded = excluded_destinations(request, direction, &frame.visited);
            let query = FlightQuery::default()
                .between(time_from, time_to)
                .with_bags(request.bags)
                .excluding(&excluded);

            let at = frame.trip.destination();
            let candidates = self.schedule.flights_from(&at, &query);
            trace!(airport = %at, candidates = candidates.len(), "Expanding trip");

            // Pushed in reverse so the earliest departure is popped first
            for flight in candidates.into_iter().rev() {
                let mut visited = frame.visited.clone();
                visited.push(flight.destination);
                stack.push(Frame {
                    trip: frame.trip.append(flight)?,
                    visited,
                });
            }
        }

        Ok(found)
    }

    /// Departure window for the next flight out of the frame's airport.
    ///
    /// Returns `None` when the earliest allowed departure lies beyond the
    /// representable calendar; an upper bound beyond it is left open.
    fn window(
        &self,
        request: &SearchRequest,
        direction: Direction,
        frame: &Frame,
    ) -> Option<(Option<NaiveDateTime>, Option<NaiveDateTime>)> {
        let first_leg = frame.visited.len() == 1;
        if first_leg && direction == Direction::Outbound {
            return Some((request.min_departure, request.max_departure));
        }

        let Some(arrival) = frame.trip.arrival() else {
            return Some((None, None));
        };

        let (earliest, latest) = if first_leg {
            let days = |d: u32| Duration::try_days(i64::from(d));
            (
                days(request.min_days_at_destination),
                request.max_days_at_destination.and_then(days),
            )
        } else {
            (self.config.min_transfer(), self.config.max_transfer())
        };

        let from = earliest.and_then(|d| arrival.checked_add_signed(d))?;
        let to = latest.and_then(|d| arrival.checked_add_signed(d));
        Some((Some(from), to))
    }
}

/// Check if a trip has reached an acceptable end for this direction.
fn is_complete(request: &SearchRequest, direction: Direction, trip: &Trip) -> bool {
    let at = trip.destination();
    match direction {
        Direction::Outbound => request.destinations.contains(&at),
        Direction::Return => {
            at == trip.origin() || (request.return_to_other_airport && request.origins.contains(&at))
        }
    }
}

/// Airports the next flight must not land at.
///
/// Outbound never transfers through a requested origin (starting there
/// would be strictly better); the return journey likewise avoids the
/// alternative destinations when it may start from any of them. Neither
/// direction revisits an airport already on its path.
fn excluded_destinations(
    request: &SearchRequest,
    direction: Direction,
    visited: &[AirportCode],
) -> Vec<AirportCode> {
    let mut excluded = visited.to_vec();
    match direction {
        Direction::Outbound => excluded.extend_from_slice(&request.origins),
        Direction::Return if request.return_from_other_airport => {
            excluded.extend_from_slice(&request.destinations)
        }
        Direction::Return => {}
    }
    excluded
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;

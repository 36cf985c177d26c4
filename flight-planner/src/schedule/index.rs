//! Flight schedule index.
//!
//! Flights are grouped by origin airport and each group is kept sorted by
//! departure time, so "which flights leave X between t0 and t1" is two
//! binary searches plus a scan over the matching slice.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::NaiveDateTime;

use crate::domain::{AirportCode, DomainError, Flight};

/// Filters applied to a departure query.
///
/// All filters compose as a conjunction; `None` imposes no restriction.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlightQuery<'a> {
    /// Earliest departure (inclusive).
    pub time_from: Option<NaiveDateTime>,

    /// Latest departure (inclusive).
    pub time_to: Option<NaiveDateTime>,

    /// Minimum bag allowance.
    pub min_bags: Option<u32>,

    /// Destinations to leave out.
    pub excluded: &'a [AirportCode],
}

impl<'a> FlightQuery<'a> {
    /// Restrict departures to `[from, to]`, either end optional.
    pub fn between(mut self, from: Option<NaiveDateTime>, to: Option<NaiveDateTime>) -> Self {
        self.time_from = from;
        self.time_to = to;
        self
    }

    /// Keep only flights allowing at least `bags` bags.
    pub fn with_bags(mut self, bags: u32) -> Self {
        self.min_bags = Some(bags);
        self
    }

    /// Drop flights landing at any of `airports`.
    pub fn excluding(mut self, airports: &'a [AirportCode]) -> Self {
        self.excluded = airports;
        self
    }

    fn accepts(&self, flight: &Flight) -> bool {
        self.min_bags.is_none_or(|bags| flight.allows_bags(bags))
            && !self.excluded.contains(&flight.destination)
    }
}

/// Departures grouped by origin airport, sorted by departure time.
#[derive(Debug, Default)]
pub struct ScheduleIndex {
    /// Map from origin -> flights departing there, ascending by departure.
    departures: HashMap<AirportCode, Vec<Arc<Flight>>>,

    flight_count: usize,
}

impl ScheduleIndex {
    /// Build the index from ingested flights.
    ///
    /// Flights with equal departure times keep their input order.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::Integrity` for the first flight that does not
    /// arrive strictly after it departs.
    pub fn build(flights: impl IntoIterator<Item = Flight>) -> Result<Self, DomainError> {
        let mut departures: HashMap<AirportCode, Vec<Arc<Flight>>> = HashMap::new();
        let mut flight_count = 0;

        for flight in flights {
            flight.validate()?;
            departures
                .entry(flight.origin)
                .or_default()
                .push(Arc::new(flight));
            flight_count += 1;
        }

        for group in departures.values_mut() {
            group.sort_by_key(|f| f.departure);
        }

        Ok(Self {
            departures,
            flight_count,
        })
    }

    /// Get flights departing `origin` that pass every filter in `query`.
    ///
    /// Unknown origins yield an empty result.
    pub fn flights_from(&self, origin: &AirportCode, query: &FlightQuery<'_>) -> Vec<Arc<Flight>> {
        let Some(group) = self.departures.get(origin) else {
            return Vec::new();
        };

        let start = match query.time_from {
            Some(from) => group.partition_point(|f| f.departure < from),
            None => 0,
        };
        let end = match query.time_to {
            Some(to) => group.partition_point(|f| f.departure <= to),
            None => group.len(),
        };
        if start >= end {
            return Vec::new();
        }

        group[start..end]
            .iter()
            .filter(|f| query.accepts(f))
            .cloned()
            .collect()
    }

    /// Check if any flight departs from `airport`.
    pub fn contains(&self, airport: &AirportCode) -> bool {
        self.departures.contains_key(airport)
    }

    /// Get the number of airports with departures.
    pub fn airport_count(&self) -> usize {
        self.departures.len()
    }

    /// Get the total number of indexed flights.
    pub fn flight_count(&self) -> usize {
        self.flight_count
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use proptest::prelude::*;
    use rust_decimal::Decimal;

    const AIRPORTS: [&str; 4] = ["AAA", "BBB", "CCC", "DDD"];

    fn base() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2021, 9, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    /// (origin idx, destination idx, departure minute, duration minutes, bags)
    fn flight_strategy() -> impl Strategy<Value = Flight> {
        (0usize..4, 0usize..4, 0i64..2880, 1i64..600, 0u32..3).prop_map(
            |(from, to, dep, len, bags)| {
                let departure = base() + Duration::minutes(dep);
                Flight {
                    flight_no: None,
                    origin: AirportCode::parse(AIRPORTS[from]).unwrap(),
                    destination: AirportCode::parse(AIRPORTS[to]).unwrap(),
                    departure,
                    arrival: departure + Duration::minutes(len),
                    base_price: Decimal::from(10),
                    bag_price: Decimal::from(1),
                    bags_allowed: bags,
                }
            },
        )
    }

    fn window_strategy() -> impl Strategy<Value = (Option<i64>, Option<i64>)> {
        (
            proptest::option::of(0i64..2880),
            proptest::option::of(0i64..2880),
        )
    }

    proptest! {
        /// Every returned flight departs from the queried airport
        #[test]
        fn results_depart_from_origin(
            flights in proptest::collection::vec(flight_strategy(), 0..60),
            origin in 0usize..4,
        ) {
            let index = ScheduleIndex::build(flights).unwrap();
            let origin = AirportCode::parse(AIRPORTS[origin]).unwrap();

            for flight in index.flights_from(&origin, &FlightQuery::default()) {
                prop_assert_eq!(flight.origin, origin);
            }
        }

        /// Range query agrees with a naive linear filter
        #[test]
        fn range_query_matches_linear_filter(
            flights in proptest::collection::vec(flight_strategy(), 0..60),
            origin in 0usize..4,
            (from, to) in window_strategy(),
            bags in proptest::option::of(0u32..3),
        ) {
            let origin = AirportCode::parse(AIRPORTS[origin]).unwrap();
            let from = from.map(|m| base() + Duration::minutes(m));
            let to = to.map(|m| base() + Duration::minutes(m));

            let mut expected: Vec<Flight> = flights
                .iter()
                .filter(|f| f.origin == origin)
                .filter(|f| from.is_none_or(|t| f.departure >= t))
                .filter(|f| to.is_none_or(|t| f.departure <= t))
                .filter(|f| bags.is_none_or(|b| f.bags_allowed >= b))
                .cloned()
                .collect();
            expected.sort_by_key(|f| f.departure);

            let index = ScheduleIndex::build(flights).unwrap();
            let query = FlightQuery {
                time_from: from,
                time_to: to,
                min_bags: bags,
                excluded: &[],
            };
            let found: Vec<Flight> = index
                .flights_from(&origin, &query)
                .iter()
                .map(|f| (**f).clone())
                .collect();

            prop_assert_eq!(found, expected);
        }
    }
}

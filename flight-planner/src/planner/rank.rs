//! Trip ranking for search results.
//!
//! Trips are ordered by a caller-chosen list of attributes, compared
//! lexicographically in the order given.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::domain::Trip;

/// Error returned when a sort key name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sort key {0:?} (expected one of: {names})", names = SortKey::NAMES.join(", "))]
pub struct InvalidSortKey(pub String);

/// A trip attribute results can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortKey {
    TotalPrice,
    Departure,
    Arrival,
    TravelTime,
    BagsAllowed,
    BagsCount,
    Origin,
    Destination,
    Transfers,
}

impl SortKey {
    /// Accepted names, in declaration order.
    pub const NAMES: [&'static str; 9] = [
        "total_price",
        "departure",
        "arrival",
        "travel_time",
        "bags_allowed",
        "bags_count",
        "origin",
        "destination",
        "transfers",
    ];

    const ALL: [SortKey; 9] = [
        SortKey::TotalPrice,
        SortKey::Departure,
        SortKey::Arrival,
        SortKey::TravelTime,
        SortKey::BagsAllowed,
        SortKey::BagsCount,
        SortKey::Origin,
        SortKey::Destination,
        SortKey::Transfers,
    ];

    /// Cheapest first, then earliest departure, then shortest travel time.
    pub fn defaults() -> Vec<SortKey> {
        vec![SortKey::TotalPrice, SortKey::Departure, SortKey::TravelTime]
    }

    /// Returns the snake_case name of this key.
    pub fn name(self) -> &'static str {
        match self {
            SortKey::TotalPrice => "total_price",
            SortKey::Departure => "departure",
            SortKey::Arrival => "arrival",
            SortKey::TravelTime => "travel_time",
            SortKey::BagsAllowed => "bags_allowed",
            SortKey::BagsCount => "bags_count",
            SortKey::Origin => "origin",
            SortKey::Destination => "destination",
            SortKey::Transfers => "transfers",
        }
    }

    /// Compare two trips on this attribute alone (ascending).
    pub fn compare(self, a: &Trip, b: &Trip) -> Ordering {
        match self {
            SortKey::TotalPrice => a.total_price().cmp(&b.total_price()),
            SortKey::Departure => a.departure().cmp(&b.departure()),
            SortKey::Arrival => a.arrival().cmp(&b.arrival()),
            SortKey::TravelTime => a.travel_time().cmp(&b.travel_time()),
            SortKey::BagsAllowed => a.bags_allowed().cmp(&b.bags_allowed()),
            SortKey::BagsCount => a.bags_count().cmp(&b.bags_count()),
            SortKey::Origin => a.origin().cmp(&b.origin()),
            SortKey::Destination => a.destination().cmp(&b.destination()),
            SortKey::Transfers => a.transfer_count().cmp(&b.transfer_count()),
        }
    }
}

impl FromStr for SortKey {
    type Err = InvalidSortKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.name() == s)
            .ok_or_else(|| InvalidSortKey(s.to_string()))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Rank trips by `keys`.
///
/// The sort is stable: trips equal on every key keep their search order.
/// An empty key list leaves the input untouched.
pub fn rank_trips(mut trips: Vec<Trip>, keys: &[SortKey]) -> Vec<Trip> {
    if keys.is_empty() {
        return trips;
    }

    trips.sort_by(|a, b| {
        keys.iter()
            .map(|key| key.compare(a, b))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    });

    trips
}

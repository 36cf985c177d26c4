//! Search configuration for the flight planner.

use chrono::Duration;

/// Configuration parameters for itinerary search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchConfig {
    /// Minimum time between arriving and the next departure (minutes).
    /// Tighter connections are not offered.
    pub min_transfer_mins: i64,

    /// Maximum time between arriving and the next departure (minutes).
    pub max_transfer_mins: i64,

    /// Maximum number of transfers per direction.
    /// `None` leaves the search unbounded, which can explode on dense
    /// schedules.
    pub max_transfers: Option<usize>,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(min_transfer_mins: i64, max_transfer_mins: i64, max_transfers: Option<usize>) -> Self {
        Self {
            min_transfer_mins,
            max_transfer_mins,
            max_transfers,
        }
    }

    /// Returns the minimum transfer time as a Duration, or `None` if it
    /// is too large to represent.
    pub fn min_transfer(&self) -> Option<Duration> {
        Duration::try_minutes(self.min_transfer_mins)
    }

    /// Returns the maximum transfer time as a Duration, or `None` if it
    /// is too large to represent.
    pub fn max_transfer(&self) -> Option<Duration> {
        Duration::try_minutes(self.max_transfer_mins)
    }

    /// Returns true if a trip that has visited `visited` airports
    /// (including its starting point) may take another flight.
    pub fn can_extend(&self, visited: usize) -> bool {
        // visited - 1 flights so far, each but the first a transfer
        self.max_transfers
            .is_none_or(|max| visited.saturating_sub(1) <= max)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            min_transfer_mins: 60,  // 1 hour
            max_transfer_mins: 360, // 6 hours
            max_transfers: None,
        }
    }
}

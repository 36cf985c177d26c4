//! Flight schedule storage.
//!
//! Ingested flights are held in memory in a [`ScheduleIndex`], which answers
//! the departure queries the planner issues at every step of its search.

pub mod ingest;
mod index;

use std::path::Path;

use tracing::info;

pub use index::{FlightQuery, ScheduleIndex};
pub use ingest::IngestError;

impl ScheduleIndex {
    /// Read a CSV schedule file and index it.
    pub fn load_csv(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let flights = ingest::load_csv(path)?;
        let index = Self::build(flights)?;
        info!(
            flights = index.flight_count(),
            airports = index.airport_count(),
            "Loaded flight schedule"
        );
        Ok(index)
    }
}

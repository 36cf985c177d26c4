//! Application state for the web layer.

use std::sync::Arc;

use crate::planner::SearchConfig;
use crate::schedule::ScheduleIndex;

/// Shared application state.
///
/// The schedule is loaded once at startup and only read afterwards.
#[derive(Clone)]
pub struct AppState {
    /// Indexed flight schedule
    pub schedule: Arc<ScheduleIndex>,

    /// Default search configuration; requests may override the transfer
    /// window and budget
    pub config: Arc<SearchConfig>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(schedule: ScheduleIndex, config: SearchConfig) -> Self {
        Self {
            schedule: Arc::new(schedule),
            config: Arc::new(config),
        }
    }
}

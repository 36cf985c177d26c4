//! Web layer for the flight planner.
//!
//! Provides HTTP endpoints for searching trips, and the JSON trip document
//! shared with the command line.

mod dto;
mod routes;
mod state;

pub use dto::*;
pub use routes::create_router;
pub use state::AppState;

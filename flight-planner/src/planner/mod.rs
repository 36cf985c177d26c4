//! Itinerary planner using depth-first search.
//!
//! This module implements the core search that answers:
//! "Which combinations of flights take me from here to there, carrying
//! this many bags?"
//!
//! Every route is explored exhaustively (subject to the transfer windows
//! and transfer budget in [`SearchConfig`]) and the results are ranked by
//! the caller's sort keys.

mod config;
mod rank;
mod search;

pub use config::SearchConfig;
pub use rank::{InvalidSortKey, SortKey, rank_trips};
pub use search::{Planner, SearchError, SearchRequest, SearchResult};

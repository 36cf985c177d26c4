//! Flight itinerary planner.
//!
//! Loads a flight schedule from CSV and answers: "How can I fly from one
//! of these airports to one of those, with this many bags, and back again?"

pub mod cli;
pub mod domain;
pub mod planner;
pub mod schedule;
pub mod web;

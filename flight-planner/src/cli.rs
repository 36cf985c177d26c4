//! Command line interface.
//!
//! `search` runs one query against a CSV schedule and prints the trips as
//! JSON; `serve` loads the schedule once and answers queries over HTTP.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};

use chrono::{Duration, NaiveDateTime};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use crate::domain::AirportCode;
use crate::planner::{Planner, SearchConfig, SearchError, SearchRequest, SortKey};
use crate::schedule::ingest::parse_timestamp;
use crate::schedule::{IngestError, ScheduleIndex};
use crate::web::{AppState, TripResult, create_router};

/// Error from running a command.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("schedule file {} does not exist", .0.display())]
    MissingFile(PathBuf),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Search(#[from] SearchError),

    #[error("failed to encode results: {0}")]
    Json(#[from] serde_json::Error),

    #[error("server error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Parser)]
#[command(name = "flight-planner", version, about = "Search multi-leg flight itineraries")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search trips and print them as JSON
    Search(SearchArgs),

    /// Serve trip searches over HTTP
    Serve(ServeArgs),
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    /// Flight schedule CSV
    pub csv: PathBuf,

    #[arg(value_parser = AirportCode::parse_normalized)]
    pub origin: AirportCode,

    #[arg(value_parser = AirportCode::parse_normalized)]
    pub destination: AirportCode,

    /// Checked bags carried on every flight
    #[arg(long, default_value_t = 0)]
    pub bags: u32,

    /// Also search a journey back
    #[arg(long)]
    pub return_flight: bool,

    /// Further airports the trip may start from
    #[arg(long, num_args = 1.., value_parser = AirportCode::parse_normalized)]
    pub alt_origins: Vec<AirportCode>,

    /// Further airports the trip may fly to
    #[arg(long, num_args = 1.., value_parser = AirportCode::parse_normalized)]
    pub alt_destinations: Vec<AirportCode>,

    /// The return may end at any of the origins
    #[arg(long)]
    pub return_to_other_airport: bool,

    /// The return may start at any of the destinations
    #[arg(long)]
    pub return_from_other_airport: bool,

    /// Shortest layover (HH:MM)
    #[arg(long, value_parser = parse_hhmm, default_value = "01:00")]
    pub min_transfer_time: i64,

    /// Longest layover (HH:MM)
    #[arg(long, value_parser = parse_hhmm, default_value = "06:00")]
    pub max_transfer_time: i64,

    #[arg(long, default_value_t = 0)]
    pub min_days_at_destination: u32,

    #[arg(long)]
    pub max_days_at_destination: Option<u32>,

    /// Earliest departure, e.g. 2021-09-01T06:00:00
    #[arg(long, value_parser = parse_timestamp)]
    pub min_departure: Option<NaiveDateTime>,

    /// Latest departure, e.g. 2021-09-01T22:00:00
    #[arg(long, value_parser = parse_timestamp)]
    pub max_departure: Option<NaiveDateTime>,

    /// Transfers allowed in each direction
    #[arg(long)]
    pub max_transfers: Option<usize>,

    /// Comma-separated sort keys
    #[arg(long, value_delimiter = ',', default_value = "total_price,departure,travel_time")]
    pub sort_by: Vec<SortKey>,
}

impl SearchArgs {
    pub fn to_request(&self) -> SearchRequest {
        let mut origins = vec![self.origin];
        origins.extend(&self.alt_origins);
        let mut destinations = vec![self.destination];
        destinations.extend(&self.alt_destinations);

        let mut request = SearchRequest::new(origins, destinations);
        request.bags = self.bags;
        request.sort_by = self.sort_by.clone();
        request.return_flight = self.return_flight;
        request.return_to_other_airport = self.return_to_other_airport;
        request.return_from_other_airport = self.return_from_other_airport;
        request.min_departure = self.min_departure;
        request.max_departure = self.max_departure;
        request.min_days_at_destination = self.min_days_at_destination;
        request.max_days_at_destination = self.max_days_at_destination;
        request
    }

    pub fn to_config(&self) -> SearchConfig {
        SearchConfig::new(
            self.min_transfer_time,
            self.max_transfer_time,
            self.max_transfers,
        )
    }
}

#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Flight schedule CSV
    pub csv: PathBuf,

    /// Address to listen on
    #[arg(long, default_value = "127.0.0.1:3000")]
    pub addr: SocketAddr,
}

/// Parse a layover given as `HH:MM` into minutes.
pub fn parse_hhmm(s: &str) -> Result<i64, String> {
    let invalid = || format!("invalid duration {s:?}: expected HH:MM");

    let (hours, mins) = s.trim().split_once(':').ok_or_else(invalid)?;
    let hours: i64 = hours.parse().map_err(|_| invalid())?;
    let mins: i64 = mins.parse().map_err(|_| invalid())?;
    if hours < 0 || !(0..60).contains(&mins) {
        return Err(invalid());
    }

    let total = hours
        .checked_mul(60)
        .and_then(|m| m.checked_add(mins))
        .filter(|&m| Duration::try_minutes(m).is_some())
        .ok_or_else(|| format!("duration {s:?} is too long"))?;
    Ok(total)
}

fn load_schedule(path: &Path) -> Result<ScheduleIndex, CliError> {
    if !path.is_file() {
        return Err(CliError::MissingFile(path.to_path_buf()));
    }
    Ok(ScheduleIndex::load_csv(path)?)
}

/// Run a search and render the trips.
pub fn search(args: &SearchArgs) -> Result<Vec<TripResult>, CliError> {
    let schedule = load_schedule(&args.csv)?;
    let config = args.to_config();

    let result = Planner::new(&schedule, &config).search(&args.to_request())?;

    Ok(result.trips.iter().map(TripResult::from_trip).collect())
}

/// Serve searches over HTTP until the process is stopped.
pub async fn serve(args: ServeArgs) -> Result<(), CliError> {
    let schedule = load_schedule(&args.csv)?;
    let app = create_router(AppState::new(schedule, SearchConfig::default()));

    let listener = tokio::net::TcpListener::bind(args.addr).await?;
    info!(addr = %args.addr, "Flight planner listening");
    axum::serve(listener, app).await?;

    Ok(())
}

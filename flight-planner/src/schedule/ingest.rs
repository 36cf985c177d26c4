//! CSV ingest for flight schedules.
//!
//! The header is validated once before any row is read; rows are then
//! coerced field by field into [`Flight`] records.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use tracing::debug;

use crate::domain::{AirportCode, DomainError, Flight};

/// Columns every schedule file must provide.
pub const REQUIRED_COLUMNS: [&str; 7] = [
    "departure",
    "arrival",
    "base_price",
    "bag_price",
    "bags_allowed",
    "origin",
    "destination",
];

/// Optional column carried through to output when present.
const FLIGHT_NO_COLUMN: &str = "flight_no";

/// Errors that can occur while reading a schedule file.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    /// Schedule file could not be opened or read
    #[error("failed to read schedule: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed CSV (e.g. ragged rows)
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Header lacks required columns
    #[error("schedule is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),

    /// A field could not be converted to its expected type
    #[error("line {line}: invalid {field} {value:?}: {reason}")]
    InvalidField {
        line: u64,
        field: &'static str,
        value: String,
        reason: String,
    },

    /// A flight violates a domain invariant
    #[error("inconsistent schedule: {0}")]
    Integrity(#[from] DomainError),
}

/// Positions of the columns we read within each record.
struct Columns {
    departure: usize,
    arrival: usize,
    base_price: usize,
    bag_price: usize,
    bags_allowed: usize,
    origin: usize,
    destination: usize,
    flight_no: Option<usize>,
}

impl Columns {
    fn from_header(header: &csv::StringRecord) -> Result<Self, IngestError> {
        let find = |name: &str| header.iter().position(|h| h.trim() == name);

        let positions = REQUIRED_COLUMNS.map(find);

        let [
            Some(departure),
            Some(arrival),
            Some(base_price),
            Some(bag_price),
            Some(bags_allowed),
            Some(origin),
            Some(destination),
        ] = positions
        else {
            let missing = REQUIRED_COLUMNS
                .iter()
                .zip(positions)
                .filter(|(_, position)| position.is_none())
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(IngestError::MissingColumns(missing));
        };

        Ok(Self {
            departure,
            arrival,
            base_price,
            bag_price,
            bags_allowed,
            origin,
            destination,
            flight_no: find(FLIGHT_NO_COLUMN),
        })
    }
}

/// A single CSV row with its line number for error reporting.
struct Row<'a> {
    record: &'a csv::StringRecord,
    line: u64,
}

impl Row<'_> {
    fn raw(&self, idx: usize) -> &str {
        self.record.get(idx).unwrap_or("").trim()
    }

    fn invalid(&self, field: &'static str, idx: usize, reason: impl ToString) -> IngestError {
        IngestError::InvalidField {
            line: self.line,
            field,
            value: self.raw(idx).to_string(),
            reason: reason.to_string(),
        }
    }

    fn airport(&self, field: &'static str, idx: usize) -> Result<AirportCode, IngestError> {
        AirportCode::parse_normalized(self.raw(idx)).map_err(|e| self.invalid(field, idx, e))
    }

    fn timestamp(&self, field: &'static str, idx: usize) -> Result<NaiveDateTime, IngestError> {
        parse_timestamp(self.raw(idx)).map_err(|e| self.invalid(field, idx, e))
    }

    fn price(&self, field: &'static str, idx: usize) -> Result<Decimal, IngestError> {
        let price: Decimal = self.raw(idx).parse().map_err(|e| self.invalid(field, idx, e))?;
        if price.is_sign_negative() && !price.is_zero() {
            return Err(self.invalid(field, idx, "must not be negative"));
        }
        Ok(price)
    }

    fn count(&self, field: &'static str, idx: usize) -> Result<u32, IngestError> {
        self.raw(idx).parse().map_err(|e| self.invalid(field, idx, e))
    }
}

/// Parse an ISO-8601 date-time without offset.
///
/// Accepts `T` or a space between date and time. Seconds may be left
/// out, and may carry a fraction.
pub fn parse_timestamp(s: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    s.parse::<NaiveDateTime>()
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M"))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M"))
}

/// Read flights from CSV data.
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<Flight>, IngestError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let columns = Columns::from_header(reader.headers()?)?;

    let mut flights = Vec::new();
    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let row = Row {
            record: &record,
            line,
        };

        let flight_no = columns
            .flight_no
            .map(|idx| row.raw(idx))
            .filter(|s| !s.is_empty())
            .map(str::to_string);

        flights.push(Flight {
            flight_no,
            origin: row.airport("origin", columns.origin)?,
            destination: row.airport("destination", columns.destination)?,
            departure: row.timestamp("departure", columns.departure)?,
            arrival: row.timestamp("arrival", columns.arrival)?,
            base_price: row.price("base_price", columns.base_price)?,
            bag_price: row.price("bag_price", columns.bag_price)?,
            bags_allowed: row.count("bags_allowed", columns.bags_allowed)?,
        });
    }

    debug!(flights = flights.len(), "Read schedule CSV");
    Ok(flights)
}

/// Read flights from a CSV file.
pub fn load_csv(path: impl AsRef<Path>) -> Result<Vec<Flight>, IngestError> {
    let file = File::open(path)?;
    read_csv(file)
}

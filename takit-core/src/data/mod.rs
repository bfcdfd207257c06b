//! Data acquisition — the `fetch_data` collaborator that produces the
//! [`OhlcvTable`] the engine reads.
//!
//! Two offline sources: a CSV file per ticker and interval, and a
//! deterministic synthetic random walk for demos and tests.

pub mod csv_file;
pub mod synthetic;

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::domain::OhlcvTable;

pub use csv_file::{csv_path, parse_timestamp, read_bars};
pub use synthetic::synthetic_bars;

/// Errors raised while loading or validating market data.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("duplicate timestamp {timestamp}")]
    DuplicateTimestamp { timestamp: NaiveDateTime },

    #[error("timestamps out of order at row {index} ({timestamp})")]
    Unordered {
        index: usize,
        timestamp: NaiveDateTime,
    },

    #[error("no data file at {}", .0.display())]
    NotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("row {row}: {reason}")]
    Parse { row: usize, reason: String },

    #[error("invalid date range: {start} is after {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("no bars for {ticker} between {start} and {end}")]
    Empty {
        ticker: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("unknown {kind}: {value}")]
    Unknown { kind: &'static str, value: String },
}

/// Where bars come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSource {
    #[default]
    Csv,
    Synthetic,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Csv => write!(f, "csv"),
            DataSource::Synthetic => write!(f, "synthetic"),
        }
    }
}

impl FromStr for DataSource {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(DataSource::Csv),
            "synthetic" | "synth" => Ok(DataSource::Synthetic),
            _ => Err(DataError::Unknown {
                kind: "data source",
                value: s.to_string(),
            }),
        }
    }
}

/// Bar interval.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interval {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minute5,
    #[serde(rename = "15m")]
    Minute15,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "4h")]
    Hour4,
    #[default]
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
}

impl Interval {
    pub const ALL: [Interval; 7] = [
        Interval::Minute1,
        Interval::Minute5,
        Interval::Minute15,
        Interval::Hour1,
        Interval::Hour4,
        Interval::Day1,
        Interval::Week1,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interval::Minute1 => "1m",
            Interval::Minute5 => "5m",
            Interval::Minute15 => "15m",
            Interval::Hour1 => "1h",
            Interval::Hour4 => "4h",
            Interval::Day1 => "1d",
            Interval::Week1 => "1w",
        }
    }

    /// Time between consecutive bars.
    pub fn step(&self) -> Duration {
        match self {
            Interval::Minute1 => Duration::minutes(1),
            Interval::Minute5 => Duration::minutes(5),
            Interval::Minute15 => Duration::minutes(15),
            Interval::Hour1 => Duration::hours(1),
            Interval::Hour4 => Duration::hours(4),
            Interval::Day1 => Duration::days(1),
            Interval::Week1 => Duration::weeks(1),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Interval {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Interval::ALL
            .into_iter()
            .find(|i| i.as_str() == wanted)
            .ok_or_else(|| DataError::Unknown {
                kind: "interval",
                value: s.to_string(),
            })
    }
}

/// Load `[start, end]` (inclusive calendar days) of `ticker` bars.
pub fn fetch_data(
    source: DataSource,
    data_dir: &Path,
    ticker: &str,
    interval: Interval,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<OhlcvTable, DataError> {
    if start > end {
        return Err(DataError::InvalidRange { start, end });
    }

    let bars = match source {
        DataSource::Csv => {
            let path = csv_path(data_dir, ticker, interval);
            if !path.exists() {
                return Err(DataError::NotFound(path));
            }
            let file = std::fs::File::open(&path).map_err(|source| DataError::Io {
                path: path.clone(),
                source,
            })?;
            read_bars(file)?
        }
        DataSource::Synthetic => synthetic_bars(ticker, interval, start, end),
    };

    let table = OhlcvTable::from_unsorted(bars)?.between(start, end);
    if table.is_empty() {
        return Err(DataError::Empty {
            ticker: ticker.to_string(),
            start,
            end,
        });
    }
    info!(
        %source,
        ticker,
        %interval,
        rows = table.len(),
        "loaded bars"
    );
    Ok(table)
}

//! CSV bars: `{data_dir}/{TICKER}_{interval}.csv` with a
//! `timestamp,open,high,low,close,volume` header.

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Deserialize;

use super::{DataError, Interval};
use crate::domain::Bar;

#[derive(Debug, Deserialize)]
struct CsvRow {
    timestamp: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

pub fn csv_path(data_dir: &Path, ticker: &str, interval: Interval) -> PathBuf {
    data_dir.join(format!("{}_{}.csv", ticker.to_ascii_uppercase(), interval))
}

/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS`, `YYYY-MM-DDTHH:MM:SS` and
/// RFC 3339 (converted to UTC).
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.naive_utc());
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Parse every row; rows keep file order. A bar whose high/low do not bound
/// its open/close (or with a missing field) fails with [`DataError::Parse`].
pub fn read_bars<R: Read>(reader: R) -> Result<Vec<Bar>, DataError> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut bars = Vec::new();
    for (row, record) in rdr.deserialize::<CsvRow>().enumerate() {
        let record = record?;
        let timestamp = parse_timestamp(&record.timestamp).ok_or_else(|| DataError::Parse {
            row: row + 1,
            reason: format!("unrecognized timestamp `{}`", record.timestamp),
        })?;
        let bar = Bar {
            timestamp,
            open: record.open,
            high: record.high,
            low: record.low,
            close: record.close,
            volume: record.volume,
        };
        if !bar.is_sane() {
            return Err(DataError::Parse {
                row: row + 1,
                reason: format!(
                    "inconsistent bar at {timestamp}: open={} high={} low={} close={} volume={}",
                    bar.open, bar.high, bar.low, bar.close, bar.volume
                ),
            });
        }
        bars.push(bar);
    }
    Ok(bars)
}

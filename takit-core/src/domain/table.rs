//! OHLCV table — the caller-owned input every indicator reads.
//!
//! Stored column-wise so indicators borrow `&[f64]` slices without copying.
//! Construction enforces an ascending, duplicate-free timestamp index; the
//! engine never re-validates and never writes into the table.

use chrono::{NaiveDate, NaiveDateTime};

use super::Bar;
use crate::data::DataError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OhlcvTable {
    timestamps: Vec<NaiveDateTime>,
    open: Vec<f64>,
    high: Vec<f64>,
    low: Vec<f64>,
    close: Vec<f64>,
    volume: Vec<f64>,
}

impl OhlcvTable {
    /// Build a table from bars that are already sorted ascending.
    pub fn from_bars(bars: Vec<Bar>) -> Result<Self, DataError> {
        let mut table = Self {
            timestamps: Vec::with_capacity(bars.len()),
            open: Vec::with_capacity(bars.len()),
            high: Vec::with_capacity(bars.len()),
            low: Vec::with_capacity(bars.len()),
            close: Vec::with_capacity(bars.len()),
            volume: Vec::with_capacity(bars.len()),
        };

        for (index, bar) in bars.into_iter().enumerate() {
            if let Some(prev) = table.timestamps.last() {
                if bar.timestamp == *prev {
                    return Err(DataError::DuplicateTimestamp {
                        timestamp: bar.timestamp,
                    });
                }
                if bar.timestamp < *prev {
                    return Err(DataError::Unordered {
                        index,
                        timestamp: bar.timestamp,
                    });
                }
            }
            table.timestamps.push(bar.timestamp);
            table.open.push(bar.open);
            table.high.push(bar.high);
            table.low.push(bar.low);
            table.close.push(bar.close);
            table.volume.push(bar.volume);
        }

        Ok(table)
    }

    /// Sort bars by timestamp, then build the table. Duplicates still fail.
    pub fn from_unsorted(mut bars: Vec<Bar>) -> Result<Self, DataError> {
        bars.sort_by_key(|b| b.timestamp);
        Self::from_bars(bars)
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn timestamps(&self) -> &[NaiveDateTime] {
        &self.timestamps
    }

    pub fn open(&self) -> &[f64] {
        &self.open
    }

    pub fn high(&self) -> &[f64] {
        &self.high
    }

    pub fn low(&self) -> &[f64] {
        &self.low
    }

    pub fn close(&self) -> &[f64] {
        &self.close
    }

    pub fn volume(&self) -> &[f64] {
        &self.volume
    }

    /// First `n` rows as a new table (used by look-ahead checks).
    pub fn head(&self, n: usize) -> Self {
        let n = n.min(self.len());
        Self {
            timestamps: self.timestamps[..n].to_vec(),
            open: self.open[..n].to_vec(),
            high: self.high[..n].to_vec(),
            low: self.low[..n].to_vec(),
            close: self.close[..n].to_vec(),
            volume: self.volume[..n].to_vec(),
        }
    }

    /// Keep only rows whose date falls in `start..=end`.
    pub fn between(&self, start: NaiveDate, end: NaiveDate) -> Self {
        let keep: Vec<usize> = self
            .timestamps
            .iter()
            .enumerate()
            .filter(|(_, ts)| (start..=end).contains(&ts.date()))
            .map(|(i, _)| i)
            .collect();
        let pick = |col: &[f64]| keep.iter().map(|&i| col[i]).collect::<Vec<f64>>();
        Self {
            timestamps: keep.iter().map(|&i| self.timestamps[i]).collect(),
            open: pick(&self.open),
            high: pick(&self.high),
            low: pick(&self.low),
            close: pick(&self.close),
            volume: pick(&self.volume),
        }
    }
}

//! Output frame — a timestamp index plus ordered, uniquely named columns.
//!
//! Indicator outputs are concatenated column-wise into one frame. Every
//! column has exactly one value per index entry; a column whose name is
//! already taken is stored under `{name}_2`, `{name}_3`, ...

use chrono::{NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::io::Write;

use crate::domain::{Column, IndicatorOutput, OhlcvTable};
use crate::error::{ensure_aligned, EngineError};

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Frame {
    index: Vec<NaiveDateTime>,
    columns: Vec<Column>,
}

impl Frame {
    /// Empty frame over an index.
    pub fn new(index: Vec<NaiveDateTime>) -> Self {
        Self {
            index,
            columns: Vec::new(),
        }
    }

    /// Frame holding the table's index and its OHLCV columns.
    pub fn from_table(table: &OhlcvTable) -> Self {
        Self {
            index: table.timestamps().to_vec(),
            columns: vec![
                Column::new("open", table.open().to_vec()),
                Column::new("high", table.high().to_vec()),
                Column::new("low", table.low().to_vec()),
                Column::new("close", table.close().to_vec()),
                Column::new("volume", table.volume().to_vec()),
            ],
        }
    }

    /// Frame over the table's index carrying one indicator output.
    pub fn from_output(table: &OhlcvTable, output: IndicatorOutput) -> Result<Self, EngineError> {
        let mut frame = Self::new(table.timestamps().to_vec());
        frame.push_output(output)?;
        Ok(frame)
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Append a column; returns the name it was stored under.
    pub fn push_column(&mut self, column: Column) -> Result<String, EngineError> {
        ensure_aligned(self.len(), column.len())?;
        let name = self.unique_name(&column.name);
        self.columns.push(Column::new(name.clone(), column.values));
        Ok(name)
    }

    /// Append every column of an indicator output.
    pub fn push_output(&mut self, output: IndicatorOutput) -> Result<Vec<String>, EngineError> {
        // Check all columns first so a failure leaves the frame untouched.
        for column in &output.columns {
            ensure_aligned(self.len(), column.len())?;
        }
        output
            .columns
            .into_iter()
            .map(|c| self.push_column(c))
            .collect()
    }

    /// Append columns under a `{prefix}_` alias (used for comparison sources).
    pub fn push_prefixed(
        &mut self,
        prefix: &str,
        columns: Vec<Column>,
    ) -> Result<Vec<String>, EngineError> {
        let renamed = columns
            .into_iter()
            .map(|c| Column::new(format!("{prefix}_{}", c.name), c.values))
            .collect();
        self.push_output(IndicatorOutput::from_columns(renamed))
    }

    /// Left join on the timestamp index: rows of `self` without a match in
    /// `other` receive NaN.
    pub fn join(&mut self, other: &Frame) -> Result<Vec<String>, EngineError> {
        let positions: HashMap<NaiveDateTime, usize> = other
            .index
            .iter()
            .enumerate()
            .map(|(i, ts)| (*ts, i))
            .collect();
        let rows: Vec<Option<usize>> = self.index.iter().map(|ts| positions.get(ts).copied()).collect();

        let joined = other
            .columns
            .iter()
            .map(|c| {
                let values = rows
                    .iter()
                    .map(|row| row.map_or(f64::NAN, |r| c.values[r]))
                    .collect();
                Column::new(c.name.clone(), values)
            })
            .collect();
        self.push_output(IndicatorOutput::from_columns(joined))
    }

    /// New frame holding only the given rows, in the given order.
    pub fn take_rows(&self, rows: &[usize]) -> Frame {
        let rows: Vec<usize> = rows.iter().copied().filter(|&r| r < self.len()).collect();
        Frame {
            index: rows.iter().map(|&r| self.index[r]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| Column::new(c.name.clone(), rows.iter().map(|&r| c.values[r]).collect()))
                .collect(),
        }
    }

    /// Rows where every named column is defined. An empty list checks all columns.
    pub fn drop_undefined(&self, columns: &[&str]) -> Result<Frame, EngineError> {
        let checked: Vec<&Column> = if columns.is_empty() {
            self.columns.iter().collect()
        } else {
            columns
                .iter()
                .map(|name| {
                    self.column(name)
                        .ok_or_else(|| EngineError::MissingColumn(name.to_string()))
                })
                .collect::<Result<_, _>>()?
        };
        let rows: Vec<usize> = (0..self.len())
            .filter(|&r| checked.iter().all(|c| !c.values[r].is_nan()))
            .collect();
        Ok(self.take_rows(&rows))
    }

    /// Rows where `column` is non-zero (and defined).
    pub fn drop_zero(&self, column: &str) -> Result<Frame, EngineError> {
        let signal = self
            .column(column)
            .ok_or_else(|| EngineError::MissingColumn(column.to_string()))?;
        let rows: Vec<usize> = signal
            .values
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is_nan() && **v != 0.0)
            .map(|(r, _)| r)
            .collect();
        Ok(self.take_rows(&rows))
    }

    /// Last `n` rows.
    pub fn tail(&self, n: usize) -> Frame {
        let start = self.len().saturating_sub(n);
        let rows: Vec<usize> = (start..self.len()).collect();
        self.take_rows(&rows)
    }

    /// Write as CSV with a leading `timestamp` column; undefined values are empty.
    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut wtr = csv::Writer::from_writer(writer);
        let mut header = vec!["timestamp"];
        header.extend(self.column_names());
        wtr.write_record(&header)?;

        let date_only = self.is_date_only();
        for row in 0..self.len() {
            let mut record = vec![format_timestamp(&self.index[row], date_only)];
            record.extend(self.columns.iter().map(|c| {
                let v = c.values[row];
                if v.is_nan() {
                    String::new()
                } else {
                    v.to_string()
                }
            }));
            wtr.write_record(&record)?;
        }
        wtr.flush()?;
        Ok(())
    }

    fn unique_name(&self, name: &str) -> String {
        if self.column(name).is_none() {
            return name.to_string();
        }
        (2..)
            .map(|n| format!("{name}_{n}"))
            .find(|candidate| self.column(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    fn is_date_only(&self) -> bool {
        self.index
            .iter()
            .all(|ts| ts.hour() == 0 && ts.minute() == 0 && ts.second() == 0)
    }
}

fn format_timestamp(ts: &NaiveDateTime, date_only: bool) -> String {
    if date_only {
        ts.format("%Y-%m-%d").to_string()
    } else {
        ts.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

fn format_value(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v:.4}")
    }
}

/// Aligned text table, one row per bar.
impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let date_only = self.is_date_only();
        let stamps: Vec<String> = self
            .index
            .iter()
            .map(|ts| format_timestamp(ts, date_only))
            .collect();
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| c.values.iter().map(|&v| format_value(v)).collect())
            .collect();

        let stamp_width = stamps.iter().map(String::len).max().unwrap_or(0).max(9);
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, col)| {
                col.iter()
                    .map(String::len)
                    .max()
                    .unwrap_or(0)
                    .max(c.name.len())
            })
            .collect();

        write!(f, "{:<stamp_width$}", "timestamp")?;
        for (c, w) in self.columns.iter().zip(&widths) {
            write!(f, "  {:>w$}", c.name, w = *w)?;
        }
        writeln!(f)?;

        for (row, stamp) in stamps.iter().enumerate() {
            write!(f, "{stamp:<stamp_width$}")?;
            for (col, w) in cells.iter().zip(&widths) {
                write!(f, "  {:>w$}", col[row], w = *w)?;
            }
            writeln!(f)?;
        }
        write!(f, "[{} rows x {} columns]", self.len(), self.columns.len())
    }
}

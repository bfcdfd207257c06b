//! Comparison harness — side-by-side reference columns for manual diffing.
//!
//! A [`ReferenceSource`] computes an indicator independently of the engine;
//! the harness appends its columns under a `{source}_` prefix. Nothing here
//! checks tolerances and nothing in the engine depends on this module.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use thiserror::Error;
use tracing::{debug, warn};

use crate::data::parse_timestamp;
use crate::domain::{Column, OhlcvTable};
use crate::frame::Frame;

#[derive(Debug, Error)]
pub enum ComparisonError {
    #[error("failed to read reference file {}: {message}", path.display())]
    Read { path: PathBuf, message: String },

    #[error("reference file {}: row {row}: {reason}", path.display())]
    Parse {
        path: PathBuf,
        row: usize,
        reason: String,
    },

    #[error("cannot append {provider} columns: {reason}")]
    Append { provider: String, reason: String },
}

/// An independent implementation of some indicators.
pub trait ReferenceSource: Send + Sync {
    /// Column prefix, e.g. `"naive"`.
    fn source(&self) -> &str;

    /// Reference columns for `name`, or `None` when this source does not
    /// implement it.
    fn compute(
        &self,
        name: &str,
        table: &OhlcvTable,
        length: usize,
    ) -> Option<Result<Vec<Column>, ComparisonError>>;
}

/// Runs every registered source and appends whatever they produce.
#[derive(Default)]
pub struct ComparisonHarness {
    sources: Vec<Box<dyn ReferenceSource>>,
}

impl ComparisonHarness {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Box<dyn ReferenceSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn sources(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.source()).collect()
    }

    /// Append reference columns for one indicator; returns the stored names.
    pub fn append(
        &self,
        frame: &mut Frame,
        table: &OhlcvTable,
        name: &str,
        length: usize,
    ) -> Result<Vec<String>, ComparisonError> {
        let mut appended = Vec::new();
        for source in &self.sources {
            let Some(columns) = source.compute(name, table, length) else {
                debug!(source = source.source(), indicator = name, "no reference");
                continue;
            };
            let stored = frame
                .push_prefixed(source.source(), columns?)
                .map_err(|e| ComparisonError::Append {
                    provider: source.source().to_string(),
                    reason: e.to_string(),
                })?;
            appended.extend(stored);
        }
        Ok(appended)
    }
}

impl fmt::Debug for ComparisonHarness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComparisonHarness")
            .field("sources", &self.sources())
            .finish()
    }
}

// ─── Naive reference ─────────────────────────────────────────────────

/// Textbook loops, one indicator at a time, with no shared kernels.
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveReference;

impl ReferenceSource for NaiveReference {
    fn source(&self) -> &str {
        "naive"
    }

    fn compute(
        &self,
        name: &str,
        table: &OhlcvTable,
        length: usize,
    ) -> Option<Result<Vec<Column>, ComparisonError>> {
        if length == 0 {
            return None;
        }
        let close = table.close();
        let columns = match name {
            "sma" => vec![Column::new(format!("SMA{length}"), naive_sma(close, length))],
            "ema" => vec![Column::new(format!("EMA{length}"), naive_ema(close, length))],
            "rsi" => vec![Column::new(format!("RSI{length}"), naive_rsi(close, length))],
            "atr" => vec![Column::new(
                format!("ATR{length}"),
                naive_atr(table.high(), table.low(), close, length),
            )],
            "bb" => {
                let (lower, middle, upper) = naive_bollinger(close, length, 2.0);
                vec![
                    Column::new("BBL", lower),
                    Column::new("BBM", middle),
                    Column::new("BBU", upper),
                ]
            }
            _ => return None,
        };
        Some(Ok(columns))
    }
}

fn naive_sma(close: &[f64], length: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; close.len()];
    for i in (length - 1)..close.len() {
        let mut sum = 0.0;
        for value in &close[i + 1 - length..=i] {
            sum += value;
        }
        out[i] = sum / length as f64;
    }
    out
}

fn naive_ema(close: &[f64], length: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; close.len()];
    if close.len() < length {
        return out;
    }
    let alpha = 2.0 / (length as f64 + 1.0);
    let mut prev = close[..length].iter().sum::<f64>() / length as f64;
    out[length - 1] = prev;
    for i in length..close.len() {
        prev = alpha * close[i] + (1.0 - alpha) * prev;
        out[i] = prev;
    }
    out
}

fn naive_rsi(close: &[f64], length: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; close.len()];
    if close.len() <= length {
        return out;
    }
    let mut gain = 0.0;
    let mut loss = 0.0;
    for i in 1..=length {
        let change = close[i] - close[i - 1];
        if change > 0.0 {
            gain += change;
        } else {
            loss -= change;
        }
    }
    gain /= length as f64;
    loss /= length as f64;
    out[length] = rsi_value(gain, loss);

    let n = length as f64;
    for i in (length + 1)..close.len() {
        let change = close[i] - close[i - 1];
        gain = (gain * (n - 1.0) + change.max(0.0)) / n;
        loss = (loss * (n - 1.0) + (-change).max(0.0)) / n;
        out[i] = rsi_value(gain, loss);
    }
    out
}

fn rsi_value(gain: f64, loss: f64) -> f64 {
    if loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + gain / loss)
    }
}

fn naive_atr(high: &[f64], low: &[f64], close: &[f64], length: usize) -> Vec<f64> {
    let mut out = vec![f64::NAN; close.len()];
    if close.len() <= length {
        return out;
    }
    let tr = |i: usize| {
        let prev = close[i - 1];
        (high[i] - low[i])
            .max((high[i] - prev).abs())
            .max((low[i] - prev).abs())
    };
    let mut atr = (1..=length).map(tr).sum::<f64>() / length as f64;
    out[length] = atr;
    let n = length as f64;
    for i in (length + 1)..close.len() {
        atr = (atr * (n - 1.0) + tr(i)) / n;
        out[i] = atr;
    }
    out
}

fn naive_bollinger(close: &[f64], length: usize, k: f64) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
    let middle = naive_sma(close, length);
    let mut lower = vec![f64::NAN; close.len()];
    let mut upper = vec![f64::NAN; close.len()];
    for i in (length - 1)..close.len() {
        let window = &close[i + 1 - length..=i];
        let variance = window
            .iter()
            .map(|v| (v - middle[i]).powi(2))
            .sum::<f64>()
            / length as f64;
        let sd = variance.sqrt();
        lower[i] = middle[i] - k * sd;
        upper[i] = middle[i] + k * sd;
    }
    (lower, middle, upper)
}

// ─── CSV reference ───────────────────────────────────────────────────

/// Columns exported by another tool, joined onto the table by timestamp.
///
/// The file's first column is the timestamp; every other column is a
/// reference series. A request for `rsi` with length 14 picks the columns
/// whose names start with `RSI14` (case-insensitive); length-agnostic
/// outputs (`BBL`, `BBM`, `BBU`) are matched by their short name.
#[derive(Debug, Clone)]
pub struct CsvReference {
    label: String,
    frame: Frame,
}

impl CsvReference {
    pub fn load(label: impl Into<String>, path: &Path) -> Result<Self, ComparisonError> {
        let read_err = |e: &dyn fmt::Display| ComparisonError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        };
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| read_err(&e))?;
        let headers: Vec<String> = rdr
            .headers()
            .map_err(|e| read_err(&e))?
            .iter()
            .skip(1)
            .map(str::to_string)
            .collect();

        let mut index: Vec<NaiveDateTime> = Vec::new();
        let mut values: Vec<Vec<f64>> = vec![Vec::new(); headers.len()];
        for (row, record) in rdr.records().enumerate() {
            let record = record.map_err(|e| read_err(&e))?;
            let parse_err = |reason: String| ComparisonError::Parse {
                path: path.to_path_buf(),
                row: row + 1,
                reason,
            };
            let raw_ts = record.get(0).unwrap_or_default();
            let ts = parse_timestamp(raw_ts)
                .ok_or_else(|| parse_err(format!("unrecognized timestamp `{raw_ts}`")))?;
            index.push(ts);
            for (col, series) in values.iter_mut().enumerate() {
                let raw = record.get(col + 1).unwrap_or_default();
                let value = if raw.is_empty() || raw.eq_ignore_ascii_case("nan") {
                    f64::NAN
                } else {
                    raw.parse::<f64>()
                        .map_err(|e| parse_err(format!("`{raw}`: {e}")))?
                };
                series.push(value);
            }
        }

        let mut frame = Frame::new(index);
        for (name, series) in headers.into_iter().zip(values) {
            frame
                .push_column(Column::new(name, series))
                .map_err(|e| read_err(&e))?;
        }
        Ok(Self {
            label: label.into(),
            frame,
        })
    }

    fn matching(&self, name: &str, length: usize) -> Vec<&Column> {
        let wanted: Vec<String> = match name {
            "bb" => vec!["bbl".into(), "bbm".into(), "bbu".into()],
            _ => short_name(name)
                .map(|short| vec![format!("{short}{length}").to_ascii_lowercase()])
                .unwrap_or_default(),
        };
        self.frame
            .columns()
            .iter()
            .filter(|c| {
                let lower = c.name.to_ascii_lowercase();
                wanted.iter().any(|w| lower.starts_with(w.as_str()))
            })
            .collect()
    }
}

fn short_name(name: &str) -> Option<&'static str> {
    Some(match name {
        "sma" => "SMA",
        "ema" => "EMA",
        "rsi" => "RSI",
        "mad" => "MAD",
        "atr" => "ATR",
        "wr" => "WR",
        "wvf" => "WVF",
        "ma_streak" => "MAStreak",
        _ => return None,
    })
}

impl ReferenceSource for CsvReference {
    fn source(&self) -> &str {
        &self.label
    }

    fn compute(
        &self,
        name: &str,
        table: &OhlcvTable,
        length: usize,
    ) -> Option<Result<Vec<Column>, ComparisonError>> {
        let matched = self.matching(name, length);
        if matched.is_empty() {
            return None;
        }

        let positions: HashMap<NaiveDateTime, usize> = self
            .frame
            .index()
            .iter()
            .enumerate()
            .map(|(i, ts)| (*ts, i))
            .collect();
        let rows: Vec<Option<usize>> = table
            .timestamps()
            .iter()
            .map(|ts| positions.get(ts).copied())
            .collect();
        let missing = rows.iter().filter(|r| r.is_none()).count();
        if missing > 0 {
            warn!(
                source = %self.label,
                missing,
                "reference rows missing for some timestamps"
            );
        }

        Some(Ok(matched
            .into_iter()
            .map(|c| {
                let values = rows
                    .iter()
                    .map(|row| row.map_or(f64::NAN, |r| c.values[r]))
                    .collect();
                Column::new(c.name.clone(), values)
            })
            .collect()))
    }
}

//! State-change edges and trigger-row filtering.
//!
//! Trigger filtering is label-based: it picks whole rows out of an
//! already-computed frame and never recomputes a value from the filtered
//! subset.

use tracing::debug;

use crate::error::EngineError;
use crate::frame::Frame;

/// Row indices where the signal differs from its previous defined value.
///
/// The first defined row is always kept; undefined rows never are. Applying
/// this to the selected values again selects all of them.
pub fn trigger_rows(signal: &[f64]) -> Vec<usize> {
    let mut rows = Vec::new();
    let mut prev: Option<f64> = None;
    for (i, &value) in signal.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        if prev != Some(value) {
            rows.push(i);
        }
        prev = Some(value);
    }
    rows
}

/// Keep `state[i]` where it changed from the previous defined state, `0`
/// elsewhere. The first defined row has nothing to change from and is `0`.
pub fn edges(state: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; state.len()];
    let mut prev: Option<f64> = None;
    for (i, &value) in state.iter().enumerate() {
        if value.is_nan() {
            continue;
        }
        result[i] = match prev {
            Some(p) if p != value => value,
            _ => 0.0,
        };
        prev = Some(value);
    }
    result
}

/// Rows of `frame` where `column` changed state, with every column kept.
pub fn filter_trigger_rows(frame: &Frame, column: &str) -> Result<Frame, EngineError> {
    let signal = frame
        .column(column)
        .ok_or_else(|| EngineError::MissingColumn(column.to_string()))?;
    let rows = trigger_rows(&signal.values);
    debug!(
        column,
        kept = rows.len(),
        total = frame.len(),
        "filtered trigger rows"
    );
    Ok(frame.take_rows(&rows))
}

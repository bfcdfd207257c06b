//! Williams %R.
//!
//! WR = 100 * (highest_high - close) / (highest_high - lowest_low) over the
//! trailing window, so 0 means "closed at the high" and 100 "closed at the low".
//! Undefined when the window has no range (highest_high == lowest_low).
//! Lookback: length - 1.

use super::{check_length, Indicator};
use crate::domain::{IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::{ensure_aligned, EngineError};
use crate::window::{rolling_max, rolling_min};

pub fn williams_r(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    length: usize,
) -> Result<Vec<f64>, EngineError> {
    check_length(length)?;
    ensure_aligned(close.len(), high.len())?;
    ensure_aligned(close.len(), low.len())?;

    let highest = rolling_max(high, length);
    let lowest = rolling_min(low, length);

    Ok((0..close.len())
        .map(|i| {
            let range = highest[i] - lowest[i];
            if range == 0.0 {
                f64::NAN
            } else {
                100.0 * (highest[i] - close[i]) / range
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct WilliamsR;

impl Indicator for WilliamsR {
    fn name(&self) -> &'static str {
        "wr"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["williams_r", "williams_percent_r"]
    }

    fn default_length(&self) -> Option<usize> {
        Some(14)
    }

    fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        Ok(self.resolve_length(spec)? - 1)
    }

    fn compute(
        &self,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError> {
        let length = self.resolve_length(spec)?;
        Ok(IndicatorOutput::single(
            format!("WR{length}"),
            williams_r(table.high(), table.low(), table.close(), length)?,
        ))
    }
}

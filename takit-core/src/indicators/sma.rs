//! Simple Moving Average (SMA).
//!
//! Rolling mean of close prices over a lookback window.
//! Lookback: length - 1 (first valid value at index length-1).

use super::{check_length, Indicator};
use crate::domain::{IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::window::rolling_mean;

pub fn sma(close: &[f64], length: usize) -> Result<Vec<f64>, EngineError> {
    check_length(length)?;
    Ok(rolling_mean(close, length))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Sma;

impl Indicator for Sma {
    fn name(&self) -> &'static str {
        "sma"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["simple_moving_average"]
    }

    fn default_length(&self) -> Option<usize> {
        Some(20)
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
            format!("SMA{length}"),
            sma(table.close(), length)?,
        ))
    }
}

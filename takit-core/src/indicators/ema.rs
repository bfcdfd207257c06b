//! Exponential Moving Average (EMA).
//!
//! Recursive: EMA[t] = alpha * close[t] + (1 - alpha) * EMA[t-1], alpha = 2/(length+1).
//! Seed: EMA[length-1] = SMA of the first `length` closes.
//! Lookback: length - 1.

use super::{check_length, Indicator};
use crate::domain::{IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::window::exponential_mean;

pub fn ema(close: &[f64], length: usize) -> Result<Vec<f64>, EngineError> {
    check_length(length)?;
    Ok(exponential_mean(close, length))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Ema;

impl Indicator for Ema {
    fn name(&self) -> &'static str {
        "ema"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["exponential_moving_average"]
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
            format!("EMA{length}"),
            ema(table.close(), length)?,
        ))
    }
}

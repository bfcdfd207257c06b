//! Moving Average Deviation (MAD).
//!
//! close - MA(close, length). With `relative = true` the deviation is
//! expressed as a percentage of the moving average instead.
//! Lookback: length - 1 for every baseline kind.

use super::{check_length, ma_option, Indicator};
use crate::domain::{IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::window::{rolling_deviation, MaKind};

pub fn mad(
    close: &[f64],
    length: usize,
    baseline: MaKind,
    relative: bool,
) -> Result<Vec<f64>, EngineError> {
    check_length(length)?;
    let deviation = rolling_deviation(close, length, baseline);
    if !relative {
        return Ok(deviation);
    }
    // close - dev recovers the baseline without computing it twice.
    Ok(deviation
        .iter()
        .zip(close)
        .map(|(&d, &c)| {
            let base = c - d;
            if base == 0.0 {
                f64::NAN
            } else {
                100.0 * d / base
            }
        })
        .collect())
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Mad;

impl Indicator for Mad {
    fn name(&self) -> &'static str {
        "mad"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["moving_average_deviation"]
    }

    fn default_length(&self) -> Option<usize> {
        Some(140)
    }

    fn options(&self) -> &'static [&'static str] {
        &["ma", "relative"]
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
        let baseline = ma_option(spec, MaKind::Sma)?;
        let relative = spec.flag("relative", false)?;
        Ok(IndicatorOutput::single(
            format!("MAD{length}"),
            mad(table.close(), length, baseline, relative)?,
        ))
    }
}

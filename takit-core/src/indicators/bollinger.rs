//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! - BBM: SMA(close, length)
//! - BBU: BBM + k * stddev(close, length)
//! - BBL: BBM - k * stddev(close, length)
//! - BBW (optional): 100 * (BBU - BBL) / BBM
//! - BBP (optional, %B): (close - BBL) / (BBU - BBL), undefined for zero-width bands
//!
//! Population stddev by default (`ddof = 0`).
//! Lookback: length - 1.

use super::{check_length, Indicator};
use crate::domain::{Column, IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::window::{rolling_mean, rolling_std};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerOutput {
    pub lower: Vec<f64>,
    pub middle: Vec<f64>,
    pub upper: Vec<f64>,
    pub width: Vec<f64>,
    pub percent: Vec<f64>,
}

pub fn bollinger_bands(
    close: &[f64],
    length: usize,
    k: f64,
    ddof: usize,
) -> Result<BollingerOutput, EngineError> {
    check_length(length)?;
    if !k.is_finite() || k < 0.0 {
        return Err(EngineError::invalid("std", "must be a non-negative number"));
    }
    if ddof >= length {
        return Err(EngineError::invalid("ddof", "must be smaller than length"));
    }

    let middle = rolling_mean(close, length);
    let stddev = rolling_std(close, length, ddof);

    let upper: Vec<f64> = middle.iter().zip(&stddev).map(|(m, s)| m + k * s).collect();
    let lower: Vec<f64> = middle.iter().zip(&stddev).map(|(m, s)| m - k * s).collect();

    let width = (0..close.len())
        .map(|i| {
            if middle[i] == 0.0 {
                f64::NAN
            } else {
                100.0 * (upper[i] - lower[i]) / middle[i]
            }
        })
        .collect();
    let percent = (0..close.len())
        .map(|i| {
            let span = upper[i] - lower[i];
            if span == 0.0 {
                f64::NAN
            } else {
                (close[i] - lower[i]) / span
            }
        })
        .collect();

    Ok(BollingerOutput {
        lower,
        middle,
        upper,
        width,
        percent,
    })
}

#[derive(Debug, Clone, Copy, Default)]
pub struct BollingerBands;

impl Indicator for BollingerBands {
    fn name(&self) -> &'static str {
        "bb"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["bollinger_bands"]
    }

    fn default_length(&self) -> Option<usize> {
        Some(20)
    }

    fn options(&self) -> &'static [&'static str] {
        &["std", "ddof", "include_width", "include_percentage"]
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
        let k = spec.number("std", 2.0)?;
        let ddof = spec.number("ddof", 0.0)?;
        if ddof < 0.0 || ddof.fract() != 0.0 {
            return Err(EngineError::invalid("ddof", "must be 0 or a positive integer"));
        }

        let bands = bollinger_bands(table.close(), length, k, ddof as usize)?;

        let mut columns = vec![
            Column::new("BBL", bands.lower),
            Column::new("BBM", bands.middle),
            Column::new("BBU", bands.upper),
        ];
        if spec.flag("include_width", false)? {
            columns.push(Column::new("BBW", bands.width));
        }
        if spec.flag("include_percentage", false)? {
            columns.push(Column::new("BBP", bands.percent));
        }
        Ok(IndicatorOutput::from_columns(columns))
    }
}

//! Bull Market Support Band (BMSB) — the zone between the 20-bar SMA and the
//! 21-bar EMA (on weekly bars in its classic form).
//!
//! Signal: `+1` when close is above the whole band, `-1` below it, `0` inside.
//! With `only_crosses` the signal column keeps only the bars where that state
//! changed. Composite: rows with any undefined column are dropped by the
//! pipeline.

use super::{check_length, Indicator};
use crate::domain::{Column, IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::signals::edges;
use crate::window::{exponential_mean, rolling_mean};

/// `+1` above both bounds, `-1` below both, `0` in between.
pub(crate) fn band_state(value: f64, a: f64, b: f64) -> f64 {
    if value.is_nan() || a.is_nan() || b.is_nan() {
        f64::NAN
    } else if value > a.max(b) {
        1.0
    } else if value < a.min(b) {
        -1.0
    } else {
        0.0
    }
}

/// Returns `(sma, ema, signal)`.
pub fn bull_market_support_band(
    close: &[f64],
    sma_length: usize,
    ema_length: usize,
    only_crosses: bool,
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), EngineError> {
    check_length(sma_length)?;
    check_length(ema_length)?;

    let sma = rolling_mean(close, sma_length);
    let ema = exponential_mean(close, ema_length);
    let state: Vec<f64> = (0..close.len())
        .map(|i| band_state(close[i], sma[i], ema[i]))
        .collect();
    let signal = if only_crosses { edges(&state) } else { state };
    Ok((sma, ema, signal))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Bmsb;

impl Indicator for Bmsb {
    fn name(&self) -> &'static str {
        "bmsb"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["bull_market_support_band"]
    }

    fn default_length(&self) -> Option<usize> {
        None
    }

    fn options(&self) -> &'static [&'static str] {
        &["sma_length", "ema_length", "only_crosses"]
    }

    fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        self.resolve_length(spec)?;
        let sma_length = spec.window("sma_length", 20)?;
        let ema_length = spec.window("ema_length", 21)?;
        Ok(sma_length.max(ema_length) - 1)
    }

    fn compute(
        &self,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError> {
        self.resolve_length(spec)?;
        let sma_length = spec.window("sma_length", 20)?;
        let ema_length = spec.window("ema_length", 21)?;
        let only_crosses = spec.flag("only_crosses", false)?;

        let (sma, ema, signal) =
            bull_market_support_band(table.close(), sma_length, ema_length, only_crosses)?;
        Ok(IndicatorOutput::from_columns(vec![
            Column::new(format!("BMSB_SMA{sma_length}"), sma),
            Column::new(format!("BMSB_EMA{ema_length}"), ema),
            Column::new("BMSB", signal),
        ])
        .into_composite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_table;

    #[test]
    fn band_state_cases() {
        assert_eq!(band_state(10.0, 8.0, 9.0), 1.0);
        assert_eq!(band_state(7.0, 8.0, 9.0), -1.0);
        assert_eq!(band_state(8.5, 9.0, 8.0), 0.0);
        assert!(band_state(8.5, f64::NAN, 8.0).is_nan());
    }

    #[test]
    fn state_and_edges() {
        let closes = [10.0, 10.0, 10.0, 14.0, 16.0, 6.0, 4.0];
        let (_, _, state) = bull_market_support_band(&closes, 2, 2, false).unwrap();
        let (_, _, crosses) = bull_market_support_band(&closes, 2, 2, true).unwrap();
        assert!(state[0].is_nan());
        // Flat close sits on the band
        assert_eq!(state[1], 0.0);
        assert_eq!(&state[3..], &[1.0, 1.0, -1.0, -1.0]);
        assert_eq!(&crosses[1..], &[0.0, 0.0, 1.0, 0.0, -1.0, 0.0]);
    }

    #[test]
    fn default_columns() {
        let table = make_table(&[1.0; 30]);
        let out = Bmsb.compute(&table, &IndicatorSpec::new("bmsb")).unwrap();
        assert_eq!(out.names(), vec!["BMSB_SMA20", "BMSB_EMA21", "BMSB"]);
        assert!(out.composite);
        let max_warmup = out.columns.iter().map(|c| c.warmup()).max().unwrap();
        assert_eq!(max_warmup, Bmsb.lookback(&IndicatorSpec::new("bmsb")).unwrap());
    }
}

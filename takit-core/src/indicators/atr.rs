//! Average True Range (ATR).
//!
//! True Range: max(high-low, |high-prev_close|, |low-prev_close|), undefined at bar 0.
//! ATR smooths TR with Wilder's method by default (`ma = "rma"`).
//! Lookback: length (TR starts at bar 1, then `length` values to seed).

use super::{check_length, ma_option, Indicator};
use crate::domain::{IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::window::{true_range, MaKind};

pub fn atr(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    length: usize,
    smoothing: MaKind,
) -> Result<Vec<f64>, EngineError> {
    check_length(length)?;
    let tr = true_range(high, low, close)?;
    Ok(smoothing.apply(&tr, length))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Atr;

impl Indicator for Atr {
    fn name(&self) -> &'static str {
        "atr"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["average_true_range"]
    }

    fn default_length(&self) -> Option<usize> {
        Some(14)
    }

    fn options(&self) -> &'static [&'static str] {
        &["ma"]
    }

    fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        self.resolve_length(spec)
    }

    fn compute(
        &self,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError> {
        let length = self.resolve_length(spec)?;
        let smoothing = ma_option(spec, MaKind::Rma)?;
        Ok(IndicatorOutput::single(
            format!("ATR{length}"),
            atr(table.high(), table.low(), table.close(), length, smoothing)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_table, DEFAULT_EPSILON};

    fn five_bars() -> OhlcvTable {
        make_ohlc_table(&[
            (100.0, 105.0, 95.0, 102.0),  // TR undefined
            (102.0, 108.0, 100.0, 106.0), // TR = 8
            (106.0, 107.0, 98.0, 99.0),   // TR = 9
            (99.0, 103.0, 97.0, 101.0),   // TR = 6
            (101.0, 106.0, 100.0, 105.0), // TR = 6
        ])
    }

    #[test]
    fn atr_period_3() {
        let table = five_bars();
        let out = Atr
            .compute(&table, &IndicatorSpec::new("atr").with_length(3))
            .unwrap();
        let v = &out.column("ATR3").unwrap().values;

        assert!(v[0].is_nan());
        assert!(v[1].is_nan());
        assert!(v[2].is_nan());
        // Seed: mean(8, 9, 6) = 23/3
        // ATR[4] = (1/3)*6 + (2/3)*(23/3) = 64/9
        assert_approx(v[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(v[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_sma_smoothing_option() {
        let table = five_bars();
        let spec = IndicatorSpec::new("atr")
            .with_length(3)
            .with_option("ma", "sma");
        let out = Atr.compute(&table, &spec).unwrap();
        let v = &out.columns[0].values;
        assert_approx(v[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(v[4], 7.0, DEFAULT_EPSILON);
    }

    #[test]
    fn atr_lookback_matches_warmup() {
        let table = five_bars();
        let spec = IndicatorSpec::new("atr").with_length(2);
        let out = Atr.compute(&table, &spec).unwrap();
        assert_eq!(out.columns[0].warmup(), Atr.lookback(&spec).unwrap());
        assert_eq!(Atr.lookback(&IndicatorSpec::new("atr")), Ok(14));
    }

    #[test]
    fn huge_length_yields_no_values() {
        let table = five_bars();
        let v = atr(
            table.high(),
            table.low(),
            table.close(),
            usize::MAX,
            MaKind::Rma,
        )
        .unwrap();
        assert!(v.iter().all(|x| x.is_nan()));
    }
}

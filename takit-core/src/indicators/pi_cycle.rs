//! Pi Cycle Top — the 111-bar SMA crossing above twice the 350-bar SMA has
//! historically marked cycle tops.
//!
//! Columns: `SMA111`, `2xSMA350`, `PiCycleTop`. The signal column holds the
//! regime (`+1` fast above, `-1` below) or, with `only_crosses`, the sparse
//! cross events. Composite: rows with any undefined column are dropped by
//! the pipeline.

use super::{check_length, Indicator};
use crate::domain::{Column, IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::signals::derive_crossover;
use crate::window::rolling_mean;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PiCycleParams {
    pub fast: usize,
    pub slow: usize,
    pub multiplier: f64,
}

impl Default for PiCycleParams {
    fn default() -> Self {
        Self {
            fast: 111,
            slow: 350,
            multiplier: 2.0,
        }
    }
}

/// Returns `(fast_sma, scaled_slow_sma, signal)`.
pub fn pi_cycle_top(
    close: &[f64],
    params: PiCycleParams,
    only_crosses: bool,
) -> Result<(Vec<f64>, Vec<f64>, Vec<f64>), EngineError> {
    check_length(params.fast)?;
    check_length(params.slow)?;
    if !params.multiplier.is_finite() || params.multiplier <= 0.0 {
        return Err(EngineError::invalid("multiplier", "must be positive"));
    }

    let fast = rolling_mean(close, params.fast);
    let slow: Vec<f64> = rolling_mean(close, params.slow)
        .iter()
        .map(|v| v * params.multiplier)
        .collect();
    let cross = derive_crossover(&fast, &slow)?;
    let signal = if only_crosses {
        cross.cross_event
    } else {
        cross.regime
    };
    Ok((fast, slow, signal))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PiCycleTop;

impl PiCycleTop {
    fn params(spec: &IndicatorSpec) -> Result<PiCycleParams, EngineError> {
        let defaults = PiCycleParams::default();
        Ok(PiCycleParams {
            fast: spec.window("fast", defaults.fast)?,
            slow: spec.window("slow", defaults.slow)?,
            multiplier: spec.number("multiplier", defaults.multiplier)?,
        })
    }
}

impl Indicator for PiCycleTop {
    fn name(&self) -> &'static str {
        "pi_cycle_top"
    }

    fn default_length(&self) -> Option<usize> {
        None
    }

    fn options(&self) -> &'static [&'static str] {
        &["fast", "slow", "multiplier", "only_crosses"]
    }

    fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        self.resolve_length(spec)?;
        let params = Self::params(spec)?;
        let ma_lookback = params.fast.max(params.slow) - 1;
        if spec.flag("only_crosses", false)? {
            Ok(ma_lookback + 1)
        } else {
            Ok(ma_lookback)
        }
    }

    fn compute(
        &self,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError> {
        self.resolve_length(spec)?;
        let params = Self::params(spec)?;
        let only_crosses = spec.flag("only_crosses", false)?;
        let (fast, slow, signal) = pi_cycle_top(table.close(), params, only_crosses)?;
        Ok(IndicatorOutput::from_columns(vec![
            Column::new(format!("SMA{}", params.fast), fast),
            Column::new(format!("{}xSMA{}", params.multiplier, params.slow), slow),
            Column::new("PiCycleTop", signal),
        ])
        .into_composite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::make_table;

    fn small() -> PiCycleParams {
        PiCycleParams {
            fast: 2,
            slow: 4,
            multiplier: 1.0,
        }
    }

    #[test]
    fn regime_and_cross_events() {
        let closes = [10.0, 9.0, 8.0, 7.0, 6.0, 9.0, 12.0, 15.0];
        let (_, _, regime) = pi_cycle_top(&closes, small(), false).unwrap();
        let (_, _, events) = pi_cycle_top(&closes, small(), true).unwrap();

        assert!(regime[2].is_nan());
        // SMA2[3] = 7.5 < SMA4[3] = 8.5
        assert_eq!(regime[3], -1.0);
        // SMA2[5] = 7.5, SMA4[5] = 7.5 → no direction change yet
        assert_eq!(regime[5], -1.0);
        // SMA2[6] = 10.5 > SMA4[6] = 8.5
        assert_eq!(regime[6], 1.0);
        assert_eq!(events.iter().filter(|&&e| e == 1.0).count(), 1);
        assert_eq!(events[6], 1.0);
    }

    #[test]
    fn default_column_names_and_composite_flag() {
        let table = make_table(&[1.0; 5]);
        let out = PiCycleTop
            .compute(&table, &IndicatorSpec::new("pi_cycle_top"))
            .unwrap();
        assert_eq!(out.names(), vec!["SMA111", "2xSMA350", "PiCycleTop"]);
        assert!(out.composite);
        assert_eq!(
            PiCycleTop.lookback(&IndicatorSpec::new("pi_cycle_top")),
            Ok(349)
        );
    }

    #[test]
    fn rejects_length() {
        let table = make_table(&[1.0; 5]);
        let spec = IndicatorSpec::new("pi_cycle_top").with_length(20);
        assert!(PiCycleTop.compute(&table, &spec).is_err());
    }
}

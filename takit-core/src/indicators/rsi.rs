//! Relative Strength Index (RSI).
//!
//! Wilder smoothing of average gains and average losses.
//! RSI = 100 - 100 / (1 + avg_gain / avg_loss)
//! Lookback: length.
//! Edge cases: avg_loss == 0 → RSI = 100 (including a flat window);
//! avg_gain == 0 → RSI = 0.

use super::{check_length, Indicator};
use crate::domain::{IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::window::{diff, wilder_mean};

pub fn rsi(close: &[f64], length: usize) -> Result<Vec<f64>, EngineError> {
    check_length(length)?;

    let changes = diff(close);
    let gains: Vec<f64> = changes
        .iter()
        .map(|&c| if c.is_nan() { f64::NAN } else { c.max(0.0) })
        .collect();
    let losses: Vec<f64> = changes
        .iter()
        .map(|&c| if c.is_nan() { f64::NAN } else { (-c).max(0.0) })
        .collect();

    let avg_gain = wilder_mean(&gains, length);
    let avg_loss = wilder_mean(&losses, length);

    Ok(avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            if g.is_nan() || l.is_nan() {
                f64::NAN
            } else {
                compute_rsi(g, l)
            }
        })
        .collect())
}

fn compute_rsi(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        100.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Rsi;

impl Indicator for Rsi {
    fn name(&self) -> &'static str {
        "rsi"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["relative_strength_index"]
    }

    fn default_length(&self) -> Option<usize> {
        Some(14)
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
        Ok(IndicatorOutput::single(
            format!("RSI{length}"),
            rsi(table.close(), length)?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_table};

    #[test]
    fn rsi_all_gains() {
        let result = rsi(&[100.0, 101.0, 102.0, 103.0, 104.0, 105.0], 3).unwrap();
        assert_approx(result[3], 100.0, 1e-6);
        assert_approx(result[5], 100.0, 1e-6);
    }

    #[test]
    fn rsi_all_losses() {
        let result = rsi(&[105.0, 104.0, 103.0, 102.0, 101.0, 100.0], 3).unwrap();
        assert_approx(result[3], 0.0, 1e-6);
    }

    #[test]
    fn rsi_flat_window_maps_to_100() {
        let result = rsi(&[50.0, 50.0, 50.0, 50.0, 50.0], 3).unwrap();
        assert_approx(result[3], 100.0, 1e-12);
        assert_approx(result[4], 100.0, 1e-12);
    }

    #[test]
    fn rsi_mixed() {
        // Changes: +0.34, -0.25, -0.48, +0.72
        // Seed over the first 3 changes: avg_gain = 0.34/3, avg_loss = 0.73/3
        // RSI[3] = 100 - 100/(1 + 0.34/0.73) ≈ 31.776
        // RSI[4]: avg_gain = (2*0.34/3 + 0.72)/3, avg_loss = (2*0.73/3)/3
        let result = rsi(&[44.0, 44.34, 44.09, 43.61, 44.33], 3).unwrap();

        assert!(result[..3].iter().all(|v| v.is_nan()));
        assert_approx(result[3], 100.0 - 100.0 / (1.0 + 0.34 / 0.73), 1e-6);
        let g = (2.0 * 0.34 / 3.0 + 0.72) / 3.0;
        let l = (2.0 * 0.73 / 3.0) / 3.0;
        assert_approx(result[4], 100.0 - 100.0 / (1.0 + g / l), 1e-6);
    }

    #[test]
    fn rsi_bounds() {
        let result = rsi(
            &[100.0, 105.0, 98.0, 110.0, 95.0, 115.0, 90.0, 120.0],
            3,
        )
        .unwrap();
        for (i, &v) in result.iter().enumerate() {
            if !v.is_nan() {
                assert!(
                    (0.0..=100.0).contains(&v),
                    "RSI out of bounds at bar {i}: {v}"
                );
            }
        }
    }

    #[test]
    fn rsi_nan_in_seed_is_all_nan() {
        let result = rsi(&[100.0, 101.0, f64::NAN, 103.0, 104.0], 3).unwrap();
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn rsi_output_name_and_lookback() {
        let table = make_table(&[1.0, 2.0, 3.0, 2.0, 4.0, 5.0, 4.0, 6.0]);
        let spec = IndicatorSpec::new("rsi").with_length(4);
        let out = Rsi.compute(&table, &spec).unwrap();
        assert_eq!(out.names(), vec!["RSI4"]);
        assert_eq!(out.columns[0].warmup(), Rsi.lookback(&spec).unwrap());
    }

    #[test]
    fn huge_length_yields_no_values() {
        let result = rsi(&[1.0, 2.0, 3.0, 4.0], usize::MAX).unwrap();
        assert!(result.iter().all(|v| v.is_nan()));
    }
}

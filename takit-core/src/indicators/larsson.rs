//! Larsson line — a pair of Wilder-smoothed ribbons on the close.
//!
//! The fast ribbon is bounded by `V1` (RMA 15) and `M1` (RMA 19), the slow
//! ribbon by `M2` (RMA 25) and `V2` (RMA 29). The signal is `+1` while the
//! fast ribbon lies entirely above the slow one, `-1` while entirely below,
//! `0` while they overlap.

use super::{check_length, Indicator};
use crate::domain::{Column, IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::signals::edges;
use crate::window::wilder_mean;

/// Ribbon lengths in column order `V1, M1, M2, V2`.
pub const LARSSON_LENGTHS: [usize; 4] = [15, 19, 25, 29];

fn ribbon_state(v1: f64, m1: f64, m2: f64, v2: f64) -> f64 {
    if [v1, m1, m2, v2].iter().any(|v| v.is_nan()) {
        return f64::NAN;
    }
    let (fast_low, fast_high) = (v1.min(m1), v1.max(m1));
    let (slow_low, slow_high) = (m2.min(v2), m2.max(v2));
    if fast_low > slow_high {
        1.0
    } else if fast_high < slow_low {
        -1.0
    } else {
        0.0
    }
}

/// Returns the four ribbon lines followed by the signal.
pub fn larsson_line(
    close: &[f64],
    lengths: [usize; 4],
    only_crosses: bool,
) -> Result<[Vec<f64>; 5], EngineError> {
    for length in lengths {
        check_length(length)?;
    }
    let [v1, m1, m2, v2] = lengths.map(|length| wilder_mean(close, length));
    let state: Vec<f64> = (0..close.len())
        .map(|i| ribbon_state(v1[i], m1[i], m2[i], v2[i]))
        .collect();
    let signal = if only_crosses { edges(&state) } else { state };
    Ok([v1, m1, m2, v2, signal])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct LarssonLine;

impl Indicator for LarssonLine {
    fn name(&self) -> &'static str {
        "larsson_line"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["larsson"]
    }

    fn default_length(&self) -> Option<usize> {
        None
    }

    fn options(&self) -> &'static [&'static str] {
        &["only_crosses"]
    }

    fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        self.resolve_length(spec)?;
        Ok(LARSSON_LENGTHS.iter().copied().max().unwrap_or(1) - 1)
    }

    fn compute(
        &self,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError> {
        self.resolve_length(spec)?;
        let only_crosses = spec.flag("only_crosses", false)?;
        let [v1, m1, m2, v2, signal] = larsson_line(table.close(), LARSSON_LENGTHS, only_crosses)?;
        Ok(IndicatorOutput::from_columns(vec![
            Column::new("LL_V1", v1),
            Column::new("LL_M1", m1),
            Column::new("LL_M2", m2),
            Column::new("LL_V2", v2),
            Column::new("LarssonLine", signal),
        ])
        .into_composite())
    }
}

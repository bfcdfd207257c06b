//! Moving-average streak — how many bars a moving average has kept rising
//! (positive) or falling (negative).
//!
//! Outputs the moving average itself (`SMA20`) and `MAStreak20`.
//! Lookback: length (the streak needs the previous MA value).

use super::{check_length, ma_option, Indicator};
use crate::domain::{Column, IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::window::{streak, MaKind};

/// Returns `(moving_average, streak)`.
pub fn ma_streak(
    close: &[f64],
    length: usize,
    kind: MaKind,
) -> Result<(Vec<f64>, Vec<f64>), EngineError> {
    check_length(length)?;
    let ma = kind.apply(close, length);
    let run = streak(&ma);
    Ok((ma, run))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaStreak;

impl Indicator for MaStreak {
    fn name(&self) -> &'static str {
        "ma_streak"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["moving_average_streak"]
    }

    fn default_length(&self) -> Option<usize> {
        Some(20)
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
        let kind = ma_option(spec, MaKind::Sma)?;
        let (ma, run) = ma_streak(table.close(), length, kind)?;
        Ok(IndicatorOutput::from_columns(vec![
            Column::new(format!("{}{length}", kind.prefix()), ma),
            Column::new(format!("MAStreak{length}"), run),
        ]))
    }
}

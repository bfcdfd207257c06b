//! Moving-average crossover — golden cross / death cross between a fast and
//! a slow moving average of the close.
//!
//! Columns: fast MA, slow MA, `MACross` (sparse events) and `MARegime`
//! (persisted direction). Lookback: slow (events need the previous bar).

use super::{ma_option, Indicator};
use crate::domain::{Column, IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::signals::derive_crossover;
use crate::window::MaKind;

/// Returns `(fast_ma, slow_ma, cross_event, regime)`.
pub fn ma_cross(
    close: &[f64],
    fast: usize,
    slow: usize,
    kind: MaKind,
) -> Result<[Vec<f64>; 4], EngineError> {
    if fast == 0 {
        return Err(EngineError::invalid("fast", "must be >= 1"));
    }
    if slow <= fast {
        return Err(EngineError::invalid("slow", "must be greater than fast"));
    }
    let fast_ma = kind.apply(close, fast);
    let slow_ma = kind.apply(close, slow);
    let cross = derive_crossover(&fast_ma, &slow_ma)?;
    Ok([fast_ma, slow_ma, cross.cross_event, cross.regime])
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MaCross;

impl Indicator for MaCross {
    fn name(&self) -> &'static str {
        "ma_cross"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["moving_average_cross", "ma_crossover"]
    }

    fn default_length(&self) -> Option<usize> {
        None
    }

    fn options(&self) -> &'static [&'static str] {
        &["fast", "slow", "ma"]
    }

    fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        self.resolve_length(spec)?;
        spec.window("slow", 50)
    }

    fn compute(
        &self,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError> {
        self.resolve_length(spec)?;
        let fast = spec.window("fast", 20)?;
        let slow = spec.window("slow", 50)?;
        let kind = ma_option(spec, MaKind::Sma)?;

        let [fast_ma, slow_ma, events, regime] = ma_cross(table.close(), fast, slow, kind)?;
        Ok(IndicatorOutput::from_columns(vec![
            Column::new(format!("{}{fast}", kind.prefix()), fast_ma),
            Column::new(format!("{}{slow}", kind.prefix()), slow_ma),
            Column::new("MACross", events),
            Column::new("MARegime", regime),
        ]))
    }
}

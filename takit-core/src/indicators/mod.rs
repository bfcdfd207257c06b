//! Concrete indicator implementations.
//!
//! Each indicator is exposed twice: as a plain function over slices
//! (`sma(close, 20)`) and as a unit struct implementing [`Indicator`], which
//! is what the registry hands out for dynamic selection by name.
//!
//! Every output series has the same length as the input table; warm-up rows
//! are `f64::NAN`. Input shorter than the warm-up is not an error, it simply
//! produces an all-NaN series.

pub mod atr;
pub mod bmsb;
pub mod bollinger;
pub mod ema;
pub mod larsson;
pub mod ma_cross;
pub mod ma_streak;
pub mod mad;
pub mod pi_cycle;
pub mod rsi;
pub mod sma;
pub mod williams_r;
pub mod wvf;

pub use atr::{atr, Atr};
pub use bmsb::{bull_market_support_band, Bmsb};
pub use bollinger::{bollinger_bands, BollingerBands, BollingerOutput};
pub use ema::{ema, Ema};
pub use larsson::{larsson_line, LarssonLine};
pub use ma_cross::{ma_cross, MaCross};
pub use ma_streak::{ma_streak, MaStreak};
pub use mad::{mad, Mad};
pub use pi_cycle::{pi_cycle_top, PiCycleTop};
pub use rsi::{rsi, Rsi};
pub use sma::{sma, Sma};
pub use williams_r::{williams_r, WilliamsR};
pub use wvf::{williams_vix_fix, Wvf};

use crate::domain::{IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::EngineError;
use crate::window::MaKind;

/// Trait for indicators.
///
/// Indicators are pure: table and spec in, aligned named series out. No
/// value at bar `t` may depend on bars after `t`.
pub trait Indicator: Send + Sync {
    /// Canonical registry name (e.g. `"rsi"`).
    fn name(&self) -> &'static str;

    /// Alternative names resolving to this indicator.
    fn aliases(&self) -> &'static [&'static str] {
        &[]
    }

    /// Length used when the spec leaves it unset. `None` for indicators
    /// parameterized only through options.
    fn default_length(&self) -> Option<usize>;

    /// Option keys this indicator accepts.
    fn options(&self) -> &'static [&'static str] {
        &[]
    }

    /// Index of the first row where every output column can be defined.
    fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError>;

    /// Compute the indicator over the whole table.
    fn compute(
        &self,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError>;

    /// `spec.length`, or this indicator's default.
    fn resolve_length(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        match (spec.length, self.default_length()) {
            (Some(_), None) => Err(EngineError::invalid(
                "length",
                format!("{} takes no length", self.name()),
            )),
            (_, Some(default)) => spec.effective_length(default),
            (None, None) => Ok(0),
        }
    }
}

/// Reject a zero window before it reaches a kernel.
pub(crate) fn check_length(length: usize) -> Result<(), EngineError> {
    if length == 0 {
        return Err(EngineError::invalid("length", "must be >= 1"));
    }
    Ok(())
}

/// The `ma` option as a [`MaKind`], falling back to `default`.
pub(crate) fn ma_option(spec: &IndicatorSpec, default: MaKind) -> Result<MaKind, EngineError> {
    Ok(spec
        .text("ma")?
        .map(str::parse)
        .transpose()?
        .unwrap_or(default))
}

/// Create a table from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_table(closes: &[f64]) -> OhlcvTable {
    use crate::domain::Bar;
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let bars = closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect();
    OhlcvTable::from_bars(bars).unwrap()
}

/// Create a table from explicit `(open, high, low, close)` rows for testing.
#[cfg(test)]
pub fn make_ohlc_table(rows: &[(f64, f64, f64, f64)]) -> OhlcvTable {
    use crate::domain::Bar;
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let bars = rows
        .iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            timestamp: base + chrono::Duration::days(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect();
    OhlcvTable::from_bars(bars).unwrap()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

//! True range.

use crate::error::{ensure_aligned, EngineError};

/// `max(high - low, |high - prev_close|, |low - prev_close|)`.
///
/// Index 0 is undefined: without a previous close there is no true range.
pub fn true_range(high: &[f64], low: &[f64], close: &[f64]) -> Result<Vec<f64>, EngineError> {
    let n = close.len();
    ensure_aligned(n, high.len())?;
    ensure_aligned(n, low.len())?;

    let mut tr = vec![f64::NAN; n];
    for i in 1..n {
        let (h, l, pc) = (high[i], low[i], close[i - 1]);
        if h.is_nan() || l.is_nan() || pc.is_nan() {
            continue;
        }
        tr[i] = (h - l).max((h - pc).abs()).max((l - pc).abs());
    }

    Ok(tr)
}

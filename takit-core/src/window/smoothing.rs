//! Recursive smoothers and the moving-average kind selector.
//!
//! Both smoothers share one recursion: `m[i] = alpha * x[i] + (1 - alpha) * m[i-1]`.
//! Seed: simple mean of the first `length` observations, counted from the
//! first defined value so a warm-up-prefixed series (e.g. another
//! indicator's output) can be smoothed.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::rolling::rolling_mean;
use crate::error::EngineError;

/// Exponential moving average, `alpha = 2 / (length + 1)`.
pub fn exponential_mean(values: &[f64], length: usize) -> Vec<f64> {
    recursive_mean(values, length, 2.0 / (length as f64 + 1.0))
}

/// Wilder smoothing (RMA / SMMA), `alpha = 1 / length`.
pub fn wilder_mean(values: &[f64], length: usize) -> Vec<f64> {
    recursive_mean(values, length, 1.0 / length as f64)
}

fn recursive_mean(values: &[f64], length: usize, alpha: f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if length == 0 {
        return result;
    }

    let Some(start) = values.iter().position(|v| !v.is_nan()) else {
        return result;
    };
    let Some(seed_end) = start.checked_add(length).filter(|&end| end <= n) else {
        return result;
    };

    let seed_window = &values[start..seed_end];
    if seed_window.iter().any(|v| v.is_nan()) {
        return result;
    }

    let mut prev = seed_window.iter().sum::<f64>() / length as f64;
    result[seed_end - 1] = prev;

    for i in seed_end..n {
        if values[i].is_nan() {
            // Tainted from here on; the rest is already NaN.
            return result;
        }
        prev = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = prev;
    }

    result
}

/// Moving-average kernel used as a baseline or a signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MaKind {
    #[default]
    Sma,
    Ema,
    Rma,
}

impl MaKind {
    pub fn apply(&self, values: &[f64], length: usize) -> Vec<f64> {
        match self {
            MaKind::Sma => rolling_mean(values, length),
            MaKind::Ema => exponential_mean(values, length),
            MaKind::Rma => wilder_mean(values, length),
        }
    }

    /// Column-name prefix, e.g. `SMA` in `SMA20`.
    pub fn prefix(&self) -> &'static str {
        match self {
            MaKind::Sma => "SMA",
            MaKind::Ema => "EMA",
            MaKind::Rma => "RMA",
        }
    }
}

impl fmt::Display for MaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.prefix().to_ascii_lowercase())
    }
}

impl FromStr for MaKind {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sma" | "simple" => Ok(MaKind::Sma),
            "ema" | "exponential" => Ok(MaKind::Ema),
            "rma" | "smma" | "wilder" => Ok(MaKind::Rma),
            other => Err(EngineError::invalid(
                "ma",
                format!("unknown moving average `{other}` (expected sma, ema or rma)"),
            )),
        }
    }
}

//! Williams VIX Fix (WVF) — synthetic volatility from the distance between
//! the recent highest close and the current low.
//!
//! WVF = 100 * (highest(close, length) - low) / highest(close, length)
//! Lookback: length - 1.
//!
//! With `spikes = true` three extra columns flag volatility spikes:
//! - `WVF_UB`: SMA(WVF, bb_length) + std * stddev(WVF, bb_length)
//! - `WVF_RH`: highest(WVF, range_length) * range_high
//! - `WVF_SPIKE`: 1 when WVF >= WVF_UB or WVF >= WVF_RH, else 0
//!
//! The spike columns extend the lookback by max(bb_length, range_length) - 1.

use super::{check_length, Indicator};
use crate::domain::{Column, IndicatorOutput, IndicatorSpec, OhlcvTable};
use crate::error::{ensure_aligned, EngineError};
use crate::window::{rolling_max, rolling_mean, rolling_std};

pub fn williams_vix_fix(close: &[f64], low: &[f64], length: usize) -> Result<Vec<f64>, EngineError> {
    check_length(length)?;
    ensure_aligned(close.len(), low.len())?;

    let highest = rolling_max(close, length);
    Ok(highest
        .iter()
        .zip(low)
        .map(|(&hc, &l)| {
            if hc == 0.0 {
                f64::NAN
            } else {
                100.0 * (hc - l) / hc
            }
        })
        .collect())
}

/// Spike-detection parameters applied on top of a WVF series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpikeParams {
    pub bb_length: usize,
    pub std: f64,
    pub range_length: usize,
    pub range_high: f64,
}

impl Default for SpikeParams {
    fn default() -> Self {
        Self {
            bb_length: 20,
            std: 2.0,
            range_length: 50,
            range_high: 0.85,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WvfSpikes {
    pub upper_band: Vec<f64>,
    pub range_high: Vec<f64>,
    pub spike: Vec<f64>,
}

pub fn wvf_spikes(wvf: &[f64], params: SpikeParams) -> WvfSpikes {
    let mid = rolling_mean(wvf, params.bb_length);
    let sd = rolling_std(wvf, params.bb_length, 0);
    let upper_band: Vec<f64> = mid.iter().zip(&sd).map(|(m, s)| m + params.std * s).collect();
    let range_high: Vec<f64> = rolling_max(wvf, params.range_length)
        .iter()
        .map(|h| h * params.range_high)
        .collect();

    let spike = (0..wvf.len())
        .map(|i| {
            if wvf[i].is_nan() || upper_band[i].is_nan() || range_high[i].is_nan() {
                f64::NAN
            } else if wvf[i] >= upper_band[i] || wvf[i] >= range_high[i] {
                1.0
            } else {
                0.0
            }
        })
        .collect();

    WvfSpikes {
        upper_band,
        range_high,
        spike,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Wvf;

impl Wvf {
    fn spike_params(spec: &IndicatorSpec) -> Result<SpikeParams, EngineError> {
        let defaults = SpikeParams::default();
        let params = SpikeParams {
            bb_length: spec.window("bb_length", defaults.bb_length)?,
            std: spec.number("std", defaults.std)?,
            range_length: spec.window("range_length", defaults.range_length)?,
            range_high: spec.number("range_high", defaults.range_high)?,
        };
        if params.std < 0.0 {
            return Err(EngineError::invalid("std", "must be non-negative"));
        }
        if params.range_high <= 0.0 {
            return Err(EngineError::invalid("range_high", "must be positive"));
        }
        Ok(params)
    }
}

impl Indicator for Wvf {
    fn name(&self) -> &'static str {
        "wvf"
    }

    fn aliases(&self) -> &'static [&'static str] {
        &["williams_vix_fix"]
    }

    fn default_length(&self) -> Option<usize> {
        Some(22)
    }

    fn options(&self) -> &'static [&'static str] {
        &["spikes", "bb_length", "std", "range_length", "range_high"]
    }

    fn lookback(&self, spec: &IndicatorSpec) -> Result<usize, EngineError> {
        let base = self.resolve_length(spec)? - 1;
        if spec.flag("spikes", false)? {
            let params = Self::spike_params(spec)?;
            Ok(base.saturating_add(params.bb_length.max(params.range_length) - 1))
        } else {
            Ok(base)
        }
    }

    fn compute(
        &self,
        table: &OhlcvTable,
        spec: &IndicatorSpec,
    ) -> Result<IndicatorOutput, EngineError> {
        let length = self.resolve_length(spec)?;
        let wvf = williams_vix_fix(table.close(), table.low(), length)?;

        if !spec.flag("spikes", false)? {
            return Ok(IndicatorOutput::single(format!("WVF{length}"), wvf));
        }

        let spikes = wvf_spikes(&wvf, Self::spike_params(spec)?);
        Ok(IndicatorOutput::from_columns(vec![
            Column::new(format!("WVF{length}"), wvf),
            Column::new("WVF_UB", spikes.upper_band),
            Column::new("WVF_RH", spikes.range_high),
            Column::new("WVF_SPIKE", spikes.spike),
        ]))
    }
}

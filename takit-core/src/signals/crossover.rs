//! Crossover detection — golden cross and death cross.

use crate::error::{ensure_aligned, EngineError};

/// Cross events and regime derived from a `(fast, slow)` pair.
#[derive(Debug, Clone, PartialEq)]
pub struct Crossover {
    /// `+1` on the bar fast crosses above slow, `-1` on the bar it crosses
    /// below, `0` otherwise. Undefined where the current or previous
    /// difference is undefined.
    pub cross_event: Vec<f64>,
    /// Last strict direction of `fast - slow`: `+1` fast above, `-1` fast
    /// below, `0` only while no direction has been established yet.
    pub regime: Vec<f64>,
}

/// Derive cross events and regime from two aligned series.
///
/// With `diff = fast - slow`:
/// - `+1` when `diff[i] > 0 && diff[i-1] <= 0`
/// - `-1` when `diff[i] < 0 && diff[i-1] >= 0`
///
/// Swapping `fast` and `slow` flips the sign of every event.
pub fn derive_crossover(fast: &[f64], slow: &[f64]) -> Result<Crossover, EngineError> {
    ensure_aligned(fast.len(), slow.len())?;

    let n = fast.len();
    let mut cross_event = vec![f64::NAN; n];
    let mut regime = vec![f64::NAN; n];
    let mut prev_diff = f64::NAN;
    let mut state = 0.0_f64;

    for i in 0..n {
        let diff = fast[i] - slow[i];
        if diff.is_nan() {
            // Regime restarts after a gap.
            state = 0.0;
            prev_diff = f64::NAN;
            continue;
        }

        if !prev_diff.is_nan() {
            cross_event[i] = if diff > 0.0 && prev_diff <= 0.0 {
                1.0
            } else if diff < 0.0 && prev_diff >= 0.0 {
                -1.0
            } else {
                0.0
            };
        }

        if diff > 0.0 {
            state = 1.0;
        } else if diff < 0.0 {
            state = -1.0;
        }
        regime[i] = state;
        prev_diff = diff;
    }

    Ok(Crossover {
        cross_event,
        regime,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_golden_cross() {
        let fast = [1.0, 2.0, 3.0, 6.0, 7.0, 8.0];
        let slow = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0];
        let x = derive_crossover(&fast, &slow).unwrap();

        assert!(x.cross_event[0].is_nan());
        assert_eq!(&x.cross_event[1..], &[0.0, 0.0, 1.0, 0.0, 0.0]);
        assert_eq!(x.regime, vec![-1.0, -1.0, -1.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn swapping_inputs_flips_events() {
        let a = [1.0, 3.0, 2.0, 5.0, 4.0, 4.0, 6.0];
        let b = [2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0];
        let ab = derive_crossover(&a, &b).unwrap();
        let ba = derive_crossover(&b, &a).unwrap();
        for i in 1..a.len() {
            assert_eq!(ab.cross_event[i], -ba.cross_event[i], "bar {i}");
        }
    }

    #[test]
    fn touch_then_cross_counts_once() {
        // diff: -1, 0, +1 → cross fires on the bar diff turns positive
        let x = derive_crossover(&[1.0, 2.0, 3.0], &[2.0, 2.0, 2.0]).unwrap();
        assert_eq!(&x.cross_event[1..], &[0.0, 1.0]);
        // Regime persists through the zero-difference bar
        assert_eq!(x.regime, vec![-1.0, -1.0, 1.0]);
    }

    #[test]
    fn warmup_is_undefined_and_regime_seeds_from_sign() {
        let fast = [f64::NAN, f64::NAN, 4.0, 5.0];
        let slow = [f64::NAN, 3.0, 3.0, 6.0];
        let x = derive_crossover(&fast, &slow).unwrap();
        assert!(x.regime[0].is_nan());
        assert!(x.regime[1].is_nan());
        assert_eq!(x.regime[2], 1.0);
        assert!(x.cross_event[2].is_nan());
        assert_eq!(x.cross_event[3], -1.0);
        assert_eq!(x.regime[3], -1.0);
    }

    #[test]
    fn zero_start_has_neutral_regime() {
        let x = derive_crossover(&[2.0, 2.0, 1.0], &[2.0, 2.0, 2.0]).unwrap();
        assert_eq!(x.regime, vec![0.0, 0.0, -1.0]);
        assert_eq!(&x.cross_event[1..], &[0.0, -1.0]);
    }

    #[test]
    fn misaligned_inputs_rejected() {
        let err = derive_crossover(&[1.0, 2.0, 3.0], &[1.0, 2.0]).unwrap_err();
        assert_eq!(
            err,
            EngineError::MisalignedInput {
                expected: 3,
                actual: 2
            }
        );
    }
}

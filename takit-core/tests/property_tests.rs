//! Property tests for kernel and signal invariants.
//!
//! Uses proptest to verify:
//! 1. Rolling mean — undefined before the window fills, exact mean after
//! 2. Exponential mean — deterministic under re-application
//! 3. Streak — resets on reversal, grows while direction holds, zero on ties
//! 4. Crossover anti-symmetry — swapping inputs flips every event
//! 5. Trigger-row filtering — idempotent
//! 6. RSI — bounded in [0, 100]

use proptest::prelude::*;
use takit_core::domain::Column;
use takit_core::frame::Frame;
use takit_core::indicators::rsi;
use takit_core::signals::{derive_crossover, filter_trigger_rows, trigger_rows};
use takit_core::window::{exponential_mean, rolling_mean, streak};

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_prices(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((1.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0), 1..max_len)
}

/// Prices drawn from a handful of levels so ties and reversals are common.
fn arb_choppy(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((0..5u8).prop_map(f64::from), 2..max_len)
}

fn arb_signal(max_len: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![Just(f64::NAN), Just(-1.0), Just(0.0), Just(1.0)],
        0..max_len,
    )
}

fn frame_with_signal(signal: Vec<f64>) -> Frame {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let index = (0..signal.len())
        .map(|i| base + chrono::Duration::days(i as i64))
        .collect();
    let mut frame = Frame::new(index);
    frame.push_column(Column::new("Signal", signal)).unwrap();
    frame
}

// ── 1. Rolling mean ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn rolling_mean_matches_window_average(values in arb_prices(80), length in 1usize..12) {
        let result = rolling_mean(&values, length);
        prop_assert_eq!(result.len(), values.len());
        for (i, r) in result.iter().enumerate() {
            if i + 1 < length {
                prop_assert!(r.is_nan());
            } else {
                let window = &values[i + 1 - length..=i];
                let expected = window.iter().sum::<f64>() / length as f64;
                prop_assert!((r - expected).abs() < 1e-9, "i={} got={} expected={}", i, r, expected);
            }
        }
    }
}

// ── 2. Exponential mean ──────────────────────────────────────────────

proptest! {
    #[test]
    fn exponential_mean_is_deterministic(values in arb_prices(80), length in 1usize..20) {
        let a = exponential_mean(&values, length);
        let b = exponential_mean(&values, length);
        prop_assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            prop_assert!(x.to_bits() == y.to_bits());
        }
    }
}

// ── 3. Streak ────────────────────────────────────────────────────────

proptest! {
    #[test]
    fn streak_counts_runs(values in arb_choppy(60)) {
        let s = streak(&values);
        prop_assert!(s[0].is_nan());
        for i in 1..values.len() {
            let prev = if i >= 2 { s[i - 1] } else { 0.0 };
            if values[i] > values[i - 1] {
                let expected = if prev > 0.0 { prev + 1.0 } else { 1.0 };
                prop_assert_eq!(s[i], expected);
            } else if values[i] < values[i - 1] {
                let expected = if prev < 0.0 { prev - 1.0 } else { -1.0 };
                prop_assert_eq!(s[i], expected);
            } else {
                prop_assert_eq!(s[i], 0.0);
            }
        }
    }
}

// ── 4. Crossover anti-symmetry ───────────────────────────────────────

proptest! {
    #[test]
    fn swapping_inputs_flips_events(
        pair in prop::collection::vec((1.0..100.0_f64, 1.0..100.0_f64), 2..60),
    ) {
        let (fast, slow): (Vec<f64>, Vec<f64>) = pair.into_iter().unzip();
        let forward = derive_crossover(&fast, &slow).unwrap();
        let backward = derive_crossover(&slow, &fast).unwrap();
        for (f, b) in forward.cross_event.iter().zip(&backward.cross_event) {
            if f.is_nan() {
                prop_assert!(b.is_nan());
            } else {
                prop_assert_eq!(*f, -*b + 0.0);
            }
        }
        for (f, b) in forward.regime.iter().zip(&backward.regime) {
            prop_assert_eq!(*f, -*b + 0.0);
        }
    }
}

// ── 5. Trigger rows ──────────────────────────────────────────────────

proptest! {
    #[test]
    fn trigger_filter_is_idempotent(signal in arb_signal(60)) {
        let frame = frame_with_signal(signal);
        let once = filter_trigger_rows(&frame, "Signal").unwrap();
        let twice = filter_trigger_rows(&once, "Signal").unwrap();
        prop_assert_eq!(&once, &twice);
        let values = &once.column("Signal").unwrap().values;
        prop_assert_eq!(trigger_rows(values).len(), values.len());
    }
}

// ── 6. RSI bounds ────────────────────────────────────────────────────

proptest! {
    #[test]
    fn rsi_is_bounded(values in arb_prices(120), length in 1usize..30) {
        let result = rsi(&values, length).unwrap();
        for r in result.iter().filter(|r| !r.is_nan()) {
            prop_assert!((0.0..=100.0).contains(r), "RSI out of range: {}", r);
        }
    }
}

//! Look-ahead contamination tests for every registered indicator.
//!
//! Invariant: no indicator value at bar t may depend on price data from bar
//! t+1 or later.
//!
//! Method: compute on a truncated table (bars 0..400) and the full table
//! (bars 0..500). Assert bars 0..400 are identical between both runs. Any
//! difference means the indicator is leaking future data into past values.

use chrono::NaiveDate;
use takit_core::domain::{Bar, IndicatorSpec, OhlcvTable};
use takit_core::indicators::Indicator;
use takit_core::IndicatorRegistry;

/// Generate N bars of synthetic OHLCV data with realistic variation.
fn make_test_table(n: usize) -> OhlcvTable {
    let base = NaiveDate::from_ymd_opt(2020, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let mut price = 100.0;
    let bars = (0..n)
        .map(|i| {
            // Deterministic pseudo-random walk using a simple LCG
            let seed = (i as u64).wrapping_mul(6364136223846793005).wrapping_add(1);
            let change = ((seed % 200) as f64 - 100.0) * 0.05; // -5.0 to +5.0
            price = f64::max(price + change, 10.0);

            let open = price - 0.5;
            let close = price + 0.3;
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open,
                high: open.max(close) + 2.0,
                low: open.min(close) - 2.0,
                close,
                volume: 1000.0 + i as f64 * 100.0,
            }
        })
        .collect();
    OhlcvTable::from_bars(bars).unwrap()
}

fn assert_no_lookahead(indicator: &dyn Indicator, spec: &IndicatorSpec, full: &OhlcvTable, truncated_len: usize) {
    let truncated = full.head(truncated_len);
    let full_out = indicator.compute(full, spec).unwrap();
    let truncated_out = indicator.compute(&truncated, spec).unwrap();

    for (t_col, f_col) in truncated_out.columns.iter().zip(&full_out.columns) {
        assert_eq!(t_col.name, f_col.name);
        assert_eq!(t_col.len(), truncated_len, "{}: truncated length", t_col.name);
        assert_eq!(f_col.len(), full.len(), "{}: full length", f_col.name);

        for i in 0..truncated_len {
            let t = t_col.values[i];
            let f = f_col.values[i];
            if t.is_nan() && f.is_nan() {
                continue;
            }
            assert!(
                !t.is_nan() && !f.is_nan(),
                "{}: NaN mismatch at bar {i} (truncated={t}, full={f})",
                t_col.name
            );
            assert!(
                (t - f).abs() < 1e-10,
                "{}: look-ahead contamination at bar {i}: truncated={t}, full={f}",
                t_col.name
            );
        }
    }
}

#[test]
fn lookahead_every_indicator_with_defaults() {
    let table = make_test_table(500);
    let registry = IndicatorRegistry::default();
    for indicator in registry.iter() {
        let spec = IndicatorSpec::new(indicator.name());
        assert_no_lookahead(indicator, &spec, &table, 400);
    }
}

#[test]
fn lookahead_short_lengths() {
    let table = make_test_table(200);
    let registry = IndicatorRegistry::default();
    for name in ["sma", "ema", "rsi", "mad", "atr", "bb", "wr", "ma_streak", "wvf"] {
        let spec = IndicatorSpec::new(name).with_length(5);
        assert_no_lookahead(registry.lookup(name).unwrap(), &spec, &table, 100);
    }
}

#[test]
fn lookahead_option_variants() {
    let table = make_test_table(200);
    let registry = IndicatorRegistry::default();
    let specs = [
        IndicatorSpec::new("wvf").with_option("spikes", true),
        IndicatorSpec::new("mad").with_length(10).with_option("ma", "ema").with_option("relative", true),
        IndicatorSpec::new("ma_cross").with_option("fast", 5.0).with_option("slow", 13.0),
        IndicatorSpec::new("bmsb").with_option("only_crosses", true),
        IndicatorSpec::new("larsson_line").with_option("only_crosses", true),
        IndicatorSpec::new("pi_cycle_top")
            .with_option("fast", 10.0)
            .with_option("slow", 30.0)
            .with_option("only_crosses", true),
    ];
    for spec in &specs {
        assert_no_lookahead(registry.lookup(&spec.name).unwrap(), spec, &table, 100);
    }
}

#[test]
fn lookback_matches_first_defined_row() {
    let table = make_test_table(500);
    let registry = IndicatorRegistry::default();
    for indicator in registry.iter() {
        let spec = IndicatorSpec::new(indicator.name());
        let out = indicator.compute(&table, &spec).unwrap();
        let warmup = out.columns.iter().map(|c| c.warmup()).max().unwrap_or(0);
        assert_eq!(
            warmup,
            indicator.lookback(&spec).unwrap(),
            "{}: lookback disagrees with output warm-up",
            indicator.name()
        );
    }
}

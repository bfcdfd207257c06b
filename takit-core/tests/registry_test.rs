//! Registry and dispatch-by-name tests.

use takit_core::domain::{Bar, IndicatorSpec, OhlcvTable};
use takit_core::{compute, registry_lookup, EngineError, IndicatorRegistry};

fn table(n: usize) -> OhlcvTable {
    let base = chrono::NaiveDate::from_ymd_opt(2024, 1, 2)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let bars = (0..n)
        .map(|i| {
            let close = 50.0 + (i as f64 * 0.2).cos() * 5.0;
            Bar {
                timestamp: base + chrono::Duration::days(i as i64),
                open: close - 0.2,
                high: close + 1.0,
                low: close - 1.0,
                close,
                volume: 10.0,
            }
        })
        .collect();
    OhlcvTable::from_bars(bars).unwrap()
}

#[test]
fn nonexistent_indicator_fails_with_unknown_indicator() {
    let table = table(10);
    let result = compute(
        "nonexistent_indicator",
        &table,
        &IndicatorSpec::new("nonexistent_indicator"),
    );
    assert_eq!(
        result.unwrap_err(),
        EngineError::UnknownIndicator("nonexistent_indicator".to_string())
    );
}

#[test]
fn aliases_resolve_to_canonical_names() {
    let cases = [
        ("simple_moving_average", "sma"),
        ("exponential_moving_average", "ema"),
        ("relative_strength_index", "rsi"),
        ("moving_average_deviation", "mad"),
        ("average_true_range", "atr"),
        ("bollinger_bands", "bb"),
        ("williams_r", "wr"),
        ("moving_average_streak", "ma_streak"),
        ("williams_vix_fix", "wvf"),
        ("moving_average_cross", "ma_cross"),
        ("bull_market_support_band", "bmsb"),
        ("PI_CYCLE_TOP", "pi_cycle_top"),
        ("larsson_line", "larsson_line"),
    ];
    for (alias, canonical) in cases {
        assert_eq!(registry_lookup(alias).unwrap().name(), canonical, "{alias}");
    }
}

#[test]
fn default_lengths() {
    let registry = IndicatorRegistry::default();
    let expected = [
        ("sma", Some(20)),
        ("ema", Some(20)),
        ("rsi", Some(14)),
        ("mad", Some(140)),
        ("atr", Some(14)),
        ("bb", Some(20)),
        ("wr", Some(14)),
        ("ma_streak", Some(20)),
        ("wvf", Some(22)),
        ("ma_cross", None),
        ("pi_cycle_top", None),
        ("bmsb", None),
        ("larsson_line", None),
    ];
    for (name, length) in expected {
        assert_eq!(registry.lookup(name).unwrap().default_length(), length, "{name}");
    }
}

#[test]
fn zero_length_rejected_everywhere() {
    let table = table(30);
    let registry = IndicatorRegistry::default();
    for indicator in registry.iter() {
        let spec = IndicatorSpec::new(indicator.name()).with_length(0);
        assert!(
            matches!(
                compute(indicator.name(), &table, &spec),
                Err(EngineError::InvalidParameter { .. })
            ),
            "{} accepted a zero length",
            indicator.name()
        );
    }
}

#[test]
fn short_input_is_undefined_not_an_error() {
    let table = table(3);
    let out = compute("rsi", &table, &IndicatorSpec::new("rsi")).unwrap();
    assert_eq!(out.columns[0].len(), 3);
    assert!(out.columns[0].values.iter().all(|v| v.is_nan()));
}

#[test]
fn length_resolution_is_per_call() {
    let table = table(40);
    let first = compute("rsi", &table, &IndicatorSpec::new("rsi").with_length(5)).unwrap();
    let second = compute("rsi", &table, &IndicatorSpec::new("rsi")).unwrap();
    assert_eq!(first.names(), vec!["RSI5"]);
    assert_eq!(second.names(), vec!["RSI14"]);
}

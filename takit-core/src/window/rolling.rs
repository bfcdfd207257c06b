//! Trailing-window reducers over the closed window `[i-length+1, i]`.

use super::smoothing::MaKind;

/// Simple moving average. Defined for `i >= length - 1`.
pub fn rolling_mean(values: &[f64], length: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if length == 0 || n < length {
        return result;
    }

    // Summed per window; no error is carried from one window to the next.
    for i in (length - 1)..n {
        let window = &values[(i + 1 - length)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().sum::<f64>() / length as f64;
    }

    result
}

/// Rolling standard deviation with `ddof` delta degrees of freedom
/// (0 = population, 1 = sample). All NaN when `length <= ddof`.
pub fn rolling_std(values: &[f64], length: usize, ddof: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if length == 0 || length <= ddof || n < length {
        return result;
    }

    for i in (length - 1)..n {
        let window = &values[(i + 1 - length)..=i];
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        let mean = window.iter().sum::<f64>() / length as f64;
        let variance = window
            .iter()
            .map(|v| {
                let d = v - mean;
                d * d
            })
            .sum::<f64>()
            / (length - ddof) as f64;
        result[i] = variance.sqrt();
    }

    result
}

/// Highest value in the trailing window.
pub fn rolling_max(values: &[f64], length: usize) -> Vec<f64> {
    rolling_extreme(values, length, f64::max)
}

/// Lowest value in the trailing window.
pub fn rolling_min(values: &[f64], length: usize) -> Vec<f64> {
    rolling_extreme(values, length, f64::min)
}

fn rolling_extreme(values: &[f64], length: usize, pick: fn(f64, f64) -> f64) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if length == 0 || n < length {
        return result;
    }

    for i in (length - 1)..n {
        let window = &values[(i + 1 - length)..=i];
        // f64::max/min ignore NaN, so check explicitly.
        if window.iter().any(|v| v.is_nan()) {
            continue;
        }
        result[i] = window.iter().copied().fold(window[0], pick);
    }

    result
}

/// `values[i] - baseline(values, length)[i]`; NaN wherever the baseline is.
pub fn rolling_deviation(values: &[f64], length: usize, baseline: MaKind) -> Vec<f64> {
    let base = baseline.apply(values, length);
    values.iter().zip(&base).map(|(v, b)| v - b).collect()
}

//! First difference and directional streak counting.

/// `values[i] - values[i-1]`; index 0 undefined.
pub fn diff(values: &[f64]) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    for i in 1..values.len() {
        result[i] = values[i] - values[i - 1];
    }
    result
}

/// Signed run length of consecutive rises (`+n`) or falls (`-n`).
///
/// Equality resets to 0; a reversal restarts at magnitude 1. Index 0 and
/// any bar compared against NaN are undefined, and the run restarts after
/// them.
pub fn streak(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];
    let mut run = 0.0_f64;

    for i in 1..n {
        let (curr, prev) = (values[i], values[i - 1]);
        if curr.is_nan() || prev.is_nan() {
            run = 0.0;
            continue;
        }

        run = if curr > prev {
            if run > 0.0 {
                run + 1.0
            } else {
                1.0
            }
        } else if curr < prev {
            if run < 0.0 {
                run - 1.0
            } else {
                -1.0
            }
        } else {
            0.0
        };
        result[i] = run;
    }

    result
}

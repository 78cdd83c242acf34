//! Numeric helpers shared by aggregation and the indicators.
//!
//! Every helper has a deterministic fallback for empty input instead of
//! returning an error.

/// Arithmetic mean, `0.0` for an empty slice.
pub fn safe_average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of the values, `0.0` for an empty slice. Even-length input averages the two middle values.
pub fn safe_median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Sample standard deviation (n - 1 denominator), `0.0` when fewer than two values.
pub fn safe_stddev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mean = safe_average(values);
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    (sum_sq / (values.len() - 1) as f64).sqrt()
}

/// Round half away from zero to `precision` decimal places.
pub fn round_float(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

/// Number of decimal digits in the shortest representation of `value`.
pub fn precision_of(value: f64) -> u32 {
    let repr = format!("{}", value);
    match repr.split_once('.') {
        Some((_, frac)) => frac.len() as u32,
        None => 0,
    }
}

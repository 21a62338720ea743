//! Descriptive statistics shared by every metric.
//!
//! Sample (n - 1) denominators are used throughout.

/// Divide, returning 0 for a zero denominator or a NaN result.
///
/// A quotient that overflows saturates at `±f64::MAX`.
pub fn safe_ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    saturate(numerator / denominator)
}

/// Map NaN to 0 and clamp infinities to `±f64::MAX`.
pub fn saturate(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(f64::MIN, f64::MAX)
    }
}

/// Arithmetic mean (0 for an empty slice).
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample variance with an n - 1 denominator (0 for fewer than 2 values).
pub fn sample_variance(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / (values.len() - 1) as f64
}

/// Sample standard deviation.
pub fn sample_std_dev(values: &[f64]) -> f64 {
    sample_variance(values).sqrt()
}

/// Sample Pearson correlation coefficient, clamped to [-1, 1].
///
/// Returns 0 when the slices differ in length, hold fewer than 2 values, or
/// either side has zero variance.
pub fn pearson_correlation(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.len() < 2 {
        return 0.0;
    }

    let (mean_a, mean_b) = (mean(a), mean(b));
    let mut covariance = 0.0;
    let mut sum_sq_a = 0.0;
    let mut sum_sq_b = 0.0;
    for (x, y) in a.iter().zip(b) {
        let (dx, dy) = (x - mean_a, y - mean_b);
        covariance += dx * dy;
        sum_sq_a += dx * dx;
        sum_sq_b += dy * dy;
    }

    safe_ratio(covariance, (sum_sq_a * sum_sq_b).sqrt()).clamp(-1.0, 1.0)
}

/// Percentile of an ascending-sorted slice with linear interpolation.
///
/// For `p` in [0, 100] the rank is `h = (n - 1) * p / 100`; the result is
/// `x[floor(h)] + (h - floor(h)) * (x[floor(h) + 1] - x[floor(h)])`, which
/// matches numpy's default `linear` method. Returns 0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }

    let rank = (sorted.len() - 1) as f64 * (p.clamp(0.0, 100.0) / 100.0);
    let lo = rank.floor() as usize;
    let hi = (lo + 1).min(sorted.len() - 1);
    let weight = rank - lo as f64;

    sorted[lo] + weight * (sorted[hi] - sorted[lo])
}

/// Root mean square of the element-wise differences.
pub fn rmse(a: &[f64], b: &[f64]) -> f64 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let sum_sq: f64 = a.iter().zip(b).map(|(x, y)| (x - y).powi(2)).sum();
    (sum_sq / a.len() as f64).sqrt()
}

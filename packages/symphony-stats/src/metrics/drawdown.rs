//! Running-peak drawdown analysis.

use crate::types::{DrawdownPoint, DrawdownSummary, ValuationSeries};

/// Calculate the drawdown curve of a valuation series.
///
/// The running peak starts at the first value and is updated to
/// `max(peak, value)` at each point; `drawdown = value / peak - 1`. A series
/// that never falls below a previous high has an all-zero curve.
pub fn drawdown_curve(series: &ValuationSeries) -> Vec<DrawdownPoint> {
    let mut peak = series.first().value;

    series
        .points()
        .iter()
        .map(|point| {
            peak = peak.max(point.value);
            DrawdownPoint {
                date: point.date,
                drawdown: point.value / peak - 1.0,
                peak,
            }
        })
        .collect()
}

/// Summarize a drawdown curve.
///
/// An empty curve summarizes to all zeros.
pub fn summarize_drawdowns(curve: &[DrawdownPoint]) -> DrawdownSummary {
    let mut max_drawdown = 0.0;
    let mut max_drawdown_date = None;
    let mut longest = 0;
    let mut run = 0;

    for point in curve {
        if point.drawdown < max_drawdown {
            max_drawdown = point.drawdown;
            max_drawdown_date = Some(point.date);
        }

        if point.drawdown < 0.0 {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    DrawdownSummary {
        max_drawdown,
        max_drawdown_date,
        current_drawdown: curve.last().map(|p| p.drawdown).unwrap_or(0.0),
        longest_drawdown_days: longest,
    }
}

/// Calculate maximum drawdown of a valuation series.
///
/// Returns the most negative drawdown (e.g., -0.15 for a 15% decline).
pub fn calculate_max_drawdown(series: &ValuationSeries) -> f64 {
    summarize_drawdowns(&drawdown_curve(series)).max_drawdown
}

/// Recover the running-peak sequence from a curve and the original values.
pub fn peaks_from_curve(values: &[f64], curve: &[DrawdownPoint]) -> Vec<f64> {
    values
        .iter()
        .zip(curve)
        .map(|(value, point)| value / (1.0 + point.drawdown))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> ValuationSeries {
        let start = NaiveDate::from_ymd_opt(2023, 6, 1).unwrap();
        ValuationSeries::from_values("dd", start, values).unwrap()
    }

    #[test]
    fn test_drawdown_worked_example() {
        let curve = drawdown_curve(&series(&[100.0, 110.0, 121.0, 108.9]));

        assert_eq!(curve[0].drawdown, 0.0);
        assert_eq!(curve[2].drawdown, 0.0);
        assert_relative_eq!(curve[3].drawdown, -0.10, epsilon = 1e-12);
        assert_eq!(curve[3].peak, 121.0);

        let summary = summarize_drawdowns(&curve);
        assert_relative_eq!(summary.max_drawdown, -0.10, epsilon = 1e-12);
        assert_relative_eq!(summary.current_drawdown, -0.10, epsilon = 1e-12);
        assert_eq!(summary.max_drawdown_date, Some(curve[3].date));
        assert_eq!(summary.longest_drawdown_days, 1);
    }

    #[test]
    fn test_non_decreasing_series_has_zero_curve() {
        let curve = drawdown_curve(&series(&[100.0, 100.0, 101.0, 105.0, 105.0, 130.0]));
        assert!(curve.iter().all(|p| p.drawdown == 0.0));

        let summary = summarize_drawdowns(&curve);
        assert_eq!(summary.max_drawdown, 0.0);
        assert_eq!(summary.max_drawdown_date, None);
        assert_eq!(summary.longest_drawdown_days, 0);
    }

    #[test]
    fn test_max_drawdown_bounds() {
        let values = [100.0, 150.0, 30.0, 200.0, 1.0, 0.5, 300.0];
        let mdd = calculate_max_drawdown(&series(&values));
        assert!(mdd <= 0.0);
        assert!(mdd >= -1.0);
        // 0.5 / 200 - 1
        assert_relative_eq!(mdd, -0.9975, epsilon = 1e-12);
    }

    #[test]
    fn test_longest_drawdown_run() {
        let curve = drawdown_curve(&series(&[10.0, 9.0, 8.0, 10.0, 9.0, 9.5, 9.9, 9.8, 11.0]));
        let summary = summarize_drawdowns(&curve);
        assert_eq!(summary.longest_drawdown_days, 4);
        assert_eq!(summary.current_drawdown, 0.0);
    }

    #[test]
    fn test_peaks_recovered_from_curve() {
        let values = [100.0, 97.3, 104.2, 101.1, 99.0, 108.7, 108.7, 95.2];
        let curve = drawdown_curve(&series(&values));

        let mut cumulative_max = Vec::new();
        let mut running = f64::MIN;
        for v in values {
            running = running.max(v);
            cumulative_max.push(running);
        }

        let stored: Vec<f64> = curve.iter().map(|p| p.peak).collect();
        assert_eq!(stored, cumulative_max);

        let recovered = peaks_from_curve(&values, &curve);
        for (r, expected) in recovered.iter().zip(&cumulative_max) {
            assert_relative_eq!(*r, *expected, max_relative = 1e-12);
        }
    }
}

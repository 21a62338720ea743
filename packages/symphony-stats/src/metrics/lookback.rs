//! Point-in-time returns over fixed trading-day windows.

use crate::types::{LookbackKey, LookbackReturns};

/// Calculate the return over every lookback window.
///
/// Windows are index offsets back from the last value, not calendar
/// offsets, so results do not depend on weekends or holidays in the data.
/// A window longer than the available history yields 0 for that key.
///
/// # Example
///
/// ```rust
/// use symphony_stats::{lookback_returns, LookbackKey};
///
/// let values = vec![100.0, 102.0, 104.0, 103.0, 106.0, 105.0, 107.0, 110.0];
/// let lookbacks = lookback_returns(&values);
///
/// assert!((lookbacks.today - (110.0 / 107.0 - 1.0)).abs() < 1e-12);
/// assert!((lookbacks.get(LookbackKey::SevenDays) - 0.10).abs() < 1e-12);
/// assert_eq!(lookbacks.thirty_days, 0.0);
/// ```
pub fn lookback_returns(values: &[f64]) -> LookbackReturns {
    let mut result = LookbackReturns::default();
    for key in LookbackKey::ALL {
        result.set(key, window_return(values, key));
    }
    result
}

/// Return over a single lookback window (0 on insufficient history).
pub fn window_return(values: &[f64], key: LookbackKey) -> f64 {
    let offset = key.offset(values.len());
    if values.len() <= offset {
        tracing::debug!(
            window = %key,
            points = values.len(),
            "insufficient history for lookback window"
        );
        return 0.0;
    }

    let end = values[values.len() - 1];
    let start = values[values.len() - 1 - offset];
    if start <= 0.0 {
        return 0.0;
    }
    end / start - 1.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_offsets() {
        assert_eq!(LookbackKey::Today.offset(500), 1);
        assert_eq!(LookbackKey::NinetyDays.offset(500), 90);
        assert_eq!(LookbackKey::OneYear.offset(500), 365);
        assert_eq!(LookbackKey::Total.offset(500), 499);
    }

    #[test]
    fn test_short_history_defaults_to_zero() {
        let values: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let lookbacks = lookback_returns(&values);

        assert_relative_eq!(lookbacks.today, 119.0 / 118.0 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(lookbacks.seven_days, 119.0 / 112.0 - 1.0, epsilon = 1e-12);
        assert_eq!(lookbacks.thirty_days, 0.0);
        assert_eq!(lookbacks.ninety_days, 0.0);
        assert_eq!(lookbacks.one_year, 0.0);
        assert_relative_eq!(lookbacks.total, 0.19, epsilon = 1e-12);
    }

    #[test]
    fn test_exact_window_length() {
        // 31 points are exactly enough for a 30-step window
        let mut values = vec![100.0; 31];
        values[30] = 120.0;
        assert_relative_eq!(
            window_return(&values, LookbackKey::ThirtyDays),
            0.20,
            epsilon = 1e-12
        );
        assert_eq!(window_return(&values[1..], LookbackKey::ThirtyDays), 0.0);
    }

    #[test]
    fn test_full_year_history() {
        let values: Vec<f64> = (0..400).map(|i| 100.0 * 1.001f64.powi(i)).collect();
        let lookbacks = lookback_returns(&values);

        assert_relative_eq!(lookbacks.one_year, 1.001f64.powi(365) - 1.0, max_relative = 1e-9);
        assert_relative_eq!(lookbacks.total, 1.001f64.powi(399) - 1.0, max_relative = 1e-9);
        assert_relative_eq!(lookbacks.ninety_days, 1.001f64.powi(90) - 1.0, max_relative = 1e-9);
    }

    #[test]
    fn test_degenerate_inputs() {
        assert_eq!(lookback_returns(&[]), LookbackReturns::default());
        assert_eq!(lookback_returns(&[100.0]), LookbackReturns::default());
    }
}

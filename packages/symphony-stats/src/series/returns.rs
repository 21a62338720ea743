//! Day-over-day simple returns.

use super::normalize::validate_value;
use crate::types::ValuationSeries;
use crate::{DataErrorKind, Error, Result};

/// Calculate daily simple returns from a valuation series.
///
/// `return[i] = value[i + 1] / value[i] - 1`, so the result has one element
/// fewer than the series. A single-point series has no returns and is
/// rejected.
pub fn daily_returns(series: &ValuationSeries) -> Result<Vec<f64>> {
    returns_from_values(series.name(), &series.values())
}

/// Calculate daily simple returns from raw values.
///
/// Applies the same checks as [`ValuationSeries`]: at least two points, all
/// finite and positive.
pub fn returns_from_values(name: &str, values: &[f64]) -> Result<Vec<f64>> {
    if values.len() < 2 {
        return Err(Error::data(
            name,
            DataErrorKind::TooShort {
                len: values.len(),
                required: 2,
            },
        ));
    }

    for (index, &value) in values.iter().enumerate() {
        validate_value(name, index, value)?;
    }

    Ok(values.windows(2).map(|w| w[1] / w[0] - 1.0).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::NaiveDate;

    fn series(values: &[f64]) -> ValuationSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        ValuationSeries::from_values("test", start, values).unwrap()
    }

    #[test]
    fn test_daily_returns_worked_example() {
        let returns = daily_returns(&series(&[100.0, 110.0, 121.0, 108.9])).unwrap();

        assert_eq!(returns.len(), 3);
        assert_relative_eq!(returns[0], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[1], 0.10, epsilon = 1e-12);
        assert_relative_eq!(returns[2], -0.10, epsilon = 1e-12);
    }

    #[test]
    fn test_daily_returns_length_is_n_minus_one() {
        for n in 2..40 {
            let values: Vec<f64> = (0..n).map(|i| 100.0 + (i as f64 * 0.7).sin()).collect();
            let returns = daily_returns(&series(&values)).unwrap();
            assert_eq!(returns.len(), n - 1);
        }
    }

    #[test]
    fn test_single_point_series_rejected() {
        let result = daily_returns(&series(&[100.0]));
        assert!(matches!(
            result,
            Err(Error::Data {
                kind: DataErrorKind::TooShort { len: 1, required: 2 },
                ..
            })
        ));
    }

    #[test]
    fn test_returns_from_values_rejects_zero() {
        let result = returns_from_values("raw", &[100.0, 0.0, 100.0]);
        assert!(matches!(
            result,
            Err(Error::Data {
                kind: DataErrorKind::NonPositiveValue { index: 1, .. },
                ..
            })
        ));
    }
}

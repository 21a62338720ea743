//! Normalization of raw upstream valuation data.

use crate::types::{RawValuationPoint, ValuationPoint, ValuationSeries};
use crate::{DataErrorKind, Error, Result};
use chrono::NaiveDate;

/// Check that a value can appear in a valuation series.
pub(crate) fn validate_value(series: &str, index: usize, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(Error::data(
            series,
            DataErrorKind::NonPositiveValue { index, value },
        ));
    }
    Ok(())
}

/// Validate and clean raw valuation points into a [`ValuationSeries`].
///
/// Dates must be ISO-8601 (`YYYY-MM-DD`) and every value present, finite and
/// positive. Points are sorted by date. A date repeated with the same value
/// collapses to one point; a date repeated with a different value is
/// rejected, since there is no way to know which one is right.
///
/// # Example
///
/// ```rust
/// use symphony_stats::{normalize, RawValuationPoint};
///
/// let raw = vec![
///     RawValuationPoint::new("2024-01-03", 105.0),
///     RawValuationPoint::new("2024-01-02", 100.0),
/// ];
/// let series = normalize("portfolio", &raw).unwrap();
/// assert_eq!(series.values(), vec![100.0, 105.0]);
/// ```
pub fn normalize(name: &str, raw: &[RawValuationPoint]) -> Result<ValuationSeries> {
    if raw.is_empty() {
        return Err(Error::data(name, DataErrorKind::Empty));
    }

    let mut points = Vec::with_capacity(raw.len());
    for (index, point) in raw.iter().enumerate() {
        let date = NaiveDate::parse_from_str(point.date.trim(), "%Y-%m-%d").map_err(|_| {
            Error::data(
                name,
                DataErrorKind::InvalidDate {
                    index,
                    raw: point.date.clone(),
                },
            )
        })?;
        let value = point
            .value
            .ok_or_else(|| Error::data(name, DataErrorKind::MissingValue { index }))?;
        validate_value(name, index, value)?;
        points.push(ValuationPoint::new(date, value));
    }

    // Stable sort keeps the upstream order among equal dates
    points.sort_by_key(|p| p.date);

    let mut deduped: Vec<ValuationPoint> = Vec::with_capacity(points.len());
    for point in points {
        match deduped.last() {
            Some(prev) if prev.date == point.date => {
                if prev.value.to_bits() != point.value.to_bits() {
                    return Err(Error::data(
                        name,
                        DataErrorKind::DuplicateDate { date: point.date },
                    ));
                }
                tracing::debug!(
                    series = name,
                    date = %point.date,
                    "dropping duplicate valuation point"
                );
            }
            _ => deduped.push(point),
        }
    }

    ValuationSeries::new(name, deduped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(date: &str, value: f64) -> RawValuationPoint {
        RawValuationPoint::new(date, value)
    }

    #[test]
    fn test_normalize_sorts_by_date() {
        let input = vec![
            raw("2024-01-04", 103.0),
            raw("2024-01-02", 100.0),
            raw("2024-01-03", 101.0),
        ];
        let series = normalize("p", &input).unwrap();

        assert_eq!(series.values(), vec![100.0, 101.0, 103.0]);
        assert_eq!(
            series.first().date,
            NaiveDate::from_ymd_opt(2024, 1, 2).unwrap()
        );
    }

    #[test]
    fn test_normalize_collapses_identical_duplicates() {
        let input = vec![
            raw("2024-01-02", 100.0),
            raw("2024-01-02", 100.0),
            raw("2024-01-03", 101.0),
        ];
        let series = normalize("p", &input).unwrap();
        assert_eq!(series.len(), 2);
    }

    #[test]
    fn test_normalize_rejects_conflicting_duplicates() {
        let input = vec![raw("2024-01-02", 100.0), raw("2024-01-02", 99.0)];
        let result = normalize("p", &input);
        assert!(matches!(
            result,
            Err(Error::Data {
                kind: DataErrorKind::DuplicateDate { .. },
                ..
            })
        ));
    }

    #[test]
    fn test_normalize_rejects_missing_value() {
        let input = vec![
            raw("2024-01-02", 100.0),
            RawValuationPoint {
                date: "2024-01-03".to_string(),
                value: None,
            },
        ];
        let result = normalize("p", &input);
        assert!(matches!(
            result,
            Err(Error::Data {
                kind: DataErrorKind::MissingValue { index: 1 },
                ..
            })
        ));
    }

    #[test]
    fn test_normalize_rejects_non_positive_and_nan() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let input = vec![raw("2024-01-02", 100.0), raw("2024-01-03", bad)];
            let result = normalize("p", &input);
            assert!(matches!(
                result,
                Err(Error::Data {
                    kind: DataErrorKind::NonPositiveValue { index: 1, .. },
                    ..
                })
            ));
        }
    }

    #[test]
    fn test_normalize_rejects_bad_date() {
        let input = vec![raw("01/02/2024", 100.0)];
        let err = normalize("bench", &input).unwrap_err();
        assert!(err.to_string().contains("bench"));
        assert!(err.to_string().contains("01/02/2024"));
    }

    #[test]
    fn test_normalize_rejects_empty() {
        assert!(normalize("p", &[]).is_err());
    }
}

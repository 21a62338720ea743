//! Date alignment between two series.

use crate::types::{ValuationPoint, ValuationSeries};
use crate::Result;
use chrono::NaiveDate;
use std::cmp::Ordering;

/// Two series restricted to the dates they share.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AlignedSeries {
    /// Common dates in ascending order
    pub dates: Vec<NaiveDate>,
    /// Values of the first series on those dates
    pub left: Vec<f64>,
    /// Values of the second series on those dates
    pub right: Vec<f64>,
}

impl AlignedSeries {
    /// Number of common dates.
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    /// True when the series share no date.
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}

/// Inner-join two series on date.
///
/// Both inputs are already date-ordered, so this is a single merge pass.
pub fn align_by_date(left: &ValuationSeries, right: &ValuationSeries) -> AlignedSeries {
    let (a, b) = (left.points(), right.points());
    let capacity = a.len().min(b.len());
    let mut aligned = AlignedSeries {
        dates: Vec::with_capacity(capacity),
        left: Vec::with_capacity(capacity),
        right: Vec::with_capacity(capacity),
    };

    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].date.cmp(&b[j].date) {
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                aligned.dates.push(a[i].date);
                aligned.left.push(a[i].value);
                aligned.right.push(b[j].value);
                i += 1;
                j += 1;
            }
        }
    }

    aligned
}

/// Scale `series` so it starts at the same value as `reference`.
///
/// The scale factor is taken on the first date of `reference` that
/// `series` also has, so a benchmark plotted next to a portfolio starts at
/// the portfolio's value. Without a shared date the series is returned
/// unscaled.
pub fn rebase_to(series: &ValuationSeries, reference: &ValuationSeries) -> Result<ValuationSeries> {
    let anchor = reference
        .points()
        .iter()
        .find_map(|r| series.value_on(r.date).map(|value| (r.value, value)));

    let Some((reference_value, series_value)) = anchor else {
        tracing::debug!(
            series = series.name(),
            reference = reference.name(),
            "no shared date to rebase on, keeping original scale"
        );
        return Ok(series.clone());
    };

    let scale = reference_value / series_value;
    let points = series
        .points()
        .iter()
        .map(|p| ValuationPoint::new(p.date, p.value * scale))
        .collect();
    ValuationSeries::new(series.name(), points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
    }

    fn series(name: &str, points: &[(u32, f64)]) -> ValuationSeries {
        let points = points
            .iter()
            .map(|&(d, v)| ValuationPoint::new(date(d), v))
            .collect();
        ValuationSeries::new(name, points).unwrap()
    }

    #[test]
    fn test_align_keeps_common_dates_only() {
        let live = series("live", &[(1, 100.0), (2, 101.0), (3, 102.0), (6, 103.0)]);
        let backtest = series("bt", &[(2, 200.0), (3, 201.0), (4, 202.0), (6, 204.0)]);

        let aligned = align_by_date(&live, &backtest);

        assert_eq!(aligned.dates, vec![date(2), date(3), date(6)]);
        assert_eq!(aligned.left, vec![101.0, 102.0, 103.0]);
        assert_eq!(aligned.right, vec![200.0, 201.0, 204.0]);
    }

    #[test]
    fn test_align_disjoint_is_empty() {
        let a = series("a", &[(1, 1.0), (2, 1.0)]);
        let b = series("b", &[(3, 1.0), (4, 1.0)]);
        assert!(align_by_date(&a, &b).is_empty());
    }

    #[test]
    fn test_rebase_to_first_shared_date() {
        let portfolio = series("portfolio", &[(2, 10_000.0), (3, 10_100.0)]);
        let spy = series("spy", &[(1, 490.0), (2, 500.0), (3, 510.0)]);

        let rebased = rebase_to(&spy, &portfolio).unwrap();

        assert_eq!(rebased.len(), 3);
        assert_relative_eq!(rebased.points()[1].value, 10_000.0, epsilon = 1e-9);
        assert_relative_eq!(rebased.points()[2].value, 10_200.0, epsilon = 1e-9);
        assert_relative_eq!(rebased.points()[0].value, 9_800.0, epsilon = 1e-9);
    }

    #[test]
    fn test_rebase_without_overlap_keeps_scale() {
        let portfolio = series("portfolio", &[(10, 10_000.0)]);
        let spy = series("spy", &[(1, 490.0), (2, 500.0)]);

        let rebased = rebase_to(&spy, &portfolio).unwrap();
        assert_eq!(rebased, spy);
    }
}

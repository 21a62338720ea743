//! Portfolio returns built from per-symphony histories.

use crate::metrics::stats::safe_ratio;
use crate::types::{ValuationPoint, ValuationSeries};
use crate::{DataErrorKind, Error, Result};
use chrono::NaiveDate;

/// Daily portfolio returns over the union of all symphony dates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightedReturns {
    /// Every date any symphony reports, ascending
    pub dates: Vec<NaiveDate>,
    /// `returns[i]` is the return from `dates[i]` to `dates[i + 1]`
    pub returns: Vec<f64>,
}

impl WeightedReturns {
    /// Compound the returns into a valuation series starting at `base`.
    ///
    /// A day losing 100% or more leaves no positive value and is rejected.
    pub fn to_index(&self, name: &str, base: f64) -> Result<ValuationSeries> {
        let mut value = base;
        let mut points = Vec::with_capacity(self.dates.len());
        for (i, &date) in self.dates.iter().enumerate() {
            if i > 0 {
                value *= 1.0 + self.returns[i - 1];
            }
            points.push(ValuationPoint::new(date, value));
        }
        ValuationSeries::new(name, points)
    }
}

/// Combine symphony histories into value-weighted daily portfolio returns.
///
/// Each holding is a `(deposit_adjusted, value)` pair. For every pair of
/// consecutive dates, a symphony contributes its deposit-adjusted return
/// weighted by its value on the earlier date, provided it reports both dates
/// and has a value on the earlier one:
///
/// `r_t = Σ v_prev · r_i / Σ v_prev`
///
/// A day no symphony can contribute to has a return of 0.
pub fn value_weighted_returns(
    name: &str,
    holdings: &[(ValuationSeries, ValuationSeries)],
) -> Result<WeightedReturns> {
    if holdings.is_empty() {
        return Err(Error::data(name, DataErrorKind::Empty));
    }

    let mut dates: Vec<NaiveDate> = holdings
        .iter()
        .flat_map(|(deposit_adjusted, _)| deposit_adjusted.dates())
        .collect();
    dates.sort_unstable();
    dates.dedup();

    if dates.len() < 2 {
        return Err(Error::data(
            name,
            DataErrorKind::TooShort {
                len: dates.len(),
                required: 2,
            },
        ));
    }

    let returns = dates
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (pair[0], pair[1]);
            let mut weighted_sum = 0.0;
            let mut total_prev = 0.0;
            for (deposit_adjusted, value) in holdings {
                let (Some(start), Some(end), Some(weight)) = (
                    deposit_adjusted.value_on(prev),
                    deposit_adjusted.value_on(curr),
                    value.value_on(prev),
                ) else {
                    continue;
                };
                weighted_sum += weight * (end / start - 1.0);
                total_prev += weight;
            }
            if total_prev == 0.0 {
                tracing::debug!(portfolio = name, date = %curr, "no symphony covers this day");
            }
            safe_ratio(weighted_sum, total_prev)
        })
        .collect();

    Ok(WeightedReturns { dates, returns })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, d).unwrap()
    }

    fn series(name: &str, points: &[(u32, f64)]) -> ValuationSeries {
        let points = points
            .iter()
            .map(|&(d, v)| ValuationPoint::new(day(d), v))
            .collect();
        ValuationSeries::new(name, points).unwrap()
    }

    #[test]
    fn test_symphony_missing_a_day_is_left_out() {
        let growth = (
            series("growth depo", &[(1, 100.0), (2, 110.0), (3, 121.0), (4, 133.1)]),
            series("growth value", &[(1, 1_000.0), (2, 1_100.0), (3, 1_210.0), (4, 1_331.0)]),
        );
        // no data on the 3rd
        let hedge = (
            series("hedge depo", &[(1, 50.0), (2, 45.0), (4, 49.5)]),
            series("hedge value", &[(1, 3_000.0), (2, 2_700.0), (4, 2_970.0)]),
        );

        let weighted = value_weighted_returns("portfolio", &[growth, hedge]).unwrap();

        assert_eq!(weighted.dates, vec![day(1), day(2), day(3), day(4)]);
        assert_eq!(weighted.returns.len(), 3);
        // (1000 * 0.10 + 3000 * -0.10) / 4000
        assert_relative_eq!(weighted.returns[0], -0.05, epsilon = 1e-12);
        // hedge lacks the 3rd on both sides of it
        assert_relative_eq!(weighted.returns[1], 0.10, epsilon = 1e-12);
        assert_relative_eq!(weighted.returns[2], 0.10, epsilon = 1e-12);

        let index = weighted.to_index("portfolio", 100.0).unwrap();
        assert_relative_eq!(index.points()[1].value, 95.0, epsilon = 1e-9);
        assert_relative_eq!(index.last().value, 114.95, epsilon = 1e-9);
    }

    #[test]
    fn test_uncovered_day_has_zero_return() {
        let early = (
            series("early depo", &[(1, 100.0), (2, 102.0)]),
            series("early value", &[(1, 500.0), (2, 510.0)]),
        );
        let late = (
            series("late depo", &[(3, 200.0), (4, 190.0)]),
            series("late value", &[(3, 800.0), (4, 760.0)]),
        );

        let weighted = value_weighted_returns("portfolio", &[early, late]).unwrap();
        assert_relative_eq!(weighted.returns[0], 0.02, epsilon = 1e-12);
        assert_eq!(weighted.returns[1], 0.0);
        assert_relative_eq!(weighted.returns[2], -0.05, epsilon = 1e-12);
    }

    #[test]
    fn test_value_weights_differ_from_deposit_adjusted() {
        // deposits inflate the raw value, so weights come from the value
        // series while returns come from the deposit-adjusted one
        let holding = (
            series("depo", &[(1, 100.0), (2, 103.0)]),
            series("value", &[(1, 100.0), (2, 600.0)]),
        );
        let weighted = value_weighted_returns("portfolio", &[holding]).unwrap();
        assert_relative_eq!(weighted.returns[0], 0.03, epsilon = 1e-12);
    }

    #[test]
    fn test_rejects_empty_and_single_date() {
        assert!(matches!(
            value_weighted_returns("portfolio", &[]),
            Err(Error::Data {
                kind: DataErrorKind::Empty,
                ..
            })
        ));

        let single = (series("depo", &[(1, 100.0)]), series("value", &[(1, 100.0)]));
        assert!(matches!(
            value_weighted_returns("portfolio", &[single]),
            Err(Error::Data {
                kind: DataErrorKind::TooShort { len: 1, .. },
                ..
            })
        ));
    }

    #[test]
    fn test_total_loss_cannot_be_indexed() {
        let weighted = WeightedReturns {
            dates: vec![day(1), day(2)],
            returns: vec![-1.0],
        };
        assert!(weighted.to_index("portfolio", 100.0).is_err());
    }
}

//! Live-vs-backtest deviation scoring for a single symphony.

use super::policy::ScoringPolicy;
use crate::config::AnalyticsConfig;
use crate::metrics::stats::{mean, pearson_correlation, rmse, safe_ratio, sample_std_dev};
use crate::series::{align_by_date, returns_from_values};
use crate::types::{ComparisonPoint, RiskLevel, SymphonyDeviation, SymphonyInput, ValuationSeries};
use crate::{DataErrorKind, Error, Result};
use serde::{Deserialize, Serialize};

/// Unscored statistics of one live/backtest comparison.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DeviationMetrics {
    /// Annualized std dev of daily return differences, in percent
    pub tracking_error_annualized_pct: f64,
    /// Pearson correlation of aligned daily returns
    pub correlation: f64,
    /// Mean |live cumulative % - backtest cumulative %|, in percent
    pub mean_deviation_pct: f64,
    /// Max |live cumulative % - backtest cumulative %|, in percent
    pub max_deviation_pct: f64,
    pub live_return_pct: f64,
    pub backtest_return_pct: f64,
    pub return_difference_pct: f64,
    /// Number of aligned dates
    pub period_days: usize,
    /// Root mean square error of aligned values
    pub rmse: f64,
    /// Root mean square error of aligned daily returns
    pub rmse_returns: f64,
    /// Per-date chart rows
    pub comparison: Vec<ComparisonPoint>,
}

impl DeviationMetrics {
    /// Compare a live series with its backtest over their common dates.
    ///
    /// Fails with `InsufficientOverlap` when fewer than 2 dates are shared.
    pub fn compute(
        live: &ValuationSeries,
        backtest: &ValuationSeries,
        periods_per_year: f64,
    ) -> Result<Self> {
        let label = format!("{} vs {}", live.name(), backtest.name());
        let aligned = align_by_date(live, backtest);
        if aligned.len() < 2 {
            return Err(Error::data(
                label,
                DataErrorKind::InsufficientOverlap {
                    common: aligned.len(),
                },
            ));
        }

        let live_returns = returns_from_values(&label, &aligned.left)?;
        let backtest_returns = returns_from_values(&label, &aligned.right)?;

        let differences: Vec<f64> = live_returns
            .iter()
            .zip(&backtest_returns)
            .map(|(l, b)| l - b)
            .collect();
        let tracking_error = sample_std_dev(&differences) * periods_per_year.sqrt();

        let (live_start, backtest_start) = (aligned.left[0], aligned.right[0]);
        let gaps: Vec<f64> = aligned
            .left
            .iter()
            .zip(&aligned.right)
            .map(|(l, b)| ((l / live_start - 1.0) - (b / backtest_start - 1.0)).abs())
            .collect();

        let last = aligned.len() - 1;
        let live_return_pct = (aligned.left[last] / live_start - 1.0) * 100.0;
        let backtest_return_pct = (aligned.right[last] / backtest_start - 1.0) * 100.0;

        let comparison = aligned
            .dates
            .iter()
            .zip(aligned.left.iter().zip(&aligned.right))
            .map(|(&date, (&live, &backtest))| ComparisonPoint {
                date,
                live,
                backtest,
                deviation_pct: safe_ratio(live - backtest, backtest) * 100.0,
            })
            .collect();

        Ok(Self {
            tracking_error_annualized_pct: tracking_error * 100.0,
            correlation: return_correlation(&live_returns, &backtest_returns),
            mean_deviation_pct: mean(&gaps) * 100.0,
            max_deviation_pct: gaps.iter().copied().fold(0.0, f64::max) * 100.0,
            live_return_pct,
            backtest_return_pct,
            return_difference_pct: live_return_pct - backtest_return_pct,
            period_days: aligned.len(),
            rmse: rmse(&aligned.left, &aligned.right),
            rmse_returns: rmse(&live_returns, &backtest_returns),
            comparison,
        })
    }
}

/// Correlation of two aligned return series.
///
/// Identical series correlate perfectly even when flat; otherwise a flat
/// series has no defined correlation and scores 0.
fn return_correlation(live: &[f64], backtest: &[f64]) -> f64 {
    if live == backtest {
        return 1.0;
    }
    pearson_correlation(live, backtest)
}

/// Check a symphony's current market value.
pub fn validate_current_value(symphony: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(Error::data(
            symphony,
            DataErrorKind::InvalidCurrentValue { value },
        ));
    }
    Ok(())
}

/// Scores symphonies against their backtests under a [`ScoringPolicy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationScorer {
    policy: ScoringPolicy,
    periods_per_year: f64,
}

impl Default for DeviationScorer {
    fn default() -> Self {
        Self::from_config(&AnalyticsConfig::default())
    }
}

impl DeviationScorer {
    /// Create a scorer with an explicit policy.
    pub fn new(policy: ScoringPolicy, periods_per_year: f64) -> Self {
        Self {
            policy,
            periods_per_year,
        }
    }

    /// Create a scorer from the analytics configuration.
    pub fn from_config(config: &AnalyticsConfig) -> Self {
        Self::new(config.scoring, config.periods_per_year)
    }

    /// Get the scoring policy.
    pub fn policy(&self) -> &ScoringPolicy {
        &self.policy
    }

    /// Compute unscored deviation statistics.
    pub fn compare(
        &self,
        live: &ValuationSeries,
        backtest: &ValuationSeries,
    ) -> Result<DeviationMetrics> {
        DeviationMetrics::compute(live, backtest, self.periods_per_year)
    }

    /// Composite risk score and level for computed statistics.
    pub fn rate(&self, metrics: &DeviationMetrics) -> (f64, RiskLevel) {
        let score = self.policy.weights.score(
            metrics.tracking_error_annualized_pct,
            metrics.correlation,
            metrics.mean_deviation_pct,
        );
        (score, self.policy.thresholds.classify(score))
    }

    /// Score one symphony.
    ///
    /// Fails when the current value is not a finite, non-negative amount,
    /// since it weights the symphony in the portfolio summary.
    pub fn score(&self, input: &SymphonyInput) -> Result<SymphonyDeviation> {
        validate_current_value(&input.name, input.current_value)?;
        let metrics = self.compare(&input.live, &input.backtest)?;
        let (risk_score, risk_level) = self.rate(&metrics);

        Ok(SymphonyDeviation {
            id: input.id.clone(),
            name: input.name.clone(),
            risk_score,
            risk_level,
            tracking_error_annualized_pct: metrics.tracking_error_annualized_pct,
            correlation: metrics.correlation,
            mean_deviation_pct: metrics.mean_deviation_pct,
            max_deviation_pct: metrics.max_deviation_pct,
            live_return_pct: metrics.live_return_pct,
            backtest_return_pct: metrics.backtest_return_pct,
            return_difference_pct: metrics.return_difference_pct,
            period_days: metrics.period_days,
            current_value: input.current_value,
        })
    }
}

//! Consolidated portfolio performance report.
//!
//! Every view of a portfolio (summary cards, risk table, drawdown chart,
//! lookback strip, VaR panel) reads from one [`PerformanceReport`], so the
//! numbers cannot drift apart between consumers.

use crate::config::AnalyticsConfig;
use crate::metrics::stats::pearson_correlation;
use crate::metrics::{
    calculate_risk_metrics, drawdown_curve, lookback_returns, summarize_drawdowns, value_at_risk,
};
use crate::series::{align_by_date, daily_returns, rebase_to, returns_from_values};
use crate::types::{
    DrawdownPoint, DrawdownSummary, LookbackReturns, RiskMetricsSnapshot, ValuationPoint,
    ValuationSeries, ValueAtRisk,
};
use crate::Result;
use serde::{Deserialize, Serialize};

/// Lookback returns for the portfolio and, when supplied, its benchmark.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Lookbacks {
    pub portfolio: LookbackReturns,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<LookbackReturns>,
}

/// All performance and risk analytics for one portfolio series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PerformanceReport {
    pub metrics: RiskMetricsSnapshot,
    pub drawdown: Vec<DrawdownPoint>,
    pub drawdown_summary: DrawdownSummary,
    pub lookbacks: Lookbacks,
    pub value_at_risk: ValueAtRisk,
    /// Benchmark scaled to the portfolio's value on their first shared date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark: Option<ValuationSeries>,
    /// Correlation of daily returns with the benchmark on shared dates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_correlation: Option<f64>,
    /// Benchmark statistics over the dates it shares with the portfolio
    #[serde(skip_serializing_if = "Option::is_none")]
    pub benchmark_metrics: Option<RiskMetricsSnapshot>,
}

impl PerformanceReport {
    /// Compute the report.
    ///
    /// # Arguments
    ///
    /// * `portfolio` - Portfolio valuation series (at least 2 points)
    /// * `benchmark` - Optional benchmark series (e.g., SPY closes)
    /// * `current_value` - Portfolio value for dollar VaR; defaults to the
    ///   last portfolio value
    /// * `config` - Annualization and VaR settings
    pub fn compute(
        portfolio: &ValuationSeries,
        benchmark: Option<&ValuationSeries>,
        current_value: Option<f64>,
        config: &AnalyticsConfig,
    ) -> Result<Self> {
        let metrics = calculate_risk_metrics(portfolio, config.periods_per_year)?;
        let returns = daily_returns(portfolio)?;
        let drawdown = drawdown_curve(portfolio);
        let drawdown_summary = summarize_drawdowns(&drawdown);

        let total_value = current_value.unwrap_or(portfolio.last().value);
        let value_at_risk = value_at_risk(&returns, total_value, config.var_confidence)?;

        let rebased = benchmark.map(|b| rebase_to(b, portfolio)).transpose()?;
        let benchmark_lookbacks = rebased.as_ref().map(|b| lookback_returns(&b.values()));
        let comparison = match benchmark {
            Some(b) => compare_benchmark(portfolio, b, config.periods_per_year)?,
            None => None,
        };
        let (benchmark_correlation, benchmark_metrics) = comparison.unzip();

        Ok(Self {
            metrics,
            drawdown,
            drawdown_summary,
            lookbacks: Lookbacks {
                portfolio: lookback_returns(&portfolio.values()),
                benchmark: benchmark_lookbacks,
            },
            value_at_risk,
            benchmark: rebased,
            benchmark_correlation,
            benchmark_metrics,
        })
    }
}

/// Return correlation and benchmark statistics on the shared dates, or
/// `None` when fewer than 2 dates are shared.
fn compare_benchmark(
    portfolio: &ValuationSeries,
    benchmark: &ValuationSeries,
    periods_per_year: f64,
) -> Result<Option<(f64, RiskMetricsSnapshot)>> {
    let aligned = align_by_date(portfolio, benchmark);
    if aligned.len() < 2 {
        tracing::debug!(
            portfolio = portfolio.name(),
            benchmark = benchmark.name(),
            common = aligned.len(),
            "not enough shared dates for benchmark comparison"
        );
        return Ok(None);
    }

    let portfolio_returns = returns_from_values(portfolio.name(), &aligned.left)?;
    let benchmark_returns = returns_from_values(benchmark.name(), &aligned.right)?;
    let correlation = pearson_correlation(&portfolio_returns, &benchmark_returns);

    let shared = aligned
        .dates
        .iter()
        .zip(&aligned.right)
        .map(|(&date, &value)| ValuationPoint::new(date, value))
        .collect();
    let shared = ValuationSeries::new(benchmark.name(), shared)?;
    let metrics = calculate_risk_metrics(&shared, periods_per_year)?;

    Ok(Some((correlation, metrics)))
}

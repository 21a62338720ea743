//! Portfolio-level aggregation of symphony deviations.

use super::scorer::DeviationScorer;
use crate::metrics::stats::{mean, safe_ratio};
use crate::types::{
    PortfolioDeviationReport, PortfolioRiskSummary, RiskLevelCounts, SymphonyDeviation,
    SymphonyFailure, SymphonyInput,
};
use rayon::prelude::*;

/// Summarize scored symphonies.
///
/// The risk score is weighted by current value; tracking error and
/// correlation are plain averages across symphonies.
pub fn aggregate(symphonies: &[SymphonyDeviation]) -> PortfolioRiskSummary {
    let total_value: f64 = symphonies.iter().map(|s| s.current_value).sum();
    let weighted_score: f64 = symphonies
        .iter()
        .map(|s| s.risk_score * s.current_value)
        .sum();

    let mut counts = RiskLevelCounts::default();
    for symphony in symphonies {
        counts.record(symphony.risk_level);
    }

    let tracking_errors: Vec<f64> = symphonies
        .iter()
        .map(|s| s.tracking_error_annualized_pct)
        .collect();
    let correlations: Vec<f64> = symphonies.iter().map(|s| s.correlation).collect();

    PortfolioRiskSummary {
        total_symphonies: symphonies.len(),
        total_portfolio_value: total_value,
        weighted_avg_risk_score: safe_ratio(weighted_score, total_value),
        risk_level_counts: counts,
        avg_tracking_error_pct: mean(&tracking_errors),
        avg_correlation: mean(&correlations),
    }
}

/// Score every symphony and summarize the portfolio.
///
/// Symphonies are scored in parallel. A symphony whose data fails
/// validation is reported in `failures` and left out of the summary; it
/// never prevents the others from being scored. Results are sorted by risk
/// score, highest first.
pub fn score_portfolio(
    scorer: &DeviationScorer,
    inputs: &[SymphonyInput],
) -> PortfolioDeviationReport {
    let outcomes: Vec<_> = inputs
        .par_iter()
        .map(|input| (input, scorer.score(input)))
        .collect();

    let mut symphonies = Vec::with_capacity(outcomes.len());
    let mut failures = Vec::new();
    for (input, outcome) in outcomes {
        match outcome {
            Ok(deviation) => symphonies.push(deviation),
            Err(e) => {
                tracing::warn!(symphony = %input.id, error = %e, "skipping symphony");
                failures.push(SymphonyFailure {
                    id: input.id.clone(),
                    name: input.name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    symphonies.sort_by(|a, b| b.risk_score.total_cmp(&a.risk_score));
    let summary = aggregate(&symphonies);

    tracing::info!(
        scored = symphonies.len(),
        failed = failures.len(),
        weighted_avg_risk_score = summary.weighted_avg_risk_score,
        "scored portfolio symphonies"
    );

    PortfolioDeviationReport {
        symphonies,
        failures,
        summary,
    }
}

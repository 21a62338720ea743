//! Live-vs-backtest deviation analysis.
//!
//! Scores how far each symphony's live trading has drifted from its
//! backtest and rolls the results up to the portfolio.

mod aggregate;
mod policy;
mod scorer;

pub use aggregate::{aggregate, score_portfolio};
pub use policy::{RiskThresholds, ScoreWeights, ScoringPolicy};
pub use scorer::{validate_current_value, DeviationMetrics, DeviationScorer};

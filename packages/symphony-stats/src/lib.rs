//! Symphony Stats - Portfolio performance and live-vs-backtest analytics.
//!
//! This crate turns daily valuation series into the numbers shown on the
//! portfolio dashboard:
//!
//! - **Series**: normalization, daily returns, date alignment, benchmark rebasing,
//!   value-weighted portfolio returns
//! - **Metrics**: CAGR, volatility, Sharpe, Sortino, Calmar, win/loss stats,
//!   drawdowns, lookback returns, historical and parametric VaR
//! - **Deviation**: live-vs-backtest tracking error, correlation, composite
//!   risk score and portfolio-level aggregation
//! - **Report**: one entry point computing every portfolio metric at once
//!
//! Every computation is a pure function of its inputs. Nothing is cached or
//! persisted between calls.
//!
//! # Example
//!
//! ```rust
//! use symphony_stats::{AnalyticsConfig, PerformanceReport, ValuationSeries};
//! use chrono::NaiveDate;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
//! let values = [100.0, 110.0, 121.0, 108.9];
//! let series = ValuationSeries::from_values("portfolio", start, &values).unwrap();
//!
//! let config = AnalyticsConfig::default();
//! let report = PerformanceReport::compute(&series, None, None, &config).unwrap();
//! assert!((report.metrics.max_drawdown + 0.10).abs() < 1e-9);
//! ```

pub mod config;
pub mod deviation;
pub mod metrics;
pub mod report;
pub mod series;
pub mod types;

use chrono::NaiveDate;

// Re-export commonly used types
pub use types::{
    ApiResponse, ComparisonPoint, DrawdownPoint, DrawdownSummary, LookbackKey, LookbackReturns,
    PortfolioDeviationReport, PortfolioRiskSummary, RawValuationPoint, RiskLevel,
    RiskLevelCounts, RiskMetricsSnapshot, SymphonyDeviation, SymphonyFailure, SymphonyInput,
    ValuationPoint, ValuationSeries, ValueAtRisk,
};

// Re-export main functionality
pub use config::AnalyticsConfig;
pub use deviation::{
    aggregate, score_portfolio, DeviationMetrics, DeviationScorer, RiskThresholds, ScoreWeights,
    ScoringPolicy,
};
pub use metrics::{
    calculate_risk_metrics, drawdown_curve, lookback_returns, summarize_drawdowns, value_at_risk,
};
pub use report::PerformanceReport;
pub use series::{
    align_by_date, daily_returns, normalize, rebase_to, value_weighted_returns, WeightedReturns,
};

/// Error types for symphony-stats operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Data error in series '{series}': {kind}")]
    Data {
        series: String,
        kind: DataErrorKind,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Build a data error for the named series.
    pub fn data(series: impl Into<String>, kind: DataErrorKind) -> Self {
        Error::Data {
            series: series.into(),
            kind,
        }
    }
}

/// The specific data-quality check a series failed.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DataErrorKind {
    #[error("series is empty")]
    Empty,

    #[error("series has {len} points, at least {required} required")]
    TooShort { len: usize, required: usize },

    #[error("missing value at index {index}")]
    MissingValue { index: usize },

    #[error("non-positive value {value} at index {index}")]
    NonPositiveValue { index: usize, value: f64 },

    #[error("invalid date '{raw}' at index {index}")]
    InvalidDate { index: usize, raw: String },

    #[error("conflicting values for duplicate date {date}")]
    DuplicateDate { date: NaiveDate },

    #[error("date at index {index} is not after the previous date")]
    UnorderedDate { index: usize },

    #[error("only {common} common dates, at least 2 required")]
    InsufficientOverlap { common: usize },

    #[error("current value is missing")]
    MissingCurrentValue,

    #[error("current value {value} must be a finite, non-negative amount")]
    InvalidCurrentValue { value: f64 },
}

/// Result type for symphony-stats operations.
pub type Result<T> = std::result::Result<T, Error>;

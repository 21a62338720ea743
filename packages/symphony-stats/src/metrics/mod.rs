//! Performance and risk metrics.
//!
//! Provides return statistics, drawdowns, lookback returns and Value at Risk.

mod drawdown;
mod lookback;
mod risk;
pub mod stats;
mod var;

pub use drawdown::{calculate_max_drawdown, drawdown_curve, peaks_from_curve, summarize_drawdowns};
pub use lookback::{lookback_returns, window_return};
pub use risk::{
    annualized_volatility, cagr, calculate_risk_metrics, calmar_ratio, downside_deviation,
    norm_ppf, sharpe_ratio, sortino_ratio, TRADING_DAYS_PER_YEAR,
};
pub use var::{expected_shortfall, historical_var, parametric_var, value_at_risk};

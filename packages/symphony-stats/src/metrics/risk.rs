//! Return and risk-ratio statistics.
//!
//! Provides CAGR, volatility, Sharpe, Sortino, Calmar and win/loss
//! statistics. The risk-free rate is taken as 0 and every ratio resolves to 0
//! when its denominator is 0.

use super::drawdown::{drawdown_curve, summarize_drawdowns};
use super::stats::{mean, safe_ratio, sample_std_dev, saturate};
use crate::series::daily_returns;
use crate::types::{RiskMetricsSnapshot, ValuationSeries};
use crate::Result;

/// Trading days per year used for annualization.
pub const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Calculate the full risk snapshot for a valuation series.
///
/// # Arguments
///
/// * `series` - Validated valuation series with at least 2 points
/// * `periods_per_year` - Annualization factor (typically 252)
///
/// # Returns
///
/// Returns a `RiskMetricsSnapshot`, or a data error if the series is too short.
pub fn calculate_risk_metrics(
    series: &ValuationSeries,
    periods_per_year: f64,
) -> Result<RiskMetricsSnapshot> {
    let returns = daily_returns(series)?;
    let first = series.first().value;
    let last = series.last().value;

    let annualized_return = cagr(first, last, returns.len(), periods_per_year);
    let annualized_vol = annualized_volatility(&returns, periods_per_year);
    let drawdowns = summarize_drawdowns(&drawdown_curve(series));

    let wins: Vec<f64> = returns.iter().copied().filter(|&r| r > 0.0).collect();
    let losses: Vec<f64> = returns.iter().copied().filter(|&r| r < 0.0).collect();

    Ok(RiskMetricsSnapshot {
        annualized_return,
        annualized_vol,
        sharpe: sharpe_ratio(&returns, annualized_return, periods_per_year),
        sortino: sortino_ratio(&returns, annualized_return, periods_per_year),
        calmar: calmar_ratio(annualized_return, drawdowns.max_drawdown),
        max_drawdown: drawdowns.max_drawdown,
        current_drawdown: drawdowns.current_drawdown,
        win_pct: wins.len() as f64 / returns.len() as f64,
        avg_win: mean(&wins),
        avg_loss: mean(&losses),
        largest_win: returns.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        largest_loss: returns.iter().copied().fold(f64::INFINITY, f64::min),
        total_return: last / first - 1.0,
        avg_daily_return: mean(&returns),
        observations: returns.len(),
    })
}

/// Compound annual growth rate over `observations` daily returns.
///
/// `(last / first)^(periods_per_year / observations) - 1`. Each observation
/// counts as one trading day regardless of calendar gaps. Growth too large
/// to represent saturates at `f64::MAX` rather than reading as flat.
pub fn cagr(first: f64, last: f64, observations: usize, periods_per_year: f64) -> f64 {
    if observations == 0 || first <= 0.0 {
        return 0.0;
    }
    saturate((last / first).powf(periods_per_year / observations as f64) - 1.0)
}

/// Annualized volatility: sample standard deviation times sqrt(periods).
pub fn annualized_volatility(returns: &[f64], periods_per_year: f64) -> f64 {
    sample_std_dev(returns) * periods_per_year.sqrt()
}

/// Annualized downside deviation over the negative returns only.
///
/// `sqrt(mean(r^2 for r < 0)) * sqrt(periods)`; 0 when no return is negative.
pub fn downside_deviation(returns: &[f64], periods_per_year: f64) -> f64 {
    let squares: Vec<f64> = returns
        .iter()
        .filter(|&&r| r < 0.0)
        .map(|r| r.powi(2))
        .collect();
    mean(&squares).sqrt() * periods_per_year.sqrt()
}

/// Sharpe ratio of a return series (risk-free rate 0).
pub fn sharpe_ratio(returns: &[f64], annualized_return: f64, periods_per_year: f64) -> f64 {
    safe_ratio(
        annualized_return,
        annualized_volatility(returns, periods_per_year),
    )
}

/// Sortino ratio of a return series (risk-free rate 0).
///
/// Returns 0, not infinity, when no return is negative.
pub fn sortino_ratio(returns: &[f64], annualized_return: f64, periods_per_year: f64) -> f64 {
    safe_ratio(
        annualized_return,
        downside_deviation(returns, periods_per_year),
    )
}

/// Calmar ratio: CAGR over the magnitude of the maximum drawdown.
pub fn calmar_ratio(annualized_return: f64, max_drawdown: f64) -> f64 {
    safe_ratio(annualized_return, max_drawdown.abs())
}

/// Inverse cumulative distribution function for standard normal distribution.
///
/// Uses Acklam's algorithm for high accuracy across the full range.
/// Source: https://web.archive.org/web/20151110174102/http://home.online.no/~pjacklam/notes/invnorm/
pub fn norm_ppf(p: f64) -> f64 {
    // Coefficients in rational approximations
    const A: [f64; 6] = [
        -3.969683028665376e+01,
        2.209460984245205e+02,
        -2.759285104469687e+02,
        1.383577518672690e+02,
        -3.066479806614716e+01,
        2.506628277459239e+00,
    ];

    const B: [f64; 5] = [
        -5.447609879822406e+01,
        1.615858368580409e+02,
        -1.556989798598866e+02,
        6.680131188771972e+01,
        -1.328068155288572e+01,
    ];

    const C: [f64; 6] = [
        -7.784894002430293e-03,
        -3.223964580411365e-01,
        -2.400758277161838e+00,
        -2.549732539343734e+00,
        4.374664141464968e+00,
        2.938163982698783e+00,
    ];

    const D: [f64; 4] = [
        7.784695709041462e-03,
        3.224671290700398e-01,
        2.445134137142996e+00,
        3.754408661907416e+00,
    ];

    const P_LOW: f64 = 0.02425;
    const P_HIGH: f64 = 1.0 - P_LOW;

    if p <= 0.0 {
        return f64::NEG_INFINITY;
    }
    if p >= 1.0 {
        return f64::INFINITY;
    }

    if p < P_LOW {
        let q = (-2.0 * p.ln()).sqrt();
        (((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    } else if p <= P_HIGH {
        let q = p - 0.5;
        let r = q * q;
        (((((A[0] * r + A[1]) * r + A[2]) * r + A[3]) * r + A[4]) * r + A[5]) * q
            / (((((B[0] * r + B[1]) * r + B[2]) * r + B[3]) * r + B[4]) * r + 1.0)
    } else {
        let q = (-2.0 * (1.0 - p).ln()).sqrt();
        -(((((C[0] * q + C[1]) * q + C[2]) * q + C[3]) * q + C[4]) * q + C[5])
            / ((((D[0] * q + D[1]) * q + D[2]) * q + D[3]) * q + 1.0)
    }
}

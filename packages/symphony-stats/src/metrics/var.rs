//! Value at Risk and Expected Shortfall.

use super::risk::norm_ppf;
use super::stats::{mean, percentile, sample_std_dev};
use crate::types::ValueAtRisk;
use crate::{DataErrorKind, Error, Result};

/// Calculate historical and parametric VaR plus Expected Shortfall.
///
/// # Arguments
///
/// * `returns` - Daily returns (e.g., 0.01 for 1% daily return)
/// * `total_value` - Current portfolio value in dollars
/// * `confidence` - Confidence level (e.g., 0.95 for 95%)
///
/// # Returns
///
/// Fractions are positive for losses; the dollar variants are the fractions
/// times `total_value`.
pub fn value_at_risk(returns: &[f64], total_value: f64, confidence: f64) -> Result<ValueAtRisk> {
    if returns.is_empty() {
        return Err(Error::data("returns", DataErrorKind::Empty));
    }
    if !total_value.is_finite() || total_value < 0.0 {
        return Err(Error::data(
            "portfolio value",
            DataErrorKind::InvalidCurrentValue { value: total_value },
        ));
    }
    if !(confidence > 0.0 && confidence < 1.0) {
        return Err(Error::InvalidConfig(format!(
            "VaR confidence must be between 0 and 1, got {}",
            confidence
        )));
    }

    let historical = historical_var(returns, confidence);
    let parametric = parametric_var(returns, confidence);
    let shortfall = expected_shortfall(returns, confidence);

    Ok(ValueAtRisk {
        confidence,
        historical_var: historical,
        parametric_var: parametric,
        expected_shortfall: shortfall,
        historical_var_dollar: historical * total_value,
        parametric_var_dollar: parametric * total_value,
        expected_shortfall_dollar: shortfall * total_value,
        total_value,
    })
}

fn sorted(returns: &[f64]) -> Vec<f64> {
    let mut sorted = returns.to_vec();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Return at the (1 - confidence) tail of the empirical distribution.
fn tail_threshold(sorted_returns: &[f64], confidence: f64) -> f64 {
    percentile(sorted_returns, (1.0 - confidence) * 100.0)
}

/// Historical VaR: the negated (1 - confidence) percentile of returns.
pub fn historical_var(returns: &[f64], confidence: f64) -> f64 {
    -tail_threshold(&sorted(returns), confidence)
}

/// Parametric VaR assuming normally distributed returns.
///
/// `-(mean + z * std)` with `z = Φ⁻¹(1 - confidence)` and the sample
/// standard deviation.
pub fn parametric_var(returns: &[f64], confidence: f64) -> f64 {
    let z = norm_ppf(1.0 - confidence);
    -(mean(returns) + z * sample_std_dev(returns))
}

/// Expected Shortfall: the negated mean of returns at or below the
/// historical VaR threshold, or the worst return if none qualify.
pub fn expected_shortfall(returns: &[f64], confidence: f64) -> f64 {
    let sorted = sorted(returns);
    let Some(&worst) = sorted.first() else {
        return 0.0;
    };

    let threshold = tail_threshold(&sorted, confidence);
    let tail: Vec<f64> = sorted.iter().copied().take_while(|&r| r <= threshold).collect();
    if tail.is_empty() {
        return -worst;
    }
    -mean(&tail)
}

//! Risk-score weights and risk-level thresholds.
//!
//! These are tunable policy, not derived constants. They live apart from the
//! statistics so they can be overridden from configuration and tested on
//! their own.

use crate::metrics::stats::saturate;
use crate::types::RiskLevel;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Weights of the composite live-vs-backtest risk score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScoreWeights {
    /// Weight on annualized tracking error (in percent)
    pub tracking_error: f64,
    /// Weight on (1 - correlation) * 100
    pub decorrelation: f64,
    /// Weight on mean cumulative deviation (in percent)
    pub mean_deviation: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            tracking_error: 0.4,
            decorrelation: 0.3,
            mean_deviation: 0.3,
        }
    }
}

impl ScoreWeights {
    /// Composite score clamped to [0, 100].
    pub fn score(
        &self,
        tracking_error_pct: f64,
        correlation: f64,
        mean_deviation_pct: f64,
    ) -> f64 {
        let raw = self.tracking_error * tracking_error_pct
            + self.decorrelation * (1.0 - correlation) * 100.0
            + self.mean_deviation * mean_deviation_pct;
        saturate(raw).clamp(0.0, 100.0)
    }

    fn validate(&self) -> Result<()> {
        let weights = [
            ("tracking_error", self.tracking_error),
            ("decorrelation", self.decorrelation),
            ("mean_deviation", self.mean_deviation),
        ];
        for (name, weight) in weights {
            if !weight.is_finite() || weight < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "score weight '{}' must be a non-negative number, got {}",
                    name, weight
                )));
            }
        }
        Ok(())
    }
}

/// Upper score bound (inclusive) of each risk level below `High`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct RiskThresholds {
    pub low: f64,
    pub moderate: f64,
    pub elevated: f64,
}

impl Default for RiskThresholds {
    fn default() -> Self {
        Self {
            low: 25.0,
            moderate: 50.0,
            elevated: 75.0,
        }
    }
}

impl RiskThresholds {
    /// Threshold table in ascending order; scores above the last are `High`.
    pub fn table(&self) -> [(f64, RiskLevel); 3] {
        [
            (self.low, RiskLevel::Low),
            (self.moderate, RiskLevel::Moderate),
            (self.elevated, RiskLevel::Elevated),
        ]
    }

    /// Classify a risk score.
    pub fn classify(&self, score: f64) -> RiskLevel {
        self.table()
            .into_iter()
            .find(|&(upper, _)| score <= upper)
            .map(|(_, level)| level)
            .unwrap_or(RiskLevel::High)
    }

    fn validate(&self) -> Result<()> {
        let table = self.table();
        if table.iter().any(|(upper, _)| !upper.is_finite()) {
            return Err(Error::InvalidConfig(
                "risk thresholds must be finite".to_string(),
            ));
        }
        if table.windows(2).any(|w| w[0].0 >= w[1].0) {
            return Err(Error::InvalidConfig(format!(
                "risk thresholds must be strictly ascending, got {} / {} / {}",
                self.low, self.moderate, self.elevated
            )));
        }
        Ok(())
    }
}

/// Complete scoring policy.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct ScoringPolicy {
    pub weights: ScoreWeights,
    pub thresholds: RiskThresholds,
}

impl ScoringPolicy {
    /// Check the policy is usable.
    pub fn validate(&self) -> Result<()> {
        self.weights.validate()?;
        self.thresholds.validate()
    }
}

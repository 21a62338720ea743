//! Analytics configuration.
//!
//! Policy constants (annualization, VaR confidence, score weights and
//! risk-level thresholds) with TOML overrides.

use crate::deviation::ScoringPolicy;
use crate::metrics::TRADING_DAYS_PER_YEAR;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable pointing at a config file.
pub const CONFIG_ENV_VAR: &str = "SYMPHONY_STATS_CONFIG";

/// Tunable analytics settings. Every field has a default.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Trading days per year used for annualization
    pub periods_per_year: f64,
    /// Confidence level for Value at Risk
    pub var_confidence: f64,
    /// Live-vs-backtest risk score policy
    pub scoring: ScoringPolicy,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            periods_per_year: TRADING_DAYS_PER_YEAR,
            var_confidence: 0.95,
            scoring: ScoringPolicy::default(),
        }
    }
}

impl AnalyticsConfig {
    /// Load and validate a TOML config file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate TOML config text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the default location, or fall back to defaults.
    ///
    /// Default path: `~/.config/symphony-stats/config.toml`
    /// Can be overridden with `SYMPHONY_STATS_CONFIG` environment variable.
    /// A missing file at the default path is not an error; a missing file
    /// named by the environment variable is.
    pub fn load_default() -> Result<Self> {
        if let Ok(path) = env::var(CONFIG_ENV_VAR) {
            return Self::load(Path::new(&path));
        }

        let path = Self::default_path();
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        Self::load(&path)
    }

    /// Get the default config file path.
    pub fn default_path() -> PathBuf {
        directories::BaseDirs::new()
            .map(|dirs| dirs.home_dir().join(".config/symphony-stats/config.toml"))
            .unwrap_or_else(|| PathBuf::from("symphony-stats.toml"))
    }

    /// Check every setting is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.periods_per_year.is_finite() || self.periods_per_year <= 0.0 {
            return Err(Error::InvalidConfig(format!(
                "periods_per_year must be positive, got {}",
                self.periods_per_year
            )));
        }
        if !(self.var_confidence > 0.0 && self.var_confidence < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "var_confidence must be between 0 and 1, got {}",
                self.var_confidence
            )));
        }
        self.scoring.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_defaults() {
        let config = AnalyticsConfig::default();
        assert_eq!(config.periods_per_year, 252.0);
        assert_eq!(config.var_confidence, 0.95);
        assert_eq!(config.scoring.weights.tracking_error, 0.4);
        assert_eq!(config.scoring.thresholds.elevated, 75.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalyticsConfig::from_toml(
            r#"
            var_confidence = 0.99

            [scoring.thresholds]
            low = 20.0
            moderate = 40.0
            elevated = 60.0
            "#,
        )
        .unwrap();

        assert_eq!(config.var_confidence, 0.99);
        assert_eq!(config.periods_per_year, 252.0);
        assert_eq!(config.scoring.thresholds.low, 20.0);
        assert_eq!(config.scoring.weights.decorrelation, 0.3);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let result = AnalyticsConfig::from_toml("var_confidence = 1.2");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = AnalyticsConfig::from_toml("periods_per_year = 0.0");
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = AnalyticsConfig::from_toml("periods_per_year = \"daily\"");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[scoring.weights]\ntracking_error = 0.5\n").unwrap();

        let config = AnalyticsConfig::load(&path).unwrap();
        assert_eq!(config.scoring.weights.tracking_error, 0.5);
        assert_eq!(config.scoring.weights.mean_deviation, 0.3);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let result = AnalyticsConfig::load(&dir.path().join("nope.toml"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

//! Core data types for the analytics engine.

use crate::series::normalize::validate_value;
use crate::{DataErrorKind, Error, Result};
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single day's valuation of a portfolio or symphony.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ValuationPoint {
    /// Trading day
    pub date: NaiveDate,
    /// Total value on that day (always positive once inside a series)
    pub value: f64,
}

impl ValuationPoint {
    /// Create a new valuation point.
    pub fn new(date: NaiveDate, value: f64) -> Self {
        Self { date, value }
    }
}

/// A valuation point as supplied upstream, before normalization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RawValuationPoint {
    /// ISO-8601 date (`YYYY-MM-DD`)
    pub date: String,
    /// Value, if the upstream source had one for this day
    #[serde(default)]
    pub value: Option<f64>,
}

impl RawValuationPoint {
    /// Create a raw point with a value.
    pub fn new(date: impl Into<String>, value: f64) -> Self {
        Self {
            date: date.into(),
            value: Some(value),
        }
    }
}

/// A named, validated valuation series.
///
/// Dates are strictly increasing and every value is finite and positive.
/// The only ways to build one check this, so downstream code never has to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(try_from = "UncheckedSeries")]
pub struct ValuationSeries {
    name: String,
    points: Vec<ValuationPoint>,
}

#[derive(Deserialize)]
struct UncheckedSeries {
    name: String,
    points: Vec<ValuationPoint>,
}

impl TryFrom<UncheckedSeries> for ValuationSeries {
    type Error = Error;

    fn try_from(raw: UncheckedSeries) -> Result<Self> {
        ValuationSeries::new(raw.name, raw.points)
    }
}

impl ValuationSeries {
    /// Build a series from date-ordered points.
    ///
    /// Use [`crate::series::normalize`] for unsorted or untrusted input.
    pub fn new(name: impl Into<String>, points: Vec<ValuationPoint>) -> Result<Self> {
        let name = name.into();
        if points.is_empty() {
            return Err(Error::data(name, DataErrorKind::Empty));
        }

        for (index, point) in points.iter().enumerate() {
            validate_value(&name, index, point.value)?;
            if index > 0 && point.date <= points[index - 1].date {
                return Err(Error::data(name, DataErrorKind::UnorderedDate { index }));
            }
        }

        Ok(Self { name, points })
    }

    /// Build a series of consecutive calendar days starting at `start`.
    pub fn from_values(name: impl Into<String>, start: NaiveDate, values: &[f64]) -> Result<Self> {
        let name = name.into();
        let mut points = Vec::with_capacity(values.len());
        for (i, &value) in values.iter().enumerate() {
            let date = start.checked_add_days(Days::new(i as u64)).ok_or_else(|| {
                Error::data(
                    name.clone(),
                    DataErrorKind::InvalidDate {
                        index: i,
                        raw: format!("{} + {} days", start, i),
                    },
                )
            })?;
            points.push(ValuationPoint::new(date, value));
        }
        Self::new(name, points)
    }

    /// Series name, used as error and log context.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get all points.
    pub fn points(&self) -> &[ValuationPoint] {
        &self.points
    }

    /// Values in date order.
    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.value).collect()
    }

    /// Dates in order.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; an empty series cannot be constructed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Value on `date`, if the series has a point there.
    pub fn value_on(&self, date: NaiveDate) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// First valuation point.
    pub fn first(&self) -> ValuationPoint {
        self.points[0]
    }

    /// Last valuation point.
    pub fn last(&self) -> ValuationPoint {
        self.points[self.points.len() - 1]
    }
}

/// A point on the drawdown curve.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DrawdownPoint {
    pub date: NaiveDate,
    /// value / running peak - 1, always in (-1, 0]
    pub drawdown: f64,
    /// Running peak up to and including this date
    pub peak: f64,
}

/// Extremes of a drawdown curve.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DrawdownSummary {
    /// Most negative drawdown (0 when the series never fell below its peak)
    pub max_drawdown: f64,
    /// Date of the deepest drawdown
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_drawdown_date: Option<NaiveDate>,
    /// Drawdown at the last point
    pub current_drawdown: f64,
    /// Longest run of consecutive points below the running peak
    pub longest_drawdown_days: usize,
}

/// Risk and performance statistics for one valuation series.
///
/// Computed once per series and never mutated; all ratios are 0 rather than
/// NaN or infinite when their denominator vanishes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RiskMetricsSnapshot {
    /// Compound annual growth rate
    pub annualized_return: f64,
    /// Annualized standard deviation of daily returns
    pub annualized_vol: f64,
    /// CAGR / annualized volatility
    pub sharpe: f64,
    /// CAGR / annualized downside deviation
    pub sortino: f64,
    /// CAGR / |max drawdown|
    pub calmar: f64,
    /// Most negative drawdown
    pub max_drawdown: f64,
    /// Drawdown at the last point
    pub current_drawdown: f64,
    /// Fraction of days with a positive return
    pub win_pct: f64,
    /// Mean positive daily return
    pub avg_win: f64,
    /// Mean negative daily return
    pub avg_loss: f64,
    /// Largest daily return
    pub largest_win: f64,
    /// Smallest daily return
    pub largest_loss: f64,
    /// last / first - 1
    pub total_return: f64,
    /// Mean daily return
    pub avg_daily_return: f64,
    /// Number of daily returns the snapshot was computed from
    pub observations: usize,
}

/// Lookback windows, measured in trading-day index steps.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum LookbackKey {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "7d")]
    SevenDays,
    #[serde(rename = "30d")]
    ThirtyDays,
    #[serde(rename = "90d")]
    NinetyDays,
    #[serde(rename = "1y")]
    OneYear,
    #[serde(rename = "total")]
    Total,
}

impl LookbackKey {
    /// All keys in display order.
    pub const ALL: [LookbackKey; 6] = [
        LookbackKey::Today,
        LookbackKey::SevenDays,
        LookbackKey::ThirtyDays,
        LookbackKey::NinetyDays,
        LookbackKey::OneYear,
        LookbackKey::Total,
    ];

    /// Index offset back from the last point for a series of `len` points.
    pub fn offset(self, len: usize) -> usize {
        match self {
            LookbackKey::Today => 1,
            LookbackKey::SevenDays => 7,
            LookbackKey::ThirtyDays => 30,
            LookbackKey::NinetyDays => 90,
            LookbackKey::OneYear => 365,
            LookbackKey::Total => len.saturating_sub(1).max(1),
        }
    }

    /// Short label used in serialized output.
    pub fn label(self) -> &'static str {
        match self {
            LookbackKey::Today => "today",
            LookbackKey::SevenDays => "7d",
            LookbackKey::ThirtyDays => "30d",
            LookbackKey::NinetyDays => "90d",
            LookbackKey::OneYear => "1y",
            LookbackKey::Total => "total",
        }
    }
}

impl fmt::Display for LookbackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Point-in-time returns over each lookback window.
///
/// Every field is always present; windows without enough history are 0.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct LookbackReturns {
    #[serde(default)]
    pub today: f64,
    #[serde(rename = "7d", default)]
    pub seven_days: f64,
    #[serde(rename = "30d", default)]
    pub thirty_days: f64,
    #[serde(rename = "90d", default)]
    pub ninety_days: f64,
    #[serde(rename = "1y", default)]
    pub one_year: f64,
    #[serde(default)]
    pub total: f64,
}

impl LookbackReturns {
    /// Get the return for a key.
    pub fn get(&self, key: LookbackKey) -> f64 {
        match key {
            LookbackKey::Today => self.today,
            LookbackKey::SevenDays => self.seven_days,
            LookbackKey::ThirtyDays => self.thirty_days,
            LookbackKey::NinetyDays => self.ninety_days,
            LookbackKey::OneYear => self.one_year,
            LookbackKey::Total => self.total,
        }
    }

    /// Set the return for a key.
    pub fn set(&mut self, key: LookbackKey, value: f64) {
        let slot = match key {
            LookbackKey::Today => &mut self.today,
            LookbackKey::SevenDays => &mut self.seven_days,
            LookbackKey::ThirtyDays => &mut self.thirty_days,
            LookbackKey::NinetyDays => &mut self.ninety_days,
            LookbackKey::OneYear => &mut self.one_year,
            LookbackKey::Total => &mut self.total,
        };
        *slot = value;
    }
}

/// Value at Risk and Expected Shortfall for one return series.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ValueAtRisk {
    /// Confidence level (e.g., 0.95 for 95%)
    pub confidence: f64,
    /// Historical VaR as a fraction of portfolio value (positive = loss)
    pub historical_var: f64,
    /// Parametric (normal) VaR as a fraction of portfolio value
    pub parametric_var: f64,
    /// Expected Shortfall (CVaR) as a fraction of portfolio value
    pub expected_shortfall: f64,
    /// Historical VaR in dollars
    pub historical_var_dollar: f64,
    /// Parametric VaR in dollars
    pub parametric_var_dollar: f64,
    /// Expected Shortfall in dollars
    pub expected_shortfall_dollar: f64,
    /// Portfolio value used for the dollar figures
    pub total_value: f64,
}

/// Live-vs-backtest risk classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RiskLevel {
    Low,
    Moderate,
    Elevated,
    High,
}

impl RiskLevel {
    /// All levels from lowest to highest.
    pub const ALL: [RiskLevel; 4] = [
        RiskLevel::Low,
        RiskLevel::Moderate,
        RiskLevel::Elevated,
        RiskLevel::High,
    ];

    /// Human-readable interpretation shown next to the level.
    pub fn description(self) -> &'static str {
        match self {
            RiskLevel::Low => "Live performance closely tracks backtest",
            RiskLevel::Moderate => "Some deviation from backtest, monitor closely",
            RiskLevel::Elevated => {
                "Significant deviation from backtest, consider reviewing strategy"
            }
            RiskLevel::High => {
                "Large deviation from backtest, may indicate high risk or changed market conditions"
            }
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RiskLevel::Low => "Low",
            RiskLevel::Moderate => "Moderate",
            RiskLevel::Elevated => "Elevated",
            RiskLevel::High => "High",
        };
        f.write_str(name)
    }
}

/// One row of the live-vs-backtest comparison chart.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ComparisonPoint {
    pub date: NaiveDate,
    pub live: f64,
    pub backtest: f64,
    /// (live - backtest) / backtest * 100
    pub deviation_pct: f64,
}

/// Live and backtest series for one symphony.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymphonyInput {
    /// Symphony identifier
    pub id: String,
    /// Human-readable symphony name
    pub name: String,
    /// Current market value of the symphony
    pub current_value: f64,
    /// Deposit-adjusted live valuation series
    pub live: ValuationSeries,
    /// Backtest valuation series over the same period
    pub backtest: ValuationSeries,
}

/// Scored live-vs-backtest deviation of one symphony.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymphonyDeviation {
    pub id: String,
    pub name: String,
    /// Composite score in [0, 100]
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub tracking_error_annualized_pct: f64,
    /// Pearson correlation of daily returns, in [-1, 1]
    pub correlation: f64,
    pub mean_deviation_pct: f64,
    pub max_deviation_pct: f64,
    pub live_return_pct: f64,
    pub backtest_return_pct: f64,
    pub return_difference_pct: f64,
    /// Number of aligned dates
    pub period_days: usize,
    pub current_value: f64,
}

/// Number of symphonies per risk level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct RiskLevelCounts {
    #[serde(rename = "Low")]
    pub low: usize,
    #[serde(rename = "Moderate")]
    pub moderate: usize,
    #[serde(rename = "Elevated")]
    pub elevated: usize,
    #[serde(rename = "High")]
    pub high: usize,
}

impl RiskLevelCounts {
    /// Count one more symphony at `level`.
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Low => self.low += 1,
            RiskLevel::Moderate => self.moderate += 1,
            RiskLevel::Elevated => self.elevated += 1,
            RiskLevel::High => self.high += 1,
        }
    }

    /// Get the count for a level.
    pub fn get(&self, level: RiskLevel) -> usize {
        match level {
            RiskLevel::Low => self.low,
            RiskLevel::Moderate => self.moderate,
            RiskLevel::Elevated => self.elevated,
            RiskLevel::High => self.high,
        }
    }

    /// Total number of symphonies counted.
    pub fn total(&self) -> usize {
        self.low + self.moderate + self.elevated + self.high
    }
}

/// Portfolio-level view over every scored symphony.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PortfolioRiskSummary {
    pub total_symphonies: usize,
    pub total_portfolio_value: f64,
    /// Risk score weighted by current value
    pub weighted_avg_risk_score: f64,
    pub risk_level_counts: RiskLevelCounts,
    /// Unweighted mean tracking error
    pub avg_tracking_error_pct: f64,
    /// Unweighted mean correlation
    pub avg_correlation: f64,
}

/// A symphony that could not be scored.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SymphonyFailure {
    pub id: String,
    pub name: String,
    pub error: String,
}

/// Result of scoring every symphony in a portfolio.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PortfolioDeviationReport {
    /// Scored symphonies, highest risk score first
    pub symphonies: Vec<SymphonyDeviation>,
    /// Symphonies skipped because their data failed validation
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failures: Vec<SymphonyFailure>,
    pub summary: PortfolioRiskSummary,
}

/// Response envelope for JSON output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    /// Create an error response.
    pub fn err(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    #[test]
    fn test_series_new_rejects_unordered_dates() {
        let points = vec![
            ValuationPoint::new(day(2), 100.0),
            ValuationPoint::new(day(1), 101.0),
        ];
        let result = ValuationSeries::new("live", points);
        assert!(matches!(
            result,
            Err(Error::Data {
                kind: DataErrorKind::UnorderedDate { index: 1 },
                ..
            })
        ));
    }

    #[test]
    fn test_series_new_rejects_non_positive_value() {
        let points = vec![
            ValuationPoint::new(day(1), 100.0),
            ValuationPoint::new(day(2), 0.0),
        ];
        let err = ValuationSeries::new("live", points).unwrap_err();
        assert!(err.to_string().contains("live"));
        assert!(err.to_string().contains("index 1"));
    }

    #[test]
    fn test_series_new_rejects_empty() {
        let result = ValuationSeries::new("empty", Vec::new());
        assert!(matches!(
            result,
            Err(Error::Data {
                kind: DataErrorKind::Empty,
                ..
            })
        ));
    }

    #[test]
    fn test_series_from_values() {
        let series = ValuationSeries::from_values("p", day(30), &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(series.len(), 3);
        assert_eq!(series.name(), "p");
        assert_eq!(series.last().date, NaiveDate::from_ymd_opt(2024, 4, 1).unwrap());
        assert_eq!(series.values(), vec![1.0, 2.0, 3.0]);
        assert_eq!(series.value_on(day(31)), Some(2.0));
        assert_eq!(series.value_on(day(29)), None);
    }

    #[test]
    fn test_series_deserialize_validates() {
        let ok = r#"{"name":"p","points":[{"date":"2024-01-02","value":100.0}]}"#;
        let series: ValuationSeries = serde_json::from_str(ok).unwrap();
        assert_eq!(series.first().value, 100.0);

        let bad = r#"{"name":"p","points":[{"date":"2024-01-02","value":-1.0}]}"#;
        assert!(serde_json::from_str::<ValuationSeries>(bad).is_err());
    }

    #[test]
    fn test_lookback_returns_serialize_keys() {
        let mut lookbacks = LookbackReturns::default();
        lookbacks.set(LookbackKey::SevenDays, 0.05);
        let json = serde_json::to_value(lookbacks).unwrap();
        assert_eq!(json["7d"], 0.05);
        assert_eq!(json["1y"], 0.0);
        assert_eq!(lookbacks.get(LookbackKey::SevenDays), 0.05);
    }

    #[test]
    fn test_risk_level_counts() {
        let mut counts = RiskLevelCounts::default();
        counts.record(RiskLevel::Low);
        counts.record(RiskLevel::High);
        counts.record(RiskLevel::High);

        assert_eq!(counts.get(RiskLevel::High), 2);
        assert_eq!(counts.total(), 3);
        let json = serde_json::to_value(counts).unwrap();
        assert_eq!(json["Low"], 1);
    }

    #[test]
    fn test_api_response() {
        let response: ApiResponse<String> = ApiResponse::ok("test".to_string());
        assert!(response.ok);
        assert_eq!(response.data, Some("test".to_string()));

        let err_response: ApiResponse<String> = ApiResponse::err("error");
        assert!(!err_response.ok);
        assert_eq!(err_response.error, Some("error".to_string()));
    }
}

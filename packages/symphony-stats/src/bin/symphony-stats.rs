//! Symphony Stats CLI - Command line interface for portfolio analytics.
//!
//! Reads valuation series from JSON files and prints JSON results wrapped in
//! an `ApiResponse` envelope. Logs go to stderr so stdout stays parseable.

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use symphony_stats::deviation::validate_current_value;
use symphony_stats::{
    normalize, score_portfolio, value_weighted_returns, AnalyticsConfig, ApiResponse,
    DataErrorKind, DeviationScorer, Error, PerformanceReport, PortfolioDeviationReport,
    RawValuationPoint, Result, SymphonyFailure, SymphonyInput, ValuationSeries,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "symphony-stats")]
#[command(about = "Portfolio performance, risk and live-vs-backtest analytics")]
#[command(version)]
struct Cli {
    /// TOML config file (defaults to $SYMPHONY_STATS_CONFIG, then
    /// ~/.config/symphony-stats/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Performance and risk report for a portfolio series
    Performance {
        /// Portfolio series JSON file
        #[arg(short, long, required_unless_present = "symphonies")]
        portfolio: Option<PathBuf>,
        /// Symphonies JSON file; the portfolio is their value-weighted returns
        #[arg(short, long, conflicts_with = "portfolio")]
        symphonies: Option<PathBuf>,
        /// Benchmark series JSON file
        #[arg(short, long)]
        benchmark: Option<PathBuf>,
        /// Current portfolio value for dollar VaR (defaults to the last value)
        #[arg(short, long)]
        value: Option<f64>,
    },
    /// Live-vs-backtest deviation for every symphony
    Deviation {
        /// Symphonies JSON file
        #[arg(short, long)]
        symphonies: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

/// A series file: either `{"name": ..., "points": [...]}` or a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeriesFile {
    Named {
        name: Option<String>,
        points: Vec<RawValuationPoint>,
    },
    Bare(Vec<RawValuationPoint>),
}

/// One entry of a symphonies file.
#[derive(Deserialize)]
struct SymphonyRecord {
    id: String,
    #[serde(default)]
    name: String,
    current_value: Option<f64>,
    /// Deposit-adjusted live series
    live: Vec<RawValuationPoint>,
    #[serde(default)]
    backtest: Vec<RawValuationPoint>,
    /// Raw account values used as portfolio weights (defaults to `live`)
    values: Option<Vec<RawValuationPoint>>,
}

impl SymphonyRecord {
    fn display_name(&self) -> String {
        if self.name.is_empty() {
            self.id.clone()
        } else {
            self.name.clone()
        }
    }

    fn to_input(&self) -> Result<SymphonyInput> {
        let name = self.display_name();
        let current_value = self
            .current_value
            .ok_or_else(|| Error::data(name.as_str(), DataErrorKind::MissingCurrentValue))?;
        validate_current_value(&name, current_value)?;

        Ok(SymphonyInput {
            id: self.id.clone(),
            current_value,
            live: normalize(&format!("{} live", name), &self.live)?,
            backtest: normalize(&format!("{} backtest", name), &self.backtest)?,
            name,
        })
    }

    /// `(deposit_adjusted, value)` series for value-weighted returns.
    fn to_holding(&self) -> Result<(ValuationSeries, ValuationSeries)> {
        let name = self.display_name();
        let deposit_adjusted = normalize(&format!("{} live", name), &self.live)?;
        let value = match &self.values {
            Some(points) => normalize(&format!("{} values", name), points)?,
            None => deposit_adjusted.clone(),
        };
        Ok((deposit_adjusted, value))
    }
}

fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let output = match load_config(cli.config.as_deref()) {
        Ok(config) => match cli.command {
            Commands::Performance {
                portfolio,
                symphonies,
                benchmark,
                value,
            } => render(handle_performance(
                &config,
                portfolio.as_deref(),
                symphonies.as_deref(),
                benchmark.as_deref(),
                value,
            )),
            Commands::Deviation { symphonies } => render(handle_deviation(&config, &symphonies)),
            Commands::Config => render(Ok(config)),
        },
        Err(e) => render::<()>(Err(e)),
    };

    println!("{}", output);
}

fn render<T: Serialize>(result: Result<T>) -> String {
    let response = match result {
        Ok(data) => ApiResponse::ok(data),
        Err(e) => {
            tracing::error!(error = %e, "command failed");
            ApiResponse::err(e.to_string())
        }
    };
    serde_json::to_string_pretty(&response)
        .unwrap_or_else(|e| format!("{{\"ok\":false,\"error\":\"{}\"}}", e))
}

fn load_config(path: Option<&Path>) -> Result<AnalyticsConfig> {
    match path {
        Some(path) => AnalyticsConfig::load(path),
        None => AnalyticsConfig::load_default(),
    }
}

fn read_series(path: &Path) -> Result<ValuationSeries> {
    let content = fs::read_to_string(path)?;
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "series".to_string());

    let (name, points) = match serde_json::from_str::<SeriesFile>(&content)? {
        SeriesFile::Named { name, points } => (name.unwrap_or(stem), points),
        SeriesFile::Bare(points) => (stem, points),
    };
    normalize(&name, &points)
}

fn read_symphonies(path: &Path) -> Result<Vec<SymphonyRecord>> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Portfolio index from symphony histories, plus the symphonies' total value.
fn read_combined_portfolio(path: &Path) -> Result<(ValuationSeries, f64)> {
    let holdings = read_symphonies(path)?
        .iter()
        .map(SymphonyRecord::to_holding)
        .collect::<Result<Vec<_>>>()?;

    let weighted = value_weighted_returns("portfolio", &holdings)?;
    let first = weighted.dates[0];
    let base: f64 = holdings
        .iter()
        .filter_map(|(_, value)| value.value_on(first))
        .sum();
    let total: f64 = holdings.iter().map(|(_, value)| value.last().value).sum();

    let series = weighted.to_index("portfolio", if base > 0.0 { base } else { 1.0 })?;
    Ok((series, total))
}

fn handle_performance(
    config: &AnalyticsConfig,
    portfolio: Option<&Path>,
    symphonies: Option<&Path>,
    benchmark: Option<&Path>,
    value: Option<f64>,
) -> Result<PerformanceReport> {
    let (portfolio, value) = match (portfolio, symphonies) {
        (Some(path), _) => (read_series(path)?, value),
        (None, Some(path)) => {
            let (series, total) = read_combined_portfolio(path)?;
            (series, value.or(Some(total)))
        }
        (None, None) => {
            return Err(Error::InvalidConfig(
                "either --portfolio or --symphonies is required".to_string(),
            ))
        }
    };
    let benchmark = benchmark.map(read_series).transpose()?;
    tracing::info!(
        portfolio = portfolio.name(),
        points = portfolio.len(),
        "computing performance report"
    );
    PerformanceReport::compute(&portfolio, benchmark.as_ref(), value, config)
}

fn handle_deviation(config: &AnalyticsConfig, path: &Path) -> Result<PortfolioDeviationReport> {
    let mut inputs = Vec::new();
    let mut rejected = Vec::new();
    for record in read_symphonies(path)? {
        match record.to_input() {
            Ok(input) => inputs.push(input),
            Err(e) => {
                tracing::warn!(symphony = %record.id, error = %e, "rejecting symphony data");
                rejected.push(SymphonyFailure {
                    id: record.id.clone(),
                    name: record.display_name(),
                    error: e.to_string(),
                });
            }
        }
    }

    let mut report = score_portfolio(&DeviationScorer::from_config(config), &inputs);
    report.failures.extend(rejected);
    Ok(report)
}

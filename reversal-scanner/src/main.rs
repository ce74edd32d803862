//! Risk Reversal Scanner CLI
//!
//! Screens listed option chains for credit risk reversals and prints the
//! top recommendation with a ranked table.
//!
//! # Usage
//!
//! ```bash
//! # Live data (Yahoo price, Finnhub chains)
//! export FINNHUB_API_KEY=your-token
//! reversal-scanner analyze --ticker SPY --strategy bullish
//!
//! # Narrower window, JSON output with the payoff curve of the top trade
//! reversal-scanner analyze --ticker QQQ --min-dte 30 --max-dte 60 --strategy bearish --json --payoff
//!
//! # Offline, from a recorded snapshot
//! reversal-scanner analyze --ticker SPY --strategy bullish --snapshot data/spy.json
//! ```

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;

use reversal_scanner::analytics::{payoff_curve, PayoffPoint, DEFAULT_CURVE_POINTS};
use reversal_scanner::data::{LiveMarketData, MarketDataProvider, SnapshotProvider};
use reversal_scanner::scanner::{DEFAULT_MAX_DTE, DEFAULT_MIN_DTE};
use reversal_scanner::{AnalysisRequest, AnalysisResult, RiskReversalScanner, ScannerConfig};

const SEPARATOR: &str = "============================================================";

const TABLE_HEADER: [&str; 7] = [
    "Rank",
    "Expiration",
    "Strikes",
    "Net Cost",
    "Net Vega",
    "Efficiency",
    "Score",
];

#[derive(Parser)]
#[command(name = "reversal-scanner")]
#[command(about = "Find and rank options risk reversal trades")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze risk reversals for one ticker
    Analyze {
        /// Underlying ticker symbol
        #[arg(short, long)]
        ticker: String,

        /// Minimum days to expiration
        #[arg(long, default_value_t = DEFAULT_MIN_DTE)]
        min_dte: i64,

        /// Maximum days to expiration
        #[arg(long, default_value_t = DEFAULT_MAX_DTE)]
        max_dte: i64,

        /// Strategy direction: bullish or bearish
        #[arg(short, long, default_value = "bullish")]
        strategy: String,

        /// Read market data from a JSON snapshot instead of the network
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Path to configuration file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Include the expiration payoff curve of the top trade
        #[arg(long)]
        payoff: bool,
    },
}

/// Output options for one analyze run.
struct OutputOptions {
    json: bool,
    payoff: bool,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    #[serde(flatten)]
    report: &'a AnalysisResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    payoff: Option<Vec<PayoffPoint>>,
}

fn spinner(message: String) -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}

fn print_table(rows: &[[String; 7]]) {
    let mut widths = TABLE_HEADER.map(str::len);
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: Vec<&str>| {
        cells
            .iter()
            .zip(widths.iter())
            .map(|(cell, width)| format!("{:<width$}", cell, width = *width))
            .collect::<Vec<_>>()
            .join("  ")
    };

    println!("{}", line(TABLE_HEADER.to_vec()));
    for row in rows {
        println!("{}", line(row.iter().map(String::as_str).collect()));
    }
}

fn print_report(report: &AnalysisResult, payoff: Option<&[PayoffPoint]>) {
    println!("{}", SEPARATOR);
    println!("{}", report.summary);

    if report.is_empty() {
        println!("{}", SEPARATOR);
        return;
    }

    println!("\n{}", report.risk);
    println!("\n{}", report.pricing_comparison);
    println!("\n{}", SEPARATOR);
    print_table(&report.top_5);

    if let Some(points) = payoff {
        println!("\n{}", SEPARATOR);
        println!("Payoff at expiration (per share)");
        for point in points {
            println!("  {:>10}  {:>10}", point.price, point.profit);
        }
    }
    println!("{}", SEPARATOR);
}

async fn cmd_analyze<P: MarketDataProvider>(
    provider: P,
    config: &ScannerConfig,
    request: AnalysisRequest,
    output: OutputOptions,
) -> Result<()> {
    let scanner = RiskReversalScanner::new(provider, config);

    let pb = spinner(format!(
        "Analyzing {} {} risk reversals ({}-{} DTE)",
        request.ticker, request.direction, request.min_dte, request.max_dte
    ))?;
    let outcome = scanner.analyze(&request).await;
    pb.finish_and_clear();

    let (report, ranked) = match outcome {
        Ok(outcome) => (outcome.report, outcome.ranked),
        Err(e) => {
            tracing::warn!(ticker = %request.ticker, error = %e, "analysis failed");
            (AnalysisResult::error(e), Vec::new())
        }
    };

    let payoff = if output.payoff {
        ranked.first().map(|top| payoff_curve(top, DEFAULT_CURVE_POINTS))
    } else {
        None
    };

    if output.json {
        let body = JsonOutput {
            report: &report,
            payoff,
        };
        println!("{}", serde_json::to_string_pretty(&body)?);
    } else {
        print_report(&report, payoff.as_deref());
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("reversal_scanner=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze {
            ticker,
            min_dte,
            max_dte,
            strategy,
            snapshot,
            config,
            json,
            payoff,
        } => {
            let config = match config {
                Some(path) => ScannerConfig::from_file(&path)
                    .with_context(|| format!("Failed to load config {}", path.display()))?,
                None => ScannerConfig::default(),
            };
            let request = AnalysisRequest::parse(&ticker, min_dte, max_dte, &strategy)?;
            let output = OutputOptions { json, payoff };

            match snapshot {
                Some(path) => {
                    let provider = SnapshotProvider::from_file(&path)
                        .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
                    cmd_analyze(provider, &config, request, output).await?;
                }
                None => {
                    let token = std::env::var("FINNHUB_API_KEY")
                        .context("FINNHUB_API_KEY environment variable not set")?;
                    let provider = LiveMarketData::from_config(&config, token)?;
                    cmd_analyze(provider, &config, request, output).await?;
                }
            }
        }
    }

    Ok(())
}

//! Request-level risk reversal analysis.
//!
//! For one ticker, direction and DTE window:
//! 1. Fetch the underlying price and the listed expirations
//! 2. Keep expirations inside the window, at most `MAX_EXPIRATIONS`, in listing order
//! 3. Fetch every selected chain (concurrently, all-or-nothing)
//! 4. Generate and admit candidates per expiration on the blocking pool, merge in listing order
//! 5. Rank and format
//!
//! A failed price or chain lookup turns the whole request into an
//! "Analysis Error" report; partial rankings are never returned.

use chrono::{DateTime, NaiveDate, Utc};
use futures::future::try_join_all;
use rayon::prelude::*;
use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::analytics::{
    days_to_expiration, filter_admissible, rank_combinations, CombinationGenerator,
    StrategyCombination, StrategyDirection,
};
use crate::config::ScannerConfig;
use crate::data::{MarketDataProvider, OptionsChain, ProviderError};
use crate::report::{format_report, AnalysisResult};

/// Maximum number of expirations scanned per request.
pub const MAX_EXPIRATIONS: usize = 5;

/// Default lower DTE bound.
pub const DEFAULT_MIN_DTE: i64 = 30;

/// Default upper DTE bound.
pub const DEFAULT_MAX_DTE: i64 = 180;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("Candidate screening failed: {0}")]
    Screening(#[from] tokio::task::JoinError),
}

/// A validated analysis request.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisRequest {
    /// Upper-cased ticker symbol.
    pub ticker: String,
    /// Minimum days to expiration (inclusive).
    pub min_dte: i64,
    /// Maximum days to expiration (inclusive).
    pub max_dte: i64,
    /// Bullish or bearish.
    pub direction: StrategyDirection,
    /// Evaluation instant for DTE and time-to-expiry.
    pub as_of: DateTime<Utc>,
}

impl AnalysisRequest {
    /// Validate inputs. The evaluation instant defaults to now.
    pub fn new(
        ticker: &str,
        min_dte: i64,
        max_dte: i64,
        direction: StrategyDirection,
    ) -> Result<Self, AnalysisError> {
        let ticker = ticker.trim().to_uppercase();
        if ticker.is_empty() {
            return Err(AnalysisError::InvalidInput("ticker is required".to_string()));
        }
        if !ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
        {
            return Err(AnalysisError::InvalidInput(format!(
                "invalid ticker: {}",
                ticker
            )));
        }
        if min_dte < 0 {
            return Err(AnalysisError::InvalidInput(format!(
                "min_dte must be non-negative, got {}",
                min_dte
            )));
        }
        if max_dte < min_dte {
            return Err(AnalysisError::InvalidInput(format!(
                "max_dte ({}) must not be below min_dte ({})",
                max_dte, min_dte
            )));
        }

        Ok(Self {
            ticker,
            min_dte,
            max_dte,
            direction,
            as_of: Utc::now(),
        })
    }

    /// Validate inputs with the strategy given as text ("bullish" / "bearish").
    pub fn parse(
        ticker: &str,
        min_dte: i64,
        max_dte: i64,
        strategy: &str,
    ) -> Result<Self, AnalysisError> {
        let direction = StrategyDirection::from_str(strategy).ok_or_else(|| {
            AnalysisError::InvalidInput(format!("unknown strategy: {}", strategy))
        })?;
        Self::new(ticker, min_dte, max_dte, direction)
    }

    /// Evaluate as of a fixed instant.
    pub fn with_as_of(mut self, as_of: DateTime<Utc>) -> Self {
        self.as_of = as_of;
        self
    }
}

/// Expirations whose DTE falls inside the request window, in listing order,
/// capped at `MAX_EXPIRATIONS`.
pub fn select_expirations(expirations: &[NaiveDate], request: &AnalysisRequest) -> Vec<NaiveDate> {
    expirations
        .iter()
        .copied()
        .filter(|&expiration| {
            let dte = days_to_expiration(expiration, request.as_of);
            dte >= request.min_dte && dte <= request.max_dte
        })
        .take(MAX_EXPIRATIONS)
        .collect()
}

/// Ranked candidates together with the report rendered from them.
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    /// Every admitted candidate, best first.
    pub ranked: Vec<StrategyCombination>,
    pub report: AnalysisResult,
}

/// Drives a full analysis against a market-data provider.
pub struct RiskReversalScanner<P> {
    provider: P,
    generator: CombinationGenerator,
}

impl<P: MarketDataProvider> RiskReversalScanner<P> {
    pub fn new(provider: P, config: &ScannerConfig) -> Self {
        Self {
            provider,
            generator: CombinationGenerator::new(config.black_scholes()),
        }
    }

    /// Run the analysis, rendering collaborator failures as an error report.
    pub async fn run_analysis(&self, request: &AnalysisRequest) -> AnalysisResult {
        match self.analyze(request).await {
            Ok(outcome) => outcome.report,
            Err(e) => {
                warn!(ticker = %request.ticker, provider = self.provider.name(), error = %e, "analysis failed");
                AnalysisResult::error(e)
            }
        }
    }

    /// Run the analysis, propagating collaborator failures.
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<ScanOutcome, AnalysisError> {
        let ticker = request.ticker.as_str();
        info!(
            ticker,
            strategy = %request.direction,
            min_dte = request.min_dte,
            max_dte = request.max_dte,
            "starting analysis"
        );

        let underlying_price = self.provider.underlying_price(ticker).await?;
        let expirations = self.provider.expirations(ticker).await?;

        let selected = select_expirations(&expirations, request);
        if selected.is_empty() {
            info!(ticker, listed = expirations.len(), "no expirations in window");
            return Ok(ScanOutcome {
                ranked: Vec::new(),
                report: AnalysisResult::no_expirations(ticker, request.min_dte, request.max_dte),
            });
        }
        debug!(ticker, ?selected, "selected expirations");

        let chains: Vec<OptionsChain> = try_join_all(
            selected
                .iter()
                .map(|&expiration| self.provider.option_chain(ticker, expiration, underlying_price)),
        )
        .await?;

        let generator = self.generator.clone();
        let direction = request.direction;
        let as_of = request.as_of;
        let candidates = tokio::task::spawn_blocking(move || {
            screen_chains(&generator, &chains, direction, underlying_price, as_of)
        })
        .await?;
        info!(ticker, %underlying_price, candidates = candidates.len(), "ranking candidates");

        let ranked = rank_combinations(candidates);
        let report = format_report(&ranked, ticker, request.direction);
        Ok(ScanOutcome { ranked, report })
    }

}

/// Generate and admit candidates for every chain, merged in chain order.
///
/// CPU-bound; callers on an async runtime run it on the blocking pool.
pub fn screen_chains(
    generator: &CombinationGenerator,
    chains: &[OptionsChain],
    direction: StrategyDirection,
    underlying_price: Decimal,
    as_of: DateTime<Utc>,
) -> Vec<StrategyCombination> {
    let per_expiration: Vec<Vec<StrategyCombination>> = chains
        .par_iter()
        .map(|chain| {
            let generated = generator.generate(direction, chain, underlying_price, as_of);
            let admitted = filter_admissible(generated);
            debug!(expiration = %chain.expiration, admitted = admitted.len(), "screened chain");
            admitted
        })
        .collect();

    per_expiration.into_iter().flatten().collect()
}

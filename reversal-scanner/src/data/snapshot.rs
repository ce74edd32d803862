//! Offline market data from a recorded snapshot.
//!
//! A snapshot is a JSON document holding one underlying's price and its
//! chains, in listing order:
//!
//! ```json
//! {
//!   "ticker": "SPY",
//!   "underlying_price": 100.0,
//!   "chains": [
//!     {"expiration": "2024-02-16",
//!      "calls": [{"strike": 110, "option_type": "call", "expiration": "2024-02-16", "bid": 1.8, "ask": 2.0, "implied_volatility": 0.2}],
//!      "puts": []}
//!   ]
//! }
//! ```

use std::path::Path;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::provider::{MarketDataProvider, ProviderError};
use super::types::OptionsChain;

/// Recorded market state for one underlying.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketSnapshot {
    pub ticker: String,
    pub underlying_price: Decimal,
    #[serde(default)]
    pub chains: Vec<OptionsChain>,
}

/// Provider serving a single `MarketSnapshot`.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    snapshot: MarketSnapshot,
}

impl SnapshotProvider {
    pub fn new(snapshot: MarketSnapshot) -> Self {
        Self { snapshot }
    }

    /// Load a snapshot from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path)?;
        let snapshot: MarketSnapshot = serde_json::from_str(&content)?;
        Ok(Self::new(snapshot))
    }

    fn covers(&self, ticker: &str) -> bool {
        self.snapshot.ticker.eq_ignore_ascii_case(ticker)
    }
}

#[async_trait]
impl MarketDataProvider for SnapshotProvider {
    async fn underlying_price(&self, ticker: &str) -> Result<Decimal, ProviderError> {
        if !self.covers(ticker) || self.snapshot.underlying_price <= Decimal::ZERO {
            return Err(ProviderError::NoPrice {
                ticker: ticker.to_string(),
            });
        }
        Ok(self.snapshot.underlying_price)
    }

    async fn expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, ProviderError> {
        if !self.covers(ticker) {
            return Ok(Vec::new());
        }
        Ok(self.snapshot.chains.iter().map(|c| c.expiration).collect())
    }

    async fn option_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
        _underlying_price: Decimal,
    ) -> Result<OptionsChain, ProviderError> {
        if !self.covers(ticker) {
            return Ok(OptionsChain::new(expiration));
        }
        Ok(self
            .snapshot
            .chains
            .iter()
            .find(|c| c.expiration == expiration)
            .cloned()
            .unwrap_or_else(|| OptionsChain::new(expiration)))
    }

    fn name(&self) -> &str {
        "snapshot"
    }
}

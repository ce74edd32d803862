//! Live market data: Yahoo for the underlying price, Finnhub for chains.

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::debug;

use super::finnhub::FinnhubClient;
use super::provider::{MarketDataProvider, ProviderError};
use super::types::OptionsChain;
use super::yahoo::YahooClient;
use crate::config::ScannerConfig;

/// Provider backed by the public Yahoo and Finnhub HTTP APIs.
pub struct LiveMarketData {
    yahoo: YahooClient,
    finnhub: FinnhubClient,
}

impl LiveMarketData {
    /// Build both clients from configuration and a Finnhub API token.
    pub fn from_config(config: &ScannerConfig, finnhub_token: String) -> Result<Self, ProviderError> {
        let timeout = config.request_timeout();
        Ok(Self {
            yahoo: YahooClient::new(&config.yahoo_base_url, timeout)?,
            finnhub: FinnhubClient::new(&config.finnhub_base_url, finnhub_token, timeout)?,
        })
    }
}

#[async_trait]
impl MarketDataProvider for LiveMarketData {
    async fn underlying_price(&self, ticker: &str) -> Result<Decimal, ProviderError> {
        let price = self.yahoo.get_price(ticker).await?;
        debug!(ticker, %price, "fetched underlying price");
        Ok(price)
    }

    async fn expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, ProviderError> {
        self.finnhub.get_expirations(ticker).await
    }

    async fn option_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
        _underlying_price: Decimal,
    ) -> Result<OptionsChain, ProviderError> {
        let chain = self.finnhub.get_option_chain(ticker, expiration).await?;
        debug!(ticker, %expiration, calls = chain.calls.len(), puts = chain.puts.len(), "fetched chain");
        Ok(chain)
    }

    fn name(&self) -> &str {
        "yahoo+finnhub"
    }
}

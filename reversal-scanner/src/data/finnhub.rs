//! Finnhub option-chain client.
//!
//! A single endpoint serves both the expiration list and the chains:
//! `GET /stock/option-chain?symbol=..&token=..` returns
//! `{"data": [{"expirationDate": "YYYY-MM-DD", "options": {"CALL": [..], "PUT": [..]}}]}`.
//! A response without `data` is treated as "nothing listed", not as an error.

use std::time::Duration;

use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use tracing::warn;

use super::provider::{get_json, ProviderError};
use super::types::{OptionQuote, OptionType, OptionsChain};

/// Finnhub REST base URL.
pub const DEFAULT_BASE_URL: &str = "https://finnhub.io/api/v1";

#[derive(Debug, Clone, Deserialize)]
struct OptionChainResponse {
    #[serde(default)]
    data: Option<Vec<ExpirationEntry>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExpirationEntry {
    #[serde(default)]
    expiration_date: Option<String>,
    #[serde(default)]
    options: Option<ContractsBySide>,
}

impl ExpirationEntry {
    /// Parsed expiration date. Entries with a missing or malformed date yield `None`.
    fn expiration(&self) -> Option<NaiveDate> {
        parse_expiration(self.expiration_date.as_deref()?)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
struct ContractsBySide {
    #[serde(rename = "CALL", default)]
    calls: Vec<RawContract>,
    #[serde(rename = "PUT", default)]
    puts: Vec<RawContract>,
}

/// One contract as Finnhub reports it. Any field may be missing or null.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawContract {
    #[serde(default)]
    pub strike: Option<f64>,
    #[serde(default)]
    pub bid: Option<f64>,
    #[serde(default)]
    pub ask: Option<f64>,
    #[serde(default)]
    pub implied_volatility: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub open_interest: Option<f64>,
}

impl RawContract {
    /// Convert to an `OptionQuote`, zero-filling missing fields.
    ///
    /// Contracts without a usable strike are dropped.
    pub fn to_quote(&self, option_type: OptionType, expiration: NaiveDate) -> Option<OptionQuote> {
        let strike = self.strike.filter(|s| *s > 0.0)?;
        let price = |v: Option<f64>| Decimal::try_from(v.unwrap_or(0.0)).unwrap_or(Decimal::ZERO);

        let mut quote = OptionQuote::new(
            option_type,
            Decimal::try_from(strike).ok()?,
            expiration,
            price(self.bid),
            price(self.ask),
            self.implied_volatility.unwrap_or(0.0),
        );
        quote.volume = self.volume.unwrap_or(0.0) as i64;
        quote.open_interest = self.open_interest.unwrap_or(0.0) as i64;
        Some(quote)
    }
}

fn parse_expiration(raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(expiration = raw, error = %e, "skipping unparsable expiration");
            None
        }
    }
}

/// Finnhub API client.
pub struct FinnhubClient {
    client: Client,
    base_url: String,
    token: String,
}

impl FinnhubClient {
    /// Create a new Finnhub client.
    pub fn new(base_url: &str, token: String, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token,
        })
    }

    async fn fetch_chains(&self, ticker: &str) -> Result<Vec<ExpirationEntry>, ProviderError> {
        let url = format!("{}/stock/option-chain", self.base_url);
        let params = [("symbol", ticker), ("token", self.token.as_str())];
        let response: OptionChainResponse = get_json(&self.client, &url, &params).await?;

        Ok(response.data.unwrap_or_else(|| {
            warn!(ticker, "option-chain response missing data");
            Vec::new()
        }))
    }

    /// Listed expirations in the order Finnhub returns them.
    pub async fn get_expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, ProviderError> {
        let entries = self.fetch_chains(ticker).await?;
        Ok(listed_expirations(&entries))
    }

    /// Calls and puts for one expiration.
    pub async fn get_option_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
    ) -> Result<OptionsChain, ProviderError> {
        let entries = self.fetch_chains(ticker).await?;
        Ok(chain_for_expiration(&entries, expiration))
    }
}

fn listed_expirations(entries: &[ExpirationEntry]) -> Vec<NaiveDate> {
    entries.iter().filter_map(ExpirationEntry::expiration).collect()
}

fn chain_for_expiration(entries: &[ExpirationEntry], expiration: NaiveDate) -> OptionsChain {
    let mut chain = OptionsChain::new(expiration);

    let contracts = entries
        .iter()
        .find(|e| e.expiration() == Some(expiration))
        .and_then(|e| e.options.as_ref());

    let Some(contracts) = contracts else {
        warn!(%expiration, "no options found for expiration");
        return chain;
    };

    for raw in &contracts.calls {
        if let Some(quote) = raw.to_quote(OptionType::Call, expiration) {
            chain.add_quote(quote);
        }
    }
    for raw in &contracts.puts {
        if let Some(quote) = raw.to_quote(OptionType::Put, expiration) {
            chain.add_quote(quote);
        }
    }

    chain
}

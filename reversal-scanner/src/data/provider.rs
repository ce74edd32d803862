//! Market-data collaborator contract.
//!
//! The engine never talks to a vendor directly. Every source (live HTTP
//! adapters, recorded snapshots, test doubles) implements
//! `MarketDataProvider`.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::types::OptionsChain;

/// Market-data retrieval errors.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),

    #[error("No price available for {ticker}")]
    NoPrice { ticker: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

/// Source of underlying prices, expiration lists and option chains.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Current price of the underlying.
    async fn underlying_price(&self, ticker: &str) -> Result<Decimal, ProviderError>;

    /// Listed expirations, in provider order. May be empty.
    async fn expirations(&self, ticker: &str) -> Result<Vec<NaiveDate>, ProviderError>;

    /// Calls and puts for one expiration. Empty sides when nothing is quoted.
    async fn option_chain(
        &self,
        ticker: &str,
        expiration: NaiveDate,
        underlying_price: Decimal,
    ) -> Result<OptionsChain, ProviderError>;

    /// Name used in logs.
    fn name(&self) -> &str;
}

/// GET `url` and decode a JSON body, mapping non-2xx statuses to `ApiError`.
pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &Client,
    url: &str,
    params: &[(&str, &str)],
) -> Result<T, ProviderError> {
    let response = client.get(url).query(params).send().await?;

    if !response.status().is_success() {
        let status = response.status();
        let text = response.text().await.unwrap_or_default();
        return Err(ProviderError::ApiError(format!("{}: {}", status, text)));
    }

    response
        .json()
        .await
        .map_err(|e| ProviderError::InvalidResponse(format!("Failed to parse response: {}", e)))
}

//! Yahoo Finance underlying price lookup.
//!
//! Uses the unofficial chart endpoint:
//! `GET /v8/finance/chart/{ticker}` -> `chart.result[0].meta.regularMarketPrice`.

use std::time::Duration;

use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;

use super::provider::{get_json, ProviderError};

/// Yahoo Finance base URL.
pub const DEFAULT_BASE_URL: &str = "https://query2.finance.yahoo.com";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    #[serde(rename = "regularMarketPrice", default)]
    regular_market_price: Option<f64>,
}

impl ChartResponse {
    fn price(&self) -> Option<f64> {
        self.chart
            .result
            .as_ref()?
            .first()?
            .meta
            .regular_market_price
            .filter(|p| p.is_finite() && *p > 0.0)
    }
}

/// Yahoo Finance API client.
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        Ok(Self {
            client: Client::builder()
                .user_agent(USER_AGENT)
                .timeout(timeout)
                .build()?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the regular-market price for a symbol.
    pub async fn get_price(&self, ticker: &str) -> Result<Decimal, ProviderError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, ticker);
        let response: ChartResponse = get_json(&self.client, &url, &[]).await?;

        let price = response.price().ok_or_else(|| ProviderError::NoPrice {
            ticker: ticker.to_string(),
        })?;

        Decimal::try_from(price)
            .map_err(|e| ProviderError::InvalidResponse(format!("price {}: {}", price, e)))
    }
}

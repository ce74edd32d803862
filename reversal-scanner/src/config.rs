//! Scanner configuration.
//!
//! Only market assumptions and provider plumbing are configurable. The
//! screening policy (expiration count, moneyness cap, admission thresholds,
//! ranking weights) lives in named constants next to the code that uses it.
//!
//! ```toml
//! risk_free_rate = 0.045
//! dividend_yield = 0.0
//! request_timeout_secs = 15
//! finnhub_base_url = "https://finnhub.io/api/v1"
//! yahoo_base_url = "https://query2.finance.yahoo.com"
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::data::{finnhub, yahoo};
use crate::pricing::{BlackScholes, DEFAULT_DIVIDEND_YIELD, DEFAULT_RISK_FREE_RATE};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value: {0}")]
    InvalidValue(String),
}

/// Configuration shared by every analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Annualized risk-free rate for Greeks.
    pub risk_free_rate: f64,
    /// Continuous dividend yield for Greeks.
    pub dividend_yield: f64,
    /// Per-request HTTP timeout.
    pub request_timeout_secs: u64,
    /// Finnhub REST base URL.
    pub finnhub_base_url: String,
    /// Yahoo Finance base URL.
    pub yahoo_base_url: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            risk_free_rate: DEFAULT_RISK_FREE_RATE,
            dividend_yield: DEFAULT_DIVIDEND_YIELD,
            request_timeout_secs: 15,
            finnhub_base_url: finnhub::DEFAULT_BASE_URL.to_string(),
            yahoo_base_url: yahoo::DEFAULT_BASE_URL.to_string(),
        }
    }
}

impl ScannerConfig {
    /// Load from a TOML file. Missing keys take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.risk_free_rate.is_finite() || !self.dividend_yield.is_finite() {
            return Err(ConfigError::InvalidValue(
                "rates must be finite numbers".to_string(),
            ));
        }
        if self.request_timeout_secs == 0 {
            return Err(ConfigError::InvalidValue(
                "request_timeout_secs must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn black_scholes(&self) -> BlackScholes {
        BlackScholes::new(self.risk_free_rate, self.dividend_yield)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScannerConfig::default();
        assert_eq!(config.risk_free_rate, 0.045);
        assert_eq!(config.dividend_yield, 0.0);
        assert_eq!(config.black_scholes(), BlackScholes::new(0.045, 0.0));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config = ScannerConfig::from_toml("dividend_yield = 0.013\n").unwrap();
        assert_eq!(config.dividend_yield, 0.013);
        assert_eq!(config.risk_free_rate, 0.045);
        assert_eq!(config.request_timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_invalid_values_rejected() {
        assert!(matches!(
            ScannerConfig::from_toml("request_timeout_secs = 0"),
            Err(ConfigError::InvalidValue(_))
        ));
        assert!(matches!(
            ScannerConfig::from_toml("risk_free_rate = \"high\""),
            Err(ConfigError::Parse(_))
        ));
    }
}

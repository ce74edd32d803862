//! Core data types for option chain analysis.
//!
//! These types are provider-neutral: every market-data adapter converts its
//! own wire format into `OptionQuote` / `OptionsChain` before the engine sees it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Option type (call or put).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionType {
    Call,
    Put,
}

/// A single option contract observation.
///
/// `vega` and `delta` are `None` until the quote has been run through the
/// Greeks annotator. Consumers must not treat a missing Greek as zero except
/// where a formula explicitly defaults it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    /// Strike price
    pub strike: Decimal,

    /// Option type (call or put)
    pub option_type: OptionType,

    /// Option expiration date
    pub expiration: NaiveDate,

    /// Bid price
    #[serde(default)]
    pub bid: Decimal,

    /// Ask price
    #[serde(default)]
    pub ask: Decimal,

    /// Implied volatility as a decimal (0.25 = 25%). Zero means unquoted.
    #[serde(default)]
    pub implied_volatility: f64,

    /// Trading volume
    #[serde(default)]
    pub volume: i64,

    /// Open interest
    #[serde(default)]
    pub open_interest: i64,

    /// Vega per 1 vol point, populated by annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vega: Option<f64>,

    /// Delta, populated by annotation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delta: Option<f64>,
}

impl OptionQuote {
    /// Create an unannotated quote.
    pub fn new(
        option_type: OptionType,
        strike: Decimal,
        expiration: NaiveDate,
        bid: Decimal,
        ask: Decimal,
        implied_volatility: f64,
    ) -> Self {
        Self {
            strike,
            option_type,
            expiration,
            bid,
            ask,
            implied_volatility,
            volume: 0,
            open_interest: 0,
            vega: None,
            delta: None,
        }
    }

    /// Mid price.
    pub fn mid(&self) -> Decimal {
        (self.bid + self.ask) / Decimal::TWO
    }

    /// Absolute bid-ask spread.
    pub fn spread(&self) -> Decimal {
        self.ask - self.bid
    }

    /// Whether the contract is out of the money at `spot`.
    pub fn is_otm(&self, spot: Decimal) -> bool {
        match self.option_type {
            OptionType::Call => self.strike > spot,
            OptionType::Put => self.strike < spot,
        }
    }

    /// Copy of this quote carrying the given Greeks.
    pub fn with_greeks(&self, vega: f64, delta: f64) -> Self {
        Self {
            vega: Some(vega),
            delta: Some(delta),
            ..self.clone()
        }
    }
}

/// All options for a single expiration date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionsChain {
    /// Expiration date for this chain
    pub expiration: NaiveDate,

    /// Call options
    #[serde(default)]
    pub calls: Vec<OptionQuote>,

    /// Put options
    #[serde(default)]
    pub puts: Vec<OptionQuote>,
}

impl OptionsChain {
    /// Create a new empty chain.
    pub fn new(expiration: NaiveDate) -> Self {
        Self {
            expiration,
            calls: Vec::new(),
            puts: Vec::new(),
        }
    }

    /// Add a quote to the appropriate side.
    pub fn add_quote(&mut self, quote: OptionQuote) {
        match quote.option_type {
            OptionType::Call => self.calls.push(quote),
            OptionType::Put => self.puts.push(quote),
        }
    }

    /// True when neither side has a quote.
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty() && self.puts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()
    }

    #[test]
    fn test_mid_and_spread() {
        let quote = OptionQuote::new(
            OptionType::Call,
            Decimal::from(110),
            expiry(),
            Decimal::new(180, 2),
            Decimal::new(200, 2),
            0.20,
        );
        assert_eq!(quote.mid(), Decimal::new(190, 2));
        assert_eq!(quote.spread(), Decimal::new(20, 2));
    }

    #[test]
    fn test_otm_by_side() {
        let spot = Decimal::from(100);
        let call = OptionQuote::new(OptionType::Call, Decimal::from(105), expiry(), Decimal::ONE, Decimal::TWO, 0.2);
        let put = OptionQuote::new(OptionType::Put, Decimal::from(105), expiry(), Decimal::ONE, Decimal::TWO, 0.2);
        assert!(call.is_otm(spot));
        assert!(!put.is_otm(spot));

        let at_money = OptionQuote::new(OptionType::Call, spot, expiry(), Decimal::ONE, Decimal::TWO, 0.2);
        assert!(!at_money.is_otm(spot));
    }

    #[test]
    fn test_with_greeks_leaves_original_untouched() {
        let quote = OptionQuote::new(OptionType::Put, Decimal::from(90), expiry(), Decimal::ONE, Decimal::TWO, 0.3);
        let annotated = quote.with_greeks(0.05, -0.2);
        assert_eq!(quote.vega, None);
        assert_eq!(quote.delta, None);
        assert_eq!(annotated.vega, Some(0.05));
        assert_eq!(annotated.delta, Some(-0.2));
        assert_eq!(annotated.strike, quote.strike);
    }

    #[test]
    fn test_chain_add_quote_by_side() {
        let mut chain = OptionsChain::new(expiry());
        assert!(chain.is_empty());
        chain.add_quote(OptionQuote::new(OptionType::Call, Decimal::from(110), expiry(), Decimal::ONE, Decimal::TWO, 0.2));
        chain.add_quote(OptionQuote::new(OptionType::Put, Decimal::from(90), expiry(), Decimal::ONE, Decimal::TWO, 0.3));
        chain.add_quote(OptionQuote::new(OptionType::Put, Decimal::from(110), expiry(), Decimal::ONE, Decimal::TWO, 0.3));

        assert_eq!(chain.calls.len(), 1);
        assert_eq!(chain.puts.len(), 2);
        assert!(!chain.is_empty());
    }
}

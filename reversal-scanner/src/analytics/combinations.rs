//! Risk reversal candidate generation.
//!
//! For one expiration, pairs every eligible OTM call with every eligible
//! OTM put and computes the economics of the resulting two-leg trade:
//! - Bullish: long call + short put
//! - Bearish: long put + short call
//!
//! Eligibility is OTM on both sides and within `MAX_STRIKE_DISTANCE_PCT` of
//! the underlying. No admission policy is applied here; see `validity`.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::data::{OptionQuote, OptionsChain};
use crate::pricing::{annotate_greeks, BlackScholes};

/// Legs further than this fraction of the underlying from spot are ignored.
pub const MAX_STRIKE_DISTANCE_PCT: Decimal = Decimal::from_parts(75, 0, 0, false, 2);

/// Floor on time to expiry: one hour, in years.
pub const MIN_TIME_TO_EXPIRY: f64 = 1.0 / (365.0 * 24.0);

const MILLIS_PER_DAY: f64 = 24.0 * 60.0 * 60.0 * 1000.0;
const MILLIS_PER_YEAR: f64 = 365.0 * MILLIS_PER_DAY;

/// Direction of the risk reversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyDirection {
    /// Long OTM call, short OTM put.
    Bullish,
    /// Long OTM put, short OTM call.
    Bearish,
}

impl StrategyDirection {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "bullish" => Some(Self::Bullish),
            "bearish" => Some(Self::Bearish),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bullish => "bullish",
            Self::Bearish => "bearish",
        }
    }

    /// Human-readable strategy label attached to every combination.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bullish => "Bullish Risk Reversal",
            Self::Bearish => "Bearish Risk Reversal",
        }
    }

    pub fn long_leg_name(&self) -> &'static str {
        match self {
            Self::Bullish => "Long Call",
            Self::Bearish => "Long Put",
        }
    }

    pub fn short_leg_name(&self) -> &'static str {
        match self {
            Self::Bullish => "Short Put",
            Self::Bearish => "Short Call",
        }
    }
}

impl std::fmt::Display for StrategyDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Execution-cost view of a combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingComparison {
    /// Long-leg mid minus short-leg mid.
    pub mid_price: Decimal,
    /// Sum of both legs' bid-ask spreads.
    pub bid_ask_spread: Decimal,
}

/// A candidate risk reversal for one expiration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrategyCombination {
    /// Bullish or bearish.
    pub direction: StrategyDirection,
    /// Display label, e.g. "Bullish Risk Reversal".
    pub strategy_label: String,
    /// Expiration date.
    pub expiration: NaiveDate,
    /// Days to expiration (rounded up).
    pub days_to_expiration: i64,
    /// Strike of the bought option (call if bullish, put if bearish).
    pub long_strike: Decimal,
    /// Strike of the sold option (put if bullish, call if bearish).
    pub short_strike: Decimal,
    /// Long ask minus short bid. Negative is a net credit.
    pub net_cost: Decimal,
    /// Short-leg IV minus long-leg IV.
    pub iv_advantage: f64,
    /// Long delta minus short delta.
    pub net_delta: f64,
    /// Long vega minus short vega.
    pub net_vega: f64,
    /// Credit received as a fraction of the strike width.
    pub efficiency: f64,
    /// Mid and spread comparison.
    pub pricing_comparison: PricingComparison,
    /// Loss on the adverse side at the short strike.
    pub worst_case_loss: Decimal,
    /// Underlying price at which expiry P&L is zero.
    pub breakeven: Decimal,
    /// Composite score, set by ranking.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
}

impl StrategyCombination {
    pub fn call_strike(&self) -> Decimal {
        match self.direction {
            StrategyDirection::Bullish => self.long_strike,
            StrategyDirection::Bearish => self.short_strike,
        }
    }

    pub fn put_strike(&self) -> Decimal {
        match self.direction {
            StrategyDirection::Bullish => self.short_strike,
            StrategyDirection::Bearish => self.long_strike,
        }
    }
}

/// Instant at which a listed expiration date is taken to expire.
fn expiration_instant(expiration: NaiveDate) -> DateTime<Utc> {
    Utc.from_utc_datetime(&expiration.and_time(NaiveTime::default()))
}

fn millis_until(expiration: NaiveDate, as_of: DateTime<Utc>) -> f64 {
    (expiration_instant(expiration) - as_of).num_milliseconds() as f64
}

/// Time to expiry in years, floored at one hour.
pub fn time_to_expiry(expiration: NaiveDate, as_of: DateTime<Utc>) -> f64 {
    (millis_until(expiration, as_of) / MILLIS_PER_YEAR).max(MIN_TIME_TO_EXPIRY)
}

/// Calendar days to expiration, rounded up.
pub fn days_to_expiration(expiration: NaiveDate, as_of: DateTime<Utc>) -> i64 {
    (millis_until(expiration, as_of) / MILLIS_PER_DAY).ceil() as i64
}

/// Generates risk reversal candidates from an options chain.
#[derive(Debug, Clone, Default)]
pub struct CombinationGenerator {
    bs: BlackScholes,
}

impl CombinationGenerator {
    pub fn new(bs: BlackScholes) -> Self {
        Self { bs }
    }

    /// Build every strike-ordered combination for one expiration.
    ///
    /// Returns an empty vector when either side has no eligible leg.
    pub fn generate(
        &self,
        direction: StrategyDirection,
        chain: &OptionsChain,
        underlying_price: Decimal,
        as_of: DateTime<Utc>,
    ) -> Vec<StrategyCombination> {
        let expiration = chain.expiration;
        let time = time_to_expiry(expiration, as_of);
        let dte = days_to_expiration(expiration, as_of);

        let calls = annotate_greeks(&chain.calls, underlying_price, time, &self.bs);
        let puts = annotate_greeks(&chain.puts, underlying_price, time, &self.bs);

        let max_distance = underlying_price * MAX_STRIKE_DISTANCE_PCT;
        let calls: Vec<&OptionQuote> = calls
            .iter()
            .filter(|q| q.is_otm(underlying_price))
            .filter(|q| q.strike < underlying_price + max_distance)
            .collect();
        let puts: Vec<&OptionQuote> = puts
            .iter()
            .filter(|q| q.is_otm(underlying_price))
            .filter(|q| q.strike > underlying_price - max_distance)
            .collect();

        if calls.is_empty() || puts.is_empty() {
            debug!(%expiration, calls = calls.len(), puts = puts.len(), "no eligible legs");
            return Vec::new();
        }

        let mut combinations = Vec::new();

        match direction {
            StrategyDirection::Bullish => {
                for call in &calls {
                    for put in &puts {
                        if call.strike <= put.strike {
                            continue;
                        }
                        combinations.push(build_combination(direction, call, put, expiration, dte));
                    }
                }
            }
            StrategyDirection::Bearish => {
                for put in &puts {
                    for call in &calls {
                        if put.strike >= call.strike {
                            continue;
                        }
                        combinations.push(build_combination(direction, put, call, expiration, dte));
                    }
                }
            }
        }

        debug!(%expiration, dte, count = combinations.len(), "generated combinations");
        combinations
    }
}

/// Compute the economics of a long/short pair.
fn build_combination(
    direction: StrategyDirection,
    long: &OptionQuote,
    short: &OptionQuote,
    expiration: NaiveDate,
    dte: i64,
) -> StrategyCombination {
    let (call, put) = match direction {
        StrategyDirection::Bullish => (long, short),
        StrategyDirection::Bearish => (short, long),
    };

    let net_cost = long.ask - short.bid;
    let width = call.strike - put.strike;
    let efficiency: f64 = if width > Decimal::ZERO {
        (-net_cost / width).try_into().unwrap_or(0.0)
    } else {
        0.0
    };

    let (worst_case_loss, breakeven) = match direction {
        StrategyDirection::Bullish => (
            put.strike - (put.bid - call.ask),
            call.strike + net_cost,
        ),
        StrategyDirection::Bearish => (
            call.strike + (call.bid - put.ask),
            put.strike - net_cost,
        ),
    };

    StrategyCombination {
        direction,
        strategy_label: direction.label().to_string(),
        expiration,
        days_to_expiration: dte,
        long_strike: long.strike,
        short_strike: short.strike,
        net_cost,
        iv_advantage: short.implied_volatility - long.implied_volatility,
        net_delta: long.delta.unwrap_or(0.0) - short.delta.unwrap_or(0.0),
        net_vega: long.vega.unwrap_or(0.0) - short.vega.unwrap_or(0.0),
        efficiency,
        pricing_comparison: PricingComparison {
            mid_price: long.mid() - short.mid(),
            bid_ask_spread: long.spread() + short.spread(),
        },
        worst_case_loss,
        breakeven,
        score: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::OptionType;
    use approx::assert_relative_eq;

    fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 15, 0, 0).unwrap()
    }

    fn expiry() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 2, 16).unwrap()
    }

    fn dec(cents: i64) -> Decimal {
        Decimal::new(cents, 2)
    }

    fn call(strike: i64, bid: i64, ask: i64, iv: f64) -> OptionQuote {
        OptionQuote::new(OptionType::Call, Decimal::from(strike), expiry(), dec(bid), dec(ask), iv)
    }

    fn put(strike: i64, bid: i64, ask: i64, iv: f64) -> OptionQuote {
        OptionQuote::new(OptionType::Put, Decimal::from(strike), expiry(), dec(bid), dec(ask), iv)
    }

    fn chain(calls: Vec<OptionQuote>, puts: Vec<OptionQuote>) -> OptionsChain {
        OptionsChain {
            expiration: expiry(),
            calls,
            puts,
        }
    }

    #[test]
    fn test_direction_parsing() {
        assert_eq!(StrategyDirection::from_str("bullish"), Some(StrategyDirection::Bullish));
        assert_eq!(StrategyDirection::from_str(" BEARISH "), Some(StrategyDirection::Bearish));
        assert_eq!(StrategyDirection::from_str("neutral"), None);
        assert_eq!(StrategyDirection::Bearish.label(), "Bearish Risk Reversal");
    }

    #[test]
    fn test_time_to_expiry_and_dte() {
        // 31 days and 9 hours out
        let dte = days_to_expiration(expiry(), as_of());
        assert_eq!(dte, 32);

        let t = time_to_expiry(expiry(), as_of());
        assert_relative_eq!(t, (31.0 + 9.0 / 24.0) / 365.0, epsilon = 1e-12);
    }

    #[test]
    fn test_time_to_expiry_floor() {
        let after_expiry = Utc.with_ymd_and_hms(2024, 2, 20, 0, 0, 0).unwrap();
        assert_eq!(time_to_expiry(expiry(), after_expiry), MIN_TIME_TO_EXPIRY);
        assert_eq!(days_to_expiration(expiry(), after_expiry), -4);
    }

    #[test]
    fn test_expiration_taken_from_chain() {
        let generator = CombinationGenerator::default();
        let mislabeled = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let mut long = call(110, 180, 200, 0.20);
        let mut short = put(90, 450, 470, 0.30);
        long.expiration = mislabeled;
        short.expiration = mislabeled;

        let combos = generator.generate(
            StrategyDirection::Bullish,
            &chain(vec![long], vec![short]),
            Decimal::from(100),
            as_of(),
        );

        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].expiration, expiry());
        assert_eq!(combos[0].days_to_expiration, 32);
    }

    #[test]
    fn test_bullish_pair_economics() {
        let generator = CombinationGenerator::default();
        let chain = chain(vec![call(110, 180, 200, 0.20)], vec![put(90, 450, 470, 0.30)]);

        let combos = generator.generate(StrategyDirection::Bullish, &chain, Decimal::from(100), as_of());

        assert_eq!(combos.len(), 1);
        let c = &combos[0];
        assert_eq!(c.long_strike, Decimal::from(110));
        assert_eq!(c.short_strike, Decimal::from(90));
        assert_eq!(c.net_cost, dec(-250));
        assert_relative_eq!(c.efficiency, 0.125);
        assert_relative_eq!(c.iv_advantage, 0.10, epsilon = 1e-12);
        // 90 - (4.50 - 2.00)
        assert_eq!(c.worst_case_loss, dec(8750));
        // 110 + (-2.50)
        assert_eq!(c.breakeven, dec(10750));
        // 1.90 - 4.60
        assert_eq!(c.pricing_comparison.mid_price, dec(-270));
        assert_eq!(c.pricing_comparison.bid_ask_spread, dec(40));
        assert_eq!(c.days_to_expiration, 32);
        assert_eq!(c.strategy_label, "Bullish Risk Reversal");
        assert_eq!(c.score, None);
        // long call delta is positive, short put delta negative
        assert!(c.net_delta > 0.0);
    }

    #[test]
    fn test_bearish_pair_economics() {
        let generator = CombinationGenerator::default();
        let chain = chain(vec![call(110, 300, 320, 0.35)], vec![put(90, 100, 120, 0.25)]);

        let combos = generator.generate(StrategyDirection::Bearish, &chain, Decimal::from(100), as_of());

        assert_eq!(combos.len(), 1);
        let c = &combos[0];
        assert_eq!(c.long_strike, Decimal::from(90));
        assert_eq!(c.short_strike, Decimal::from(110));
        assert_eq!(c.call_strike(), Decimal::from(110));
        assert_eq!(c.put_strike(), Decimal::from(90));
        // 1.20 - 3.00
        assert_eq!(c.net_cost, dec(-180));
        assert_relative_eq!(c.efficiency, 0.09);
        assert_relative_eq!(c.iv_advantage, 0.10, epsilon = 1e-12);
        // 110 + (3.00 - 1.20)
        assert_eq!(c.worst_case_loss, dec(11180));
        // 90 - (-1.80)
        assert_eq!(c.breakeven, dec(9180));
        // 1.10 - 3.10
        assert_eq!(c.pricing_comparison.mid_price, dec(-200));
        assert!(c.net_delta < 0.0);
    }

    #[test]
    fn test_strike_ordering_holds_for_every_pair() {
        let generator = CombinationGenerator::default();
        let calls = (101..=120).step_by(3).map(|k| call(k, 100, 120, 0.2)).collect();
        let puts = (80..=99).step_by(2).map(|k| put(k, 100, 120, 0.3)).collect();
        let chain = chain(calls, puts);

        for direction in [StrategyDirection::Bullish, StrategyDirection::Bearish] {
            let combos = generator.generate(direction, &chain, Decimal::from(100), as_of());
            assert_eq!(combos.len(), 7 * 10);
            assert!(combos.iter().all(|c| c.call_strike() > c.put_strike()));
            assert!(combos.iter().all(|c| c.call_strike() > c.put_strike()));
        }
    }

    #[test]
    fn test_enumeration_order() {
        let generator = CombinationGenerator::default();
        let chain = chain(
            vec![call(105, 100, 120, 0.2), call(110, 50, 60, 0.2)],
            vec![put(95, 100, 120, 0.3), put(90, 50, 60, 0.3)],
        );
        let spot = Decimal::from(100);

        let bullish = generator.generate(StrategyDirection::Bullish, &chain, spot, as_of());
        let pairs: Vec<(Decimal, Decimal)> = bullish.iter().map(|c| (c.long_strike, c.short_strike)).collect();
        assert_eq!(
            pairs,
            vec![
                (Decimal::from(105), Decimal::from(95)),
                (Decimal::from(105), Decimal::from(90)),
                (Decimal::from(110), Decimal::from(95)),
                (Decimal::from(110), Decimal::from(90)),
            ]
        );

        let bearish = generator.generate(StrategyDirection::Bearish, &chain, spot, as_of());
        assert_eq!(bearish[0].long_strike, Decimal::from(95));
        assert_eq!(bearish[1].long_strike, Decimal::from(95));
        assert_eq!(bearish[1].short_strike, Decimal::from(110));
    }

    #[test]
    fn test_itm_and_far_otm_legs_excluded() {
        let generator = CombinationGenerator::default();
        let chain = chain(
            vec![call(95, 600, 650, 0.2), call(100, 300, 320, 0.2), call(175, 1, 2, 0.6), call(150, 5, 10, 0.5)],
            vec![put(105, 600, 650, 0.3), put(25, 1, 2, 0.9), put(30, 2, 3, 0.8)],
        );

        let combos = generator.generate(StrategyDirection::Bullish, &chain, Decimal::from(100), as_of());

        // Only call 150 (< 175) and put 30 (> 25) survive
        assert_eq!(combos.len(), 1);
        assert_eq!(combos[0].long_strike, Decimal::from(150));
        assert_eq!(combos[0].short_strike, Decimal::from(30));
    }

    #[test]
    fn test_empty_side_yields_nothing() {
        let generator = CombinationGenerator::default();
        let spot = Decimal::from(100);

        let no_puts = chain(vec![call(110, 180, 200, 0.2)], Vec::new());
        assert!(generator.generate(StrategyDirection::Bullish, &no_puts, spot, as_of()).is_empty());

        let no_calls = chain(Vec::new(), vec![put(90, 450, 470, 0.3)]);
        assert!(generator.generate(StrategyDirection::Bearish, &no_calls, spot, as_of()).is_empty());

        let only_itm = chain(vec![call(90, 1000, 1100, 0.2)], vec![put(110, 1000, 1100, 0.3)]);
        assert!(generator.generate(StrategyDirection::Bullish, &only_itm, spot, as_of()).is_empty());
    }

    #[test]
    fn test_unquoted_iv_contributes_no_greeks() {
        let generator = CombinationGenerator::default();
        let chain = chain(vec![call(110, 180, 200, 0.0)], vec![put(90, 450, 470, 0.0)]);

        let combos = generator.generate(StrategyDirection::Bullish, &chain, Decimal::from(100), as_of());

        assert_eq!(combos[0].net_vega, 0.0);
        assert_eq!(combos[0].net_delta, 0.0);
    }
}

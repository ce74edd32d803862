//! Expiration payoff of a risk reversal.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::combinations::{StrategyCombination, StrategyDirection};

/// Default number of points in a payoff curve.
pub const DEFAULT_CURVE_POINTS: usize = 20;

/// One point of a payoff curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PayoffPoint {
    pub price: Decimal,
    pub profit: Decimal,
}

impl StrategyCombination {
    /// Per-share P&L at expiration if the underlying settles at `price`.
    pub fn payoff_at(&self, price: Decimal) -> Decimal {
        let call_value = (price - self.call_strike()).max(Decimal::ZERO);
        let put_value = (self.put_strike() - price).max(Decimal::ZERO);

        let position_value = match self.direction {
            StrategyDirection::Bullish => call_value - put_value,
            StrategyDirection::Bearish => put_value - call_value,
        };

        position_value - self.net_cost
    }
}

/// Evenly spaced payoff samples from 90% of the put strike to 110% of the
/// call strike, rounded to cents.
pub fn payoff_curve(combination: &StrategyCombination, points: usize) -> Vec<PayoffPoint> {
    if points == 0 {
        return Vec::new();
    }

    let low = combination.put_strike() * Decimal::new(9, 1);
    let high = combination.call_strike() * Decimal::new(11, 1);
    let step = if points > 1 {
        (high - low) / Decimal::from(points - 1)
    } else {
        Decimal::ZERO
    };

    (0..points)
        .map(|i| {
            let price = (low + step * Decimal::from(i)).round_dp(2);
            PayoffPoint {
                price,
                profit: combination.payoff_at(price).round_dp(2),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::combinations::PricingComparison;
    use chrono::NaiveDate;

    fn combination(direction: StrategyDirection, long: i64, short: i64, net_cost_cents: i64) -> StrategyCombination {
        StrategyCombination {
            direction,
            strategy_label: direction.label().to_string(),
            expiration: NaiveDate::from_ymd_opt(2024, 2, 16).unwrap(),
            days_to_expiration: 32,
            long_strike: Decimal::from(long),
            short_strike: Decimal::from(short),
            net_cost: Decimal::new(net_cost_cents, 2),
            iv_advantage: 0.1,
            net_delta: 0.0,
            net_vega: 0.0,
            efficiency: 0.125,
            pricing_comparison: PricingComparison {
                mid_price: Decimal::ZERO,
                bid_ask_spread: Decimal::ZERO,
            },
            worst_case_loss: Decimal::ZERO,
            breakeven: Decimal::ZERO,
            score: None,
        }
    }

    #[test]
    fn test_bullish_payoff_regions() {
        let c = combination(StrategyDirection::Bullish, 110, 90, -250);

        // Between strikes the credit is kept
        assert_eq!(c.payoff_at(Decimal::from(100)), Decimal::new(250, 2));
        // Above the call strike gains one for one
        assert_eq!(c.payoff_at(Decimal::from(120)), Decimal::new(1250, 2));
        // Below the put strike loses one for one
        assert_eq!(c.payoff_at(Decimal::from(80)), Decimal::new(-750, 2));
    }

    #[test]
    fn test_bearish_payoff_regions() {
        let c = combination(StrategyDirection::Bearish, 90, 110, -180);

        assert_eq!(c.payoff_at(Decimal::from(100)), Decimal::new(180, 2));
        assert_eq!(c.payoff_at(Decimal::from(80)), Decimal::new(1180, 2));
        assert_eq!(c.payoff_at(Decimal::from(115)), Decimal::new(-320, 2));
    }

    #[test]
    fn test_curve_spans_strikes() {
        let c = combination(StrategyDirection::Bullish, 110, 90, -250);
        let curve = payoff_curve(&c, DEFAULT_CURVE_POINTS);

        assert_eq!(curve.len(), 20);
        assert_eq!(curve[0].price, Decimal::from(81));
        assert_eq!(curve[19].price, Decimal::from(121));
        assert!(curve.windows(2).all(|w| w[0].price < w[1].price));
    }

    #[test]
    fn test_curve_degenerate_sizes() {
        let c = combination(StrategyDirection::Bullish, 110, 90, -250);
        assert!(payoff_curve(&c, 0).is_empty());

        let single = payoff_curve(&c, 1);
        assert_eq!(single.len(), 1);
        assert_eq!(single[0].price, Decimal::from(81));
    }
}

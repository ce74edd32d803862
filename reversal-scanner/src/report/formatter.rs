//! Report formatter.
//!
//! Turns a ranked candidate list into the fixed-shape `AnalysisResult`
//! consumed by presentation layers: three narratives plus a top-5 table.
//! Currency renders with two decimals, percentages with one.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

use crate::analytics::{StrategyCombination, StrategyDirection};

/// Rows in the summary table.
pub const TOP_N: usize = 5;

/// One table row: rank, expiration, strikes, net cost, net vega, efficiency, score.
pub type TopRow = [String; 7];

/// Terminal artifact of an analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub summary: String,
    pub risk: String,
    pub pricing_comparison: String,
    pub top_5: Vec<TopRow>,
}

impl AnalysisResult {
    /// Result carrying only a summary line.
    pub fn message(summary: impl Into<String>) -> Self {
        Self {
            summary: summary.into(),
            ..Self::default()
        }
    }

    pub fn no_strategies(ticker: &str, direction: StrategyDirection) -> Self {
        Self::message(format!(
            "No valid {} strategies found for {} with the given parameters.",
            direction, ticker
        ))
    }

    pub fn no_expirations(ticker: &str, min_dte: i64, max_dte: i64) -> Self {
        Self::message(format!(
            "No expiration dates found for {} within {}-{} days.",
            ticker, min_dte, max_dte
        ))
    }

    pub fn error(reason: impl std::fmt::Display) -> Self {
        Self::message(format!("Analysis Error: {}", reason))
    }

    /// True when no trade was recommended.
    pub fn is_empty(&self) -> bool {
        self.top_5.is_empty()
    }
}

fn money(value: Decimal) -> String {
    let mut cents = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    cents.rescale(2);
    format!("${}", cents)
}

fn percent(fraction: f64) -> String {
    format!("{:.1}%", fraction * 100.0)
}

fn strike(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Build the report for `ranked` (best first).
pub fn format_report(
    ranked: &[StrategyCombination],
    ticker: &str,
    direction: StrategyDirection,
) -> AnalysisResult {
    let Some(top) = ranked.first() else {
        return AnalysisResult::no_strategies(ticker, direction);
    };

    AnalysisResult {
        summary: summary_text(top),
        risk: risk_text(top),
        pricing_comparison: pricing_text(top),
        top_5: ranked
            .iter()
            .take(TOP_N)
            .enumerate()
            .map(|(i, c)| top_row(i + 1, c))
            .collect(),
    }
}

fn summary_text(top: &StrategyCombination) -> String {
    let direction = top.direction;
    format!(
        "TOP RECOMMENDED TRADE\n\n\
         {}: {} Strike\n\
         {}: {} Strike\n\
         Net Cost: {}\n\
         IV Advantage: {}\n\
         Efficiency: {}\n\
         Breakeven: {}\n\
         Expiration: {} ({} days)",
        direction.long_leg_name(),
        strike(top.long_strike),
        direction.short_leg_name(),
        strike(top.short_strike),
        money(top.net_cost),
        percent(top.iv_advantage),
        percent(top.efficiency),
        money(top.breakeven),
        top.expiration,
        top.days_to_expiration,
    )
}

fn risk_text(top: &StrategyCombination) -> String {
    let (mechanics, adverse_move, upside) = match top.direction {
        StrategyDirection::Bullish => (
            "Buying an OTM call and selling an OTM put",
            "falls below",
            "upside",
        ),
        StrategyDirection::Bearish => (
            "Buying an OTM put and selling an OTM call",
            "rises above",
            "downside",
        ),
    };
    let cost_note = if top.net_cost < Decimal::ZERO {
        "credit received"
    } else {
        "debit paid"
    };

    format!(
        "STRATEGY OVERVIEW\n\n\
         This {} risk reversal strategy involves:\n\
         • {}\n\
         • Net cost: {} ({})\n\
         • Maximum risk: {} if stock {} {}\n\
         • Profit potential: Unlimited {}\n\
         • Breakeven: {}",
        top.direction,
        mechanics,
        money(top.net_cost),
        cost_note,
        money(top.worst_case_loss),
        adverse_move,
        strike(top.short_strike),
        upside,
        money(top.breakeven),
    )
}

fn pricing_text(top: &StrategyCombination) -> String {
    format!(
        "PRICING COMPARISON\n\n\
         Current Pricing:\n\
         • Net Cost: {}\n\
         • Mid-price: {}\n\
         • Bid-Ask Spread: {}\n\n\
         Greeks:\n\
         • Net Delta: {:.3}\n\
         • Net Vega: {:.3}",
        money(top.net_cost),
        money(top.pricing_comparison.mid_price),
        money(top.pricing_comparison.bid_ask_spread),
        top.net_delta,
        top.net_vega,
    )
}

fn top_row(rank: usize, c: &StrategyCombination) -> TopRow {
    [
        rank.to_string(),
        c.expiration.to_string(),
        format!("{}/{}", strike(c.long_strike), strike(c.short_strike)),
        money(c.net_cost),
        format!("{:.3}", c.net_vega),
        percent(c.efficiency),
        format!("{:.2}", c.score.unwrap_or(0.0)),
    ]
}

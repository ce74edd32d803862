//! Admission rule for risk reversal candidates.
//!
//! A candidate is only worth ranking when it is entered for a credit, the
//! credit recovers a meaningful part of the strike width, and the short leg
//! is priced at a richer volatility than the long leg. Every threshold is
//! exclusive.

use rust_decimal::Decimal;

use super::combinations::StrategyCombination;

/// Net cost must be strictly below this (a net credit).
pub const MAX_NET_COST: Decimal = Decimal::ZERO;

/// Minimum credit as a fraction of strike width.
pub const MIN_EFFICIENCY: f64 = 0.10;

/// Minimum short-minus-long implied volatility.
pub const MIN_IV_ADVANTAGE: f64 = 0.02;

/// Whether a candidate passes all three thresholds.
pub fn is_admissible(combination: &StrategyCombination) -> bool {
    combination.net_cost < MAX_NET_COST
        && combination.efficiency > MIN_EFFICIENCY
        && combination.iv_advantage > MIN_IV_ADVANTAGE
}

/// Keep admissible candidates, preserving order.
pub fn filter_admissible(combinations: Vec<StrategyCombination>) -> Vec<StrategyCombination> {
    combinations.into_iter().filter(is_admissible).collect()
}

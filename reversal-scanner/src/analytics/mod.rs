//! Risk reversal analytics.
//!
//! Provides:
//! - Candidate generation across OTM call/put strike pairs
//! - Admission thresholds (credit, efficiency, IV advantage)
//! - Composite scoring and ranking
//! - Expiration payoff curves

pub mod combinations;
pub mod payoff;
pub mod ranking;
pub mod validity;

pub use combinations::{
    days_to_expiration, time_to_expiry, CombinationGenerator, PricingComparison,
    StrategyCombination, StrategyDirection, MAX_STRIKE_DISTANCE_PCT,
};
pub use payoff::{payoff_curve, PayoffPoint, DEFAULT_CURVE_POINTS};
pub use ranking::rank_combinations;
pub use validity::{filter_admissible, is_admissible, MIN_EFFICIENCY, MIN_IV_ADVANTAGE};

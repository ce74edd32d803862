//! Composite scoring and ranking of admissible candidates.
//!
//! Three metrics compete:
//! - efficiency (credit per unit of strike width)
//! - IV advantage (short IV minus long IV)
//! - credit size (negated net cost)
//!
//! Each is divided by its maximum across the candidate set, then blended
//! with fixed weights. Metrics whose maximum is not positive contribute 0.

use super::combinations::StrategyCombination;

pub const EFFICIENCY_WEIGHT: f64 = 0.4;
pub const IV_ADVANTAGE_WEIGHT: f64 = 0.3;
pub const CREDIT_WEIGHT: f64 = 0.3;

/// Raw (unnormalized) metrics for a candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
struct RawScores {
    efficiency: f64,
    iv: f64,
    cost: f64,
}

impl RawScores {
    fn of(combination: &StrategyCombination) -> Self {
        Self {
            efficiency: combination.efficiency,
            iv: combination.iv_advantage,
            cost: (-combination.net_cost).try_into().unwrap_or(0.0),
        }
    }
}

fn normalize(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        value / max
    } else {
        0.0
    }
}

/// Score every candidate and sort by score, highest first.
///
/// The sort is stable: equal scores keep their input order.
pub fn rank_combinations(combinations: Vec<StrategyCombination>) -> Vec<StrategyCombination> {
    if combinations.is_empty() {
        return combinations;
    }

    let raw: Vec<RawScores> = combinations.iter().map(RawScores::of).collect();
    let max_efficiency = raw.iter().map(|r| r.efficiency).fold(f64::NEG_INFINITY, f64::max);
    let max_iv = raw.iter().map(|r| r.iv).fold(f64::NEG_INFINITY, f64::max);
    let max_cost = raw.iter().map(|r| r.cost).fold(f64::NEG_INFINITY, f64::max);

    let mut ranked: Vec<StrategyCombination> = combinations
        .into_iter()
        .zip(raw)
        .map(|(mut combination, r)| {
            let score = EFFICIENCY_WEIGHT * normalize(r.efficiency, max_efficiency)
                + IV_ADVANTAGE_WEIGHT * normalize(r.iv, max_iv)
                + CREDIT_WEIGHT * normalize(r.cost, max_cost);
            combination.score = Some(score);
            combination
        })
        .collect();

    ranked.sort_by(|a, b| {
        let a = a.score.unwrap_or(0.0);
        let b = b.score.unwrap_or(0.0);
        b.partial_cmp(&a).unwrap_or(std::cmp::Ordering::Equal)
    });

    ranked
}

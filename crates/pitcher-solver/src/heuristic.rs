//! Remaining-cost estimators.
//!
//! Both estimators are pure functions of a state and the puzzle. Which one
//! runs is decided by the puzzle (see
//! [`PuzzleConfig::preferred_heuristic`](crate::puzzle::PuzzleConfig::preferred_heuristic)),
//! never by the search mode.

use serde::{Deserialize, Serialize};

use crate::node::State;
use crate::puzzle::{closest_capacity, closest_multiple, PuzzleConfig};

/// Weight applied to the total water held in the naive estimate
const NAIVE_VOLUME_WEIGHT: f64 = 0.2;

/// Which estimator to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum HeuristicKind {
    /// Distance of the closest pitcher to the target plus a volume penalty
    Naive,
    /// Pour-count lower bound built from the best matching pitcher
    Analytic,
}

/// An estimator bound to one puzzle
#[derive(Debug, Clone)]
pub struct Heuristic {
    kind: HeuristicKind,
    capacities: Vec<u64>,
    target: u64,
}

impl Heuristic {
    pub fn new(kind: HeuristicKind, puzzle: &PuzzleConfig) -> Self {
        Self {
            kind,
            capacities: puzzle.capacities.clone(),
            target: puzzle.target,
        }
    }

    pub fn kind(&self) -> HeuristicKind {
        self.kind
    }

    /// Estimated steps remaining from `state`; never negative.
    pub fn estimate(&self, state: &State) -> f64 {
        match self.kind {
            HeuristicKind::Naive => naive_estimate(state, self.target),
            HeuristicKind::Analytic => analytic_estimate(state, &self.capacities, self.target),
        }
    }
}

/// `min |pitcher - target| + 0.2 * total water`.
///
/// Cheap and blind to pour mechanics; fine for small puzzles.
pub fn naive_estimate(state: &State, target: u64) -> f64 {
    let closest = state
        .pitchers()
        .iter()
        .map(|&fill| fill.abs_diff(target))
        .min()
        .unwrap_or(0);
    closest as f64 + NAIVE_VOLUME_WEIGHT * state.total() as f64
}

/// Pour-count estimate for the water still missing from the goal container.
///
/// Moving `k` full loads of the closest-matching pitcher costs a fill and a
/// pour each. A pitcher that already holds water skips one fill, and a
/// remainder that is not an exact multiple needs one more transfer. An
/// overfull goal container only needs a single pour back out.
pub fn analytic_estimate(state: &State, capacities: &[u64], target: u64) -> f64 {
    let goal = state.goal();
    if goal > target {
        return 1.0;
    }

    let remaining = target - goal;
    if remaining == 0 {
        return 0.0;
    }

    let (capacity, index) = closest_capacity(capacities, remaining);
    let multiple = closest_multiple(capacity, remaining);

    let mut estimate = multiple.saturating_mul(2);
    if estimate > 0 && state.pitchers().get(index).is_some_and(|&fill| fill > 0) {
        estimate -= 1;
    }
    if capacity.checked_mul(multiple) != Some(remaining) {
        estimate = estimate.saturating_add(1);
    }

    estimate as f64
}

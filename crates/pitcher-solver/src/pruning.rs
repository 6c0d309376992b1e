//! Search mode policy and the bound used to prune non-improving work.
//!
//! In naive mode the first solution is final. In optimal mode every
//! solution tightens a lower bound on the best achievable step count, and
//! open nodes that already took more steps than that bound are abandoned.

use serde::{Deserialize, Serialize};

use crate::node::NodeId;

/// How the driver treats solutions, fixed when the driver is built
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Stop at the first goal-reaching path
    #[default]
    Naive,
    /// Keep searching until nothing under the best known bound remains
    Optimal,
}

impl SearchMode {
    /// Whether the first solution ends the search
    pub fn stops_at_first_solution(self) -> bool {
        matches!(self, SearchMode::Naive)
    }

    /// Whether open nodes above the lower bound are pruned after each round
    pub fn prunes_open(self) -> bool {
        matches!(self, SearchMode::Optimal)
    }
}

/// The best solution recorded so far
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Incumbent {
    best: Option<(NodeId, u32)>,
}

impl Incumbent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arena id of the recorded solution node
    pub fn node(&self) -> Option<NodeId> {
        self.best.map(|(id, _)| id)
    }

    /// Step count of the recorded solution, which bounds every later one
    pub fn lower_bound(&self) -> Option<u32> {
        self.best.map(|(_, steps)| steps)
    }

    pub fn is_set(&self) -> bool {
        self.best.is_some()
    }

    /// Offer a normalized solution taking `steps` steps.
    ///
    /// Naive mode keeps only the first solution. Optimal mode replaces the
    /// record when `steps` is strictly below the current bound. Returns
    /// whether the offer became the new record.
    pub fn offer(&mut self, mode: SearchMode, id: NodeId, steps: u32) -> bool {
        let improves = match (mode, self.lower_bound()) {
            (_, None) => true,
            (SearchMode::Naive, Some(_)) => false,
            (SearchMode::Optimal, Some(bound)) => steps < bound,
        };
        if improves {
            self.best = Some((id, steps));
        }
        improves
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeArena, State};

    fn ids(count: usize) -> Vec<NodeId> {
        let mut arena = NodeArena::new();
        (0..count)
            .map(|_| arena.push(Node::root(State::new([0u64, 0].into_iter().collect(), 0), 0.0)))
            .collect()
    }

    #[test]
    fn test_mode_policy() {
        assert!(SearchMode::Naive.stops_at_first_solution());
        assert!(!SearchMode::Naive.prunes_open());
        assert!(!SearchMode::Optimal.stops_at_first_solution());
        assert!(SearchMode::Optimal.prunes_open());
        assert_eq!(SearchMode::default(), SearchMode::Naive);
    }

    #[test]
    fn test_naive_keeps_first_solution() {
        let ids = ids(2);
        let mut incumbent = Incumbent::new();
        assert!(incumbent.offer(SearchMode::Naive, ids[0], 9));
        assert!(!incumbent.offer(SearchMode::Naive, ids[1], 3));
        assert_eq!(incumbent.node(), Some(ids[0]));
        assert_eq!(incumbent.lower_bound(), Some(9));
    }

    #[test]
    fn test_optimal_replaces_only_on_strict_improvement() {
        let ids = ids(3);
        let mut incumbent = Incumbent::new();
        assert!(!incumbent.is_set());
        assert!(incumbent.offer(SearchMode::Optimal, ids[0], 9));
        assert!(!incumbent.offer(SearchMode::Optimal, ids[1], 9), "ties keep the incumbent");
        assert!(incumbent.offer(SearchMode::Optimal, ids[2], 7));
        assert_eq!(incumbent.node(), Some(ids[2]));
        assert_eq!(incumbent.lower_bound(), Some(7));
    }
}

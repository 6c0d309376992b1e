//! Goal detection and path normalization.
//!
//! Detection is deliberately loose: a state counts as a goal as soon as any
//! container holds the target. Normalization then appends the pours needed
//! to land exactly the target in the goal container, so every reported
//! solution ends the same way.

use tracing::debug;

use crate::frontier::Frontier;
use crate::heuristic::Heuristic;
use crate::node::{Node, NodeArena, NodeId, State};
use crate::pour::Pour;

/// True iff any container, the goal container included, holds `target`.
pub fn is_goal(state: &State, target: u64) -> bool {
    state.fills().iter().any(|&fill| fill == target)
}

/// Turn a goal-touching node into one with exactly `target` in the goal
/// container.
///
/// A node whose goal container already holds the target is returned as is.
/// Otherwise up to two synthetic steps are appended: emptying a non-empty
/// goal container, then pouring the first pitcher holding the target into
/// it. Synthetic nodes are archived in Closed; the last one is returned.
pub fn normalize(
    arena: &mut NodeArena,
    frontier: &mut Frontier,
    heuristic: &Heuristic,
    raw: NodeId,
    target: u64,
) -> NodeId {
    let state = arena[raw].state();
    if state.goal() == target {
        return raw;
    }
    let Some(source) = state.pitchers().iter().position(|&fill| fill == target) else {
        return raw;
    };

    let mut current = raw;
    let mut pours = Vec::with_capacity(2);
    if state.goal() != 0 {
        pours.push(Pour::EmptyGoal);
    }
    pours.push(Pour::PourIntoGoal(source));

    for pour in pours {
        let next = arena[current].state().successor(|fills| {
            let goal = fills.len() - 1;
            if pour == Pour::EmptyGoal {
                fills[goal] = 0;
            } else {
                fills[goal] = target;
                fills[source] = 0;
            }
        });
        let h = heuristic.estimate(&next);
        current = arena.push(Node::child(next, current, pour, h));
        frontier.close(arena, current);
    }

    debug!(
        raw_steps = arena[raw].g(),
        steps = arena[current].g(),
        pitcher = source,
        "normalized goal state"
    );
    current
}

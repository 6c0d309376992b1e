//! Pour transition model.
//!
//! Enumerates every state reachable from a fill configuration by one legal
//! move. Pitchers are bounded by their capacity; the goal container has no
//! limit and sits in the last slot of every state.

use std::fmt;

use serde::{Serialize, Serializer};
use smallvec::smallvec;

use crate::node::State;
use crate::puzzle::PuzzleConfig;

/// A single legal move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pour {
    /// Fill pitcher from the tap
    Fill(usize),
    /// Empty pitcher onto the ground
    Empty(usize),
    /// Pour the first pitcher into the second until one is empty or full
    Transfer { from: usize, to: usize },
    /// Pour the whole pitcher into the goal container
    PourIntoGoal(usize),
    /// Pour from the goal container into a pitcher until it is full
    DrawFromGoal(usize),
    /// Empty the goal container
    EmptyGoal,
}

impl fmt::Display for Pour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pour::Fill(i) => write!(f, "fill pitcher {i}"),
            Pour::Empty(i) => write!(f, "empty pitcher {i}"),
            Pour::Transfer { from, to } => write!(f, "pour pitcher {from} into pitcher {to}"),
            Pour::PourIntoGoal(i) => write!(f, "pour pitcher {i} into goal"),
            Pour::DrawFromGoal(i) => write!(f, "pour goal into pitcher {i}"),
            Pour::EmptyGoal => write!(f, "empty goal"),
        }
    }
}

impl Serialize for Pour {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A state reachable in one move, with the move that reaches it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Successor {
    pub pour: Pour,
    pub state: State,
}

/// Legal-move generator for one puzzle
#[derive(Debug, Clone)]
pub struct PourModel {
    capacities: Vec<u64>,
}

impl PourModel {
    pub fn new(puzzle: &PuzzleConfig) -> Self {
        Self {
            capacities: puzzle.capacities.clone(),
        }
    }

    /// Every container empty, no steps taken
    pub fn initial_state(&self) -> State {
        State::new(smallvec![0; self.capacities.len() + 1], 0)
    }

    /// All states one legal move away from `state`, each one step later.
    ///
    /// Moves that would leave every fill unchanged are skipped, as are pours
    /// that would push the goal container past `u64::MAX`. The order is
    /// fixed: per pitcher fill, empty, pour into goal, draw from goal, then
    /// transfers to every other pitcher; emptying the goal comes last.
    pub fn propagate(&self, state: &State) -> Vec<Successor> {
        let fills = state.fills();
        let goal = state.goal_index();
        let mut successors = Vec::new();

        let mut push = |pour: Pour, change: &dyn Fn(&mut [u64])| {
            let next = state.successor(|f| change(f.as_mut_slice()));
            if next.fills() != fills {
                successors.push(Successor { pour, state: next });
            }
        };

        for (i, &capacity) in self.capacities.iter().enumerate() {
            push(Pour::Fill(i), &|f| f[i] = capacity);
            push(Pour::Empty(i), &|f| f[i] = 0);
            if fills[goal].checked_add(fills[i]).is_some() {
                push(Pour::PourIntoGoal(i), &|f| {
                    f[goal] += f[i];
                    f[i] = 0;
                });
            }
            push(Pour::DrawFromGoal(i), &|f| {
                let amount = f[goal].min(capacity - f[i]);
                f[goal] -= amount;
                f[i] += amount;
            });
            for (j, &to_capacity) in self.capacities.iter().enumerate() {
                if i == j {
                    continue;
                }
                push(Pour::Transfer { from: i, to: j }, &|f| {
                    let amount = f[i].min(to_capacity - f[j]);
                    f[i] -= amount;
                    f[j] += amount;
                });
            }
        }
        push(Pour::EmptyGoal, &|f| f[goal] = 0);

        successors
    }
}

//! Best-first search for generalized water pitcher puzzles.
//!
//! Given bounded pitchers and an unbounded goal container, this crate
//! searches for a short sequence of pours that leaves exactly the target
//! quantity in the goal container. The search can stop at the first
//! solution (naive mode) or keep pruning toward the shortest one (optimal
//! mode).

pub mod error;
pub mod frontier;
pub mod heuristic;
pub mod node;
pub mod normalize;
pub mod pour;
pub mod pruning;
pub mod puzzle;
pub mod solver;

// Re-export main types
pub use error::{Error, Result};
pub use heuristic::{Heuristic, HeuristicKind};
pub use node::{Node, NodeArena, NodeId, State};
pub use pour::{Pour, PourModel, Successor};
pub use pruning::{Incumbent, SearchMode};
pub use puzzle::{closest_capacity, closest_multiple, is_solvable, PuzzleConfig};
pub use solver::{solve, PathStep, Search, SearchStatus, Solution, SolverConfig, SolverResult};

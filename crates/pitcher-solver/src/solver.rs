//! Best-first search driver.
//!
//! The driver pops the cheapest open node, expands it through the pour
//! model, and routes each successor either to normalization (when it
//! touches the target) or to a dominance-checked insert. In optimal mode
//! each round ends by abandoning open nodes that can no longer beat the
//! best solution found so far.
//!
//! Everything the search touches is owned by one [`Search`] value. Memory
//! grows with the closed set for as long as the search runs; callers that
//! need a ceiling should set [`SolverConfig::max_expansions`] or
//! [`SolverConfig::timeout`].

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, info_span, trace};

use crate::error::{Error, Result};
use crate::frontier::Frontier;
use crate::heuristic::{Heuristic, HeuristicKind};
use crate::node::{Node, NodeArena, NodeId};
use crate::normalize::{is_goal, normalize};
use crate::pour::{Pour, PourModel, Successor};
use crate::pruning::{Incumbent, SearchMode};
use crate::puzzle::PuzzleConfig;

/// Configuration for the solver
#[derive(Debug, Clone, Default)]
pub struct SolverConfig {
    /// Naive stops at the first solution, optimal keeps pruning for a better one
    pub mode: SearchMode,
    /// Forces an estimator instead of the one the puzzle prefers
    pub heuristic: Option<HeuristicKind>,
    /// Maximum time to search
    pub timeout: Option<Duration>,
    /// Maximum number of node expansions
    pub max_expansions: Option<usize>,
}

/// Where the search driver stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchStatus {
    Running,
    /// A solution is recorded and nothing left can improve on it
    Succeeded,
    /// Open emptied without any solution
    Exhausted,
    /// A timeout or expansion budget stopped the search early
    Interrupted,
}

impl SearchStatus {
    pub fn is_terminal(self) -> bool {
        self != SearchStatus::Running
    }
}

/// One entry of a solution path
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStep {
    /// Move taken to get here (`None` for the starting state)
    #[serde(rename = "move")]
    pub pour: Option<Pour>,
    /// Fills after the move, goal container last
    pub fills: Vec<u64>,
}

/// A pour sequence ending with exactly the target in the goal container
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Solution {
    pub steps: u32,
    pub path: Vec<PathStep>,
}

impl Solution {
    /// Fills of the last state on the path
    pub fn final_fills(&self) -> &[u64] {
        self.path.last().map(|step| step.fills.as_slice()).unwrap_or(&[])
    }
}

/// Result of a solver run
#[derive(Debug, Clone)]
pub struct SolverResult {
    pub status: SearchStatus,
    /// Best solution found, if any
    pub solution: Option<Solution>,
    /// Estimator the run used
    pub heuristic: HeuristicKind,
    /// Number of nodes popped and expanded
    pub nodes_expanded: usize,
    /// Number of nodes ever created
    pub nodes_generated: usize,
    /// Size of the closed set at the end of the run
    pub closed_size: usize,
    /// Largest size the open set reached
    pub open_high_water: usize,
    /// Time elapsed in milliseconds
    pub time_elapsed_ms: u64,
}

impl SolverResult {
    /// The solution, or the reason there is none.
    pub fn into_solution(self) -> Result<Solution> {
        match (self.solution, self.status) {
            (Some(solution), _) => Ok(solution),
            (None, SearchStatus::Interrupted) => Err(Error::SearchInterrupted {
                nodes_expanded: self.nodes_expanded,
            }),
            (None, _) => Err(Error::SearchExhausted {
                nodes_expanded: self.nodes_expanded,
            }),
        }
    }
}

/// A single best-first search over one puzzle
#[derive(Debug)]
pub struct Search {
    target: u64,
    mode: SearchMode,
    model: PourModel,
    heuristic: Heuristic,
    arena: NodeArena,
    frontier: Frontier,
    incumbent: Incumbent,
    status: SearchStatus,
    nodes_expanded: usize,
}

impl Search {
    /// Set up a search, refusing puzzles whose target is unreachable.
    pub fn new(puzzle: &PuzzleConfig, mode: SearchMode, heuristic: HeuristicKind) -> Result<Self> {
        puzzle.ensure_solvable()?;

        let model = PourModel::new(puzzle);
        let heuristic = Heuristic::new(heuristic, puzzle);
        let mut search = Self {
            target: puzzle.target,
            mode,
            model,
            heuristic,
            arena: NodeArena::new(),
            frontier: Frontier::new(),
            incumbent: Incumbent::new(),
            status: SearchStatus::Running,
            nodes_expanded: 0,
        };

        let initial = search.model.initial_state();
        let h = search.heuristic.estimate(&initial);
        let root = Node::root(initial, h);
        if is_goal(root.state(), search.target) {
            let raw = search.arena.push(root);
            search.record_goal(raw);
            search.status = SearchStatus::Succeeded;
        } else {
            search.frontier.try_insert(&mut search.arena, root);
        }

        Ok(search)
    }

    pub fn status(&self) -> SearchStatus {
        self.status
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn nodes_expanded(&self) -> usize {
        self.nodes_expanded
    }

    /// Step count of the best solution so far
    pub fn lower_bound(&self) -> Option<u32> {
        self.incumbent.lower_bound()
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn arena(&self) -> &NodeArena {
        &self.arena
    }

    /// Run one expansion round and report where the search stands.
    pub fn step(&mut self) -> SearchStatus {
        if self.status.is_terminal() {
            return self.status;
        }

        let Some(id) = self.frontier.pop_min() else {
            self.finish();
            return self.status;
        };

        if self.frontier.is_superseded(&self.arena[id]) {
            trace!(node = id.index(), "skipping superseded node");
        } else {
            self.expand(id);
        }

        if self.mode.prunes_open() {
            if let Some(bound) = self.incumbent.lower_bound() {
                let displaced = self.frontier.close_stale(&self.arena, bound);
                if displaced > 0 {
                    debug!(displaced, bound, "pruned open nodes above the bound");
                }
            }
        }

        if !self.status.is_terminal() && self.frontier.is_open_empty() {
            self.finish();
        }
        self.status
    }

    fn expand(&mut self, id: NodeId) {
        self.nodes_expanded += 1;
        let parent = &self.arena[id];
        trace!(
            node = id.index(),
            g = parent.g(),
            f = parent.f(),
            fills = ?parent.state().fills(),
            "expanding"
        );

        let successors = self.model.propagate(parent.state());
        for Successor { pour, state } in successors {
            let h = self.heuristic.estimate(&state);
            let node = Node::child(state, id, pour, h);

            if is_goal(node.state(), self.target) {
                let raw = self.arena.push(node);
                self.record_goal(raw);
                if self.mode.stops_at_first_solution() {
                    self.status = SearchStatus::Succeeded;
                    break;
                }
                continue;
            }

            self.frontier.try_insert(&mut self.arena, node);
        }

        self.frontier.close(&self.arena, id);
    }

    fn record_goal(&mut self, raw: NodeId) {
        let canonical = normalize(
            &mut self.arena,
            &mut self.frontier,
            &self.heuristic,
            raw,
            self.target,
        );
        let steps = self.arena[canonical].g();
        if self.incumbent.offer(self.mode, canonical, steps) {
            debug!(steps, expanded = self.nodes_expanded, "new best solution");
        }
    }

    fn finish(&mut self) {
        self.status = if self.incumbent.is_set() {
            SearchStatus::Succeeded
        } else {
            SearchStatus::Exhausted
        };
    }

    /// Step until the search reaches a terminal state.
    pub fn run(&mut self) -> SearchStatus {
        self.run_bounded(None, None)
    }

    /// Step until a terminal state, the deadline, or the expansion budget.
    ///
    /// Budgets are checked before every step. Running out of budget leaves
    /// the search [`SearchStatus::Interrupted`]; any solution recorded up to
    /// that point is kept.
    pub fn run_bounded(
        &mut self,
        deadline: Option<Instant>,
        max_expansions: Option<usize>,
    ) -> SearchStatus {
        while !self.status.is_terminal() {
            let out_of_time = deadline.is_some_and(|d| Instant::now() >= d);
            let out_of_expansions = max_expansions.is_some_and(|max| self.nodes_expanded >= max);
            if out_of_time || out_of_expansions {
                debug!(
                    expanded = self.nodes_expanded,
                    out_of_time, out_of_expansions, "search budget spent"
                );
                self.status = SearchStatus::Interrupted;
                break;
            }
            self.step();
        }
        self.status
    }

    /// The best solution recorded so far, unwound from the arena.
    pub fn solution(&self) -> Option<Solution> {
        let id = self.incumbent.node()?;
        let path = self
            .arena
            .path_to(id)
            .into_iter()
            .map(|node| PathStep {
                pour: node.pour(),
                fills: node.state().fills().to_vec(),
            })
            .collect();
        Some(Solution {
            steps: self.arena[id].g(),
            path,
        })
    }
}

/// Solve a puzzle under `config`.
///
/// Fails with [`Error::InfeasiblePuzzle`] before any expansion when the
/// target cannot be reached. Running out of frontier or budget is not an
/// error here; it shows up in [`SolverResult::status`].
pub fn solve(puzzle: &PuzzleConfig, config: &SolverConfig) -> Result<SolverResult> {
    let start_time = Instant::now();
    let deadline = config.timeout.map(|timeout| start_time + timeout);
    let heuristic = config
        .heuristic
        .unwrap_or_else(|| puzzle.preferred_heuristic());

    let span = info_span!(
        "solve",
        capacities = ?puzzle.capacities,
        target = puzzle.target,
        mode = ?config.mode,
        heuristic = ?heuristic,
    );
    let _enter = span.enter();

    let mut search = Search::new(puzzle, config.mode, heuristic)?;
    let status = search.run_bounded(deadline, config.max_expansions);

    let result = SolverResult {
        status,
        solution: search.solution(),
        heuristic,
        nodes_expanded: search.nodes_expanded(),
        nodes_generated: search.arena().len(),
        closed_size: search.frontier().closed_len(),
        open_high_water: search.frontier().high_water(),
        time_elapsed_ms: start_time.elapsed().as_millis() as u64,
    };

    info!(
        status = ?result.status,
        steps = result.solution.as_ref().map(|s| s.steps),
        expanded = result.nodes_expanded,
        generated = result.nodes_generated,
        closed = result.closed_size,
        elapsed_ms = result.time_elapsed_ms,
        "search finished"
    );

    Ok(result)
}

//! Puzzle definition types and the arithmetic the solver relies on.
//!
//! A puzzle is a list of bounded pitcher capacities and a target quantity.
//! An unbounded goal container is always implied and never listed.
//!
//! Definitions are accepted in two shapes:
//!
//! ```text
//! {"capacities": [3, 5], "target": 4}
//! ```
//!
//! or the plain-text form, capacities on the first line and the target on
//! the second:
//!
//! ```text
//! 3,5
//! 4
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::heuristic::HeuristicKind;

/// The complete puzzle configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PuzzleConfig {
    /// Capacities of the bounded pitchers, in container order
    pub capacities: Vec<u64>,
    /// Quantity that must end up in the goal container
    pub target: u64,
    /// Estimator requested by the puzzle author, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heuristic: Option<HeuristicKind>,
}

impl PuzzleConfig {
    /// Build and validate a puzzle from raw parts.
    pub fn new(capacities: Vec<u64>, target: u64) -> Result<Self> {
        let puzzle = Self {
            capacities,
            target,
            heuristic: None,
        };
        puzzle.validate()?;
        Ok(puzzle)
    }

    /// Read a puzzle definition from disk.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents)
    }

    /// Parse a definition, picking JSON when the text starts with `{`.
    pub fn parse(input: &str) -> Result<Self> {
        let puzzle = if input.trim_start().starts_with('{') {
            serde_json::from_str::<PuzzleConfig>(input)?
        } else {
            Self::parse_text(input)?
        };
        puzzle.validate()?;
        Ok(puzzle)
    }

    fn parse_text(input: &str) -> Result<Self> {
        let mut lines = input.lines().map(str::trim).filter(|l| !l.is_empty());

        let capacity_line = lines
            .next()
            .ok_or_else(|| Error::malformed("missing capacity line"))?;
        let capacities = capacity_line
            .split(',')
            .map(|token| parse_quantity(token, "capacity"))
            .collect::<Result<Vec<_>>>()?;

        let target_line = lines
            .next()
            .ok_or_else(|| Error::malformed("missing target line"))?;
        let target = parse_quantity(target_line, "target")?;

        if let Some(extra) = lines.next() {
            return Err(Error::malformed(format!("unexpected trailing line '{extra}'")));
        }

        Ok(Self {
            capacities,
            target,
            heuristic: None,
        })
    }

    fn validate(&self) -> Result<()> {
        if self.capacities.is_empty() {
            return Err(Error::malformed("at least one pitcher capacity is required"));
        }
        if let Some(index) = self.capacities.iter().position(|&c| c == 0) {
            return Err(Error::malformed(format!("pitcher {index} has zero capacity")));
        }
        Ok(())
    }

    /// Largest bounded pitcher capacity
    pub fn max_capacity(&self) -> u64 {
        self.capacities.iter().copied().max().unwrap_or(0)
    }

    /// Whether the target can be reached at all
    pub fn is_solvable(&self) -> bool {
        is_solvable(&self.capacities, self.target)
    }

    /// Fail with [`Error::InfeasiblePuzzle`] when the target is unreachable.
    pub fn ensure_solvable(&self) -> Result<()> {
        if self.is_solvable() {
            return Ok(());
        }
        Err(Error::InfeasiblePuzzle {
            capacities: self.capacities.clone(),
            target: self.target,
            gcd: gcd_all(&self.capacities),
        })
    }

    /// Estimator to use when the caller does not force one.
    ///
    /// An explicit choice in the definition wins. Otherwise a target that
    /// fits in a single pitcher counts as a simple puzzle and gets the naive
    /// estimator; anything larger gets the analytic one.
    pub fn preferred_heuristic(&self) -> HeuristicKind {
        match self.heuristic {
            Some(kind) => kind,
            None if self.target <= self.max_capacity() => HeuristicKind::Naive,
            None => HeuristicKind::Analytic,
        }
    }
}

fn parse_quantity(token: &str, what: &str) -> Result<u64> {
    let token = token.trim();
    token
        .parse::<u64>()
        .map_err(|_| Error::malformed(format!("invalid {what} '{token}'")))
}

/// Greatest common divisor of two quantities
pub fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Greatest common divisor of every capacity (0 for an empty list)
pub fn gcd_all(capacities: &[u64]) -> u64 {
    capacities.iter().fold(0, |acc, &c| gcd(acc, c))
}

/// Returns true iff the target is a multiple of the gcd of all capacities.
///
/// Generalized Bezout: every quantity expressible as an integer combination
/// of the capacities is a multiple of their gcd, and every such multiple is
/// expressible.
pub fn is_solvable(capacities: &[u64], target: u64) -> bool {
    match gcd_all(capacities) {
        0 => target == 0,
        g => target % g == 0,
    }
}

/// The capacity closest to `target` and its index; the first one wins ties.
///
/// Returns `(0, 0)` for an empty list.
pub fn closest_capacity(capacities: &[u64], target: u64) -> (u64, usize) {
    let mut closest = (capacities.first().copied().unwrap_or(0), 0);
    let mut smallest_diff = closest.0.abs_diff(target);

    for (index, &capacity) in capacities.iter().enumerate() {
        let diff = capacity.abs_diff(target);
        if diff < smallest_diff {
            closest = (capacity, index);
            smallest_diff = diff;
        }
    }

    closest
}

/// Number of whole `capacity` pours closest to `target`.
///
/// Rounds half to even, so 5 / 2 gives 2 and 7 / 2 gives 4.
pub fn closest_multiple(capacity: u64, target: u64) -> u64 {
    if capacity == 0 {
        return 0;
    }
    let quotient = target / capacity;
    let remainder = target % capacity;
    match remainder.cmp(&(capacity - remainder)) {
        std::cmp::Ordering::Less => quotient,
        std::cmp::Ordering::Greater => quotient + 1,
        std::cmp::Ordering::Equal if quotient % 2 == 0 => quotient,
        std::cmp::Ordering::Equal => quotient + 1,
    }
}

//! Error types for the pitcher solver.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for the pitcher solver.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    #[error("puzzle has no solution: target {target} is not a multiple of gcd {gcd} of capacities {capacities:?}")]
    InfeasiblePuzzle {
        capacities: Vec<u64>,
        target: u64,
        gcd: u64,
    },

    #[error("search exhausted after {nodes_expanded} expansions without reaching the target")]
    SearchExhausted { nodes_expanded: usize },

    #[error("search interrupted after {nodes_expanded} expansions before any solution was found")]
    SearchInterrupted { nodes_expanded: usize },

    #[error("malformed puzzle definition: {message}")]
    MalformedInput { message: String },

    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid puzzle JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub(crate) fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

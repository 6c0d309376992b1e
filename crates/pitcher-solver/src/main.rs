//! CLI entry point for the pitcher solver.
//!
//! Usage:
//!   pitcher-solver solve <puzzle-file> [options]
//!   pitcher-solver solve --stdin [options]
//!
//! Options:
//!   --mode <naive|optimal>           Stop at the first solution or search for the shortest (default: naive)
//!   --heuristic <naive|analytic>     Force an estimator instead of the puzzle's choice
//!   --timeout <seconds>              Maximum search time
//!   --max-expansions <n>             Maximum node expansions
//!   --json                           Print the result as JSON
//!   -v, --verbose                    Raise log verbosity (repeatable)

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use pitcher_solver::{
    solve, Error, HeuristicKind, PathStep, PuzzleConfig, SearchMode, SearchStatus, SolverConfig,
    SolverResult,
};

#[derive(Parser)]
#[command(name = "pitcher-solver")]
#[command(about = "Best-first search for water pitcher puzzles")]
#[command(version)]
struct Cli {
    /// Raise log verbosity (-v debug, -vv trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Find a pour sequence that leaves the target in the goal container
    Solve {
        /// Path to the puzzle definition (JSON or plain text)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,

        /// Read the puzzle definition from stdin instead of a file
        #[arg(long)]
        stdin: bool,

        /// Stop at the first solution or keep searching for the shortest
        #[arg(long, value_enum, default_value_t = SearchMode::Naive)]
        mode: SearchMode,

        /// Estimator to use; defaults to the one the puzzle prefers
        #[arg(long, value_enum)]
        heuristic: Option<HeuristicKind>,

        /// Maximum search time in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Maximum number of node expansions
        #[arg(long)]
        max_expansions: Option<usize>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Output format for a solver run
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SolveOutput<'a> {
    status: SearchStatus,
    heuristic: HeuristicKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    steps: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<&'a [PathStep]>,
    nodes_expanded: usize,
    nodes_generated: usize,
    closed_size: usize,
    open_high_water: usize,
    time_elapsed_ms: u64,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Solve {
            file,
            stdin,
            mode,
            heuristic,
            timeout,
            max_expansions,
            json,
        } => {
            let config = SolverConfig {
                mode,
                heuristic,
                timeout: timeout.map(Duration::from_secs),
                max_expansions,
            };

            match run_solve(file, stdin, &config, json) {
                Ok(true) => ExitCode::SUCCESS,
                Ok(false) => ExitCode::FAILURE,
                Err(e) => {
                    eprintln!("Error: {e}");
                    ExitCode::FAILURE
                }
            }
        }
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Returns whether a solution was printed.
fn run_solve(
    file: Option<PathBuf>,
    stdin: bool,
    config: &SolverConfig,
    json: bool,
) -> Result<bool, Error> {
    let puzzle = if stdin {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .map_err(|source| Error::Io {
                path: PathBuf::from("<stdin>"),
                source,
            })?;
        PuzzleConfig::parse(&buffer)?
    } else if let Some(path) = file {
        PuzzleConfig::from_path(&path)?
    } else {
        return Err(Error::MalformedInput {
            message: "provide either a puzzle file path or --stdin".to_string(),
        });
    };

    let result = solve(&puzzle, config)?;
    let solved = result.solution.is_some();

    if json {
        let output = format_result(&result);
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print_text(&result);
    }

    Ok(solved)
}

fn format_result(result: &SolverResult) -> SolveOutput<'_> {
    SolveOutput {
        status: result.status,
        heuristic: result.heuristic,
        steps: result.solution.as_ref().map(|s| s.steps),
        path: result.solution.as_ref().map(|s| s.path.as_slice()),
        nodes_expanded: result.nodes_expanded,
        nodes_generated: result.nodes_generated,
        closed_size: result.closed_size,
        open_high_water: result.open_high_water,
        time_elapsed_ms: result.time_elapsed_ms,
    }
}

fn print_text(result: &SolverResult) {
    let Some(solution) = &result.solution else {
        match result.status {
            SearchStatus::Interrupted => println!(
                "No solution found before the search budget ran out ({} expansions)",
                result.nodes_expanded
            ),
            _ => println!("No solution found ({} expansions)", result.nodes_expanded),
        }
        return;
    };

    for step in &solution.path {
        match step.pour {
            Some(pour) => println!("{:?}  <- {pour}", step.fills),
            None => println!("{:?}", step.fills),
        }
    }
    if result.status == SearchStatus::Interrupted {
        println!("Search budget ran out; this is the best path found so far");
    }
    println!(
        "Path found takes: {} steps (That took {} ms)",
        solution.steps, result.time_elapsed_ms
    );
    println!(
        "Expanded {} nodes; closed set holds {}, open set peaked at {}",
        result.nodes_expanded, result.closed_size, result.open_high_water
    );
}

//! End-to-end runs from a puzzle definition on disk to a checked solution.

use std::fs;

use pitcher_solver::{
    solve, Error, HeuristicKind, PuzzleConfig, SearchMode, SearchStatus, SolverConfig,
};

fn write_puzzle(contents: &str, name: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn optimal() -> SolverConfig {
    SolverConfig {
        mode: SearchMode::Optimal,
        ..SolverConfig::default()
    }
}

#[test]
fn three_five_four_from_text_file() {
    let (_dir, path) = write_puzzle("3,5\n4\n", "puzzle.txt");
    let puzzle = PuzzleConfig::from_path(&path).unwrap();

    let result = solve(&puzzle, &optimal()).unwrap();
    assert_eq!(result.status, SearchStatus::Succeeded);
    assert_eq!(result.heuristic, HeuristicKind::Naive);

    let solution = result.into_solution().unwrap();
    assert_eq!(solution.steps, 7);
    assert_eq!(solution.path.len(), 8);
    assert_eq!(solution.final_fills().last(), Some(&4));
}

#[test]
fn json_definition_selects_its_heuristic() {
    let (_dir, path) = write_puzzle(
        r#"{"capacities": [3, 5], "target": 4, "heuristic": "analytic"}"#,
        "puzzle.json",
    );
    let puzzle = PuzzleConfig::from_path(&path).unwrap();

    let result = solve(&puzzle, &optimal()).unwrap();
    assert_eq!(result.heuristic, HeuristicKind::Analytic);
    assert_eq!(result.into_solution().unwrap().steps, 7);
}

#[test]
fn config_heuristic_overrides_puzzle() {
    let puzzle = PuzzleConfig::parse(r#"{"capacities": [3, 5], "target": 4, "heuristic": "analytic"}"#)
        .unwrap();
    let config = SolverConfig {
        heuristic: Some(HeuristicKind::Naive),
        ..optimal()
    };
    assert_eq!(solve(&puzzle, &config).unwrap().heuristic, HeuristicKind::Naive);
}

#[test]
fn infeasible_puzzle_is_refused() {
    let (_dir, path) = write_puzzle("2,10\n1\n", "puzzle.txt");
    let puzzle = PuzzleConfig::from_path(&path).unwrap();

    match solve(&puzzle, &optimal()) {
        Err(Error::InfeasiblePuzzle {
            capacities,
            target,
            gcd,
        }) => {
            assert_eq!(capacities, vec![2, 10]);
            assert_eq!(target, 1);
            assert_eq!(gcd, 2);
        }
        other => panic!("expected InfeasiblePuzzle, got {other:?}"),
    }
}

#[test]
fn large_target_uses_analytic_estimator() {
    let puzzle = PuzzleConfig::parse("2,5,6,72\n143\n").unwrap();
    let result = solve(&puzzle, &SolverConfig::default()).unwrap();

    assert_eq!(result.heuristic, HeuristicKind::Analytic);
    let solution = result.into_solution().unwrap();
    assert_eq!(solution.final_fills().last(), Some(&143));
    assert_eq!(solution.path.len(), solution.steps as usize + 1);
}

#[test]
fn capacities_near_u64_max_do_not_overflow() {
    let puzzle = PuzzleConfig::new(
        vec![9_000_000_000_000_000_000, 3_000_000_000_000_000_000],
        6_000_000_000_000_000_000,
    )
    .unwrap();

    let solution = solve(&puzzle, &optimal()).unwrap().into_solution().unwrap();
    assert_eq!(solution.steps, 3);
    assert_eq!(solution.final_fills().last(), Some(&6_000_000_000_000_000_000));

    let first = solve(&puzzle, &SolverConfig::default())
        .unwrap()
        .into_solution()
        .unwrap();
    assert_eq!(first.final_fills().last(), Some(&6_000_000_000_000_000_000));
    assert!(first.steps >= solution.steps);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = PuzzleConfig::from_path(dir.path().join("absent.txt")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }), "got {err:?}");
}

#[test]
fn malformed_file_is_reported() {
    let (_dir, path) = write_puzzle("three,five\n4\n", "puzzle.txt");
    let err = PuzzleConfig::from_path(&path).unwrap_err();
    assert!(matches!(err, Error::MalformedInput { .. }), "got {err:?}");
}

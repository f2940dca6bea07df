//! Checks that hold for every algorithm on many random grids.

use std::collections::HashSet;

use super::{
    SearchRun, Solver, StepResult,
    test_utils::{assert_valid_path, grid_from_rows, reference_distance},
};
use crate::{
    generators::{get_rng, scatter_walls},
    grid::{Cell, GridModel},
};

const SIZE: u16 = 9;

fn random_grid(seed: u64) -> GridModel {
    let mut grid = GridModel::new(SIZE);
    grid.set_start(Cell::new(0, 0)).unwrap();
    grid.set_end(Cell::new(SIZE - 1, SIZE - 1)).unwrap();
    scatter_walls(&mut grid, 0.35, &mut get_rng(Some(seed))).unwrap();
    grid
}

/// Every non-idle step of a run, up to and including the terminal one.
fn trace(solver: Solver, grid: &GridModel) -> Vec<StepResult> {
    let mut run = SearchRun::start(solver, grid).unwrap();
    let mut steps = Vec::new();
    let mut closed = 0;
    loop {
        let result = run.step(grid);
        let progress = run.progress();
        assert!(progress.closed >= closed, "closed set shrank");
        assert!(progress.closed <= usize::from(SIZE) * usize::from(SIZE));
        closed = progress.closed;
        if result == StepResult::Idle {
            continue;
        }
        let terminal = result.is_terminal();
        steps.push(result);
        if terminal {
            return steps;
        }
    }
}

#[test]
fn test_outcome_matches_reachability() {
    for seed in 0..40 {
        let grid = random_grid(seed);
        let distance = reference_distance(&grid);
        for solver in Solver::ALL {
            let steps = trace(solver, &grid);
            match (steps.last(), distance) {
                (Some(StepResult::Found(path)), Some(d)) => {
                    assert_valid_path(&grid, path);
                    if solver != Solver::Dfs && solver != Solver::GreedyBestFirst {
                        assert_eq!(path.len() - 1, d, "{solver} not shortest, seed {seed}");
                    } else {
                        assert!(path.len() - 1 >= d);
                    }
                }
                (Some(StepResult::Exhausted), None) => {}
                (last, _) => panic!("{solver} ended with {last:?} on seed {seed}"),
            }
        }
    }
}

#[test]
fn test_cells_are_explored_at_most_once() {
    for seed in 0..20 {
        let grid = random_grid(seed);
        for solver in Solver::ALL {
            let mut seen = HashSet::new();
            for step in trace(solver, &grid) {
                if let StepResult::Explored { cell, .. } = step {
                    assert!(grid.is_free(cell));
                    assert!(seen.insert(cell), "{solver} explored {cell} twice");
                }
            }
        }
    }
}

#[test]
fn test_astar_expands_no_more_than_bfs() {
    let expanded = |solver, grid: &GridModel| {
        let mut run = SearchRun::start(solver, grid).unwrap();
        run.finish(grid);
        run.progress().expanded
    };
    let mut compared = 0;
    for seed in 0..60 {
        let grid = random_grid(seed);
        if reference_distance(&grid).is_none() {
            continue;
        }
        let astar = expanded(Solver::AStar, &grid);
        let bfs = expanded(Solver::Bfs, &grid);
        assert!(astar <= bfs, "seed {seed}: A* expanded {astar}, BFS {bfs}");
        compared += 1;
    }
    assert!(compared > 0);
}

#[test]
fn test_same_grid_same_trace() {
    let grid = random_grid(3);
    for solver in Solver::ALL {
        assert_eq!(trace(solver, &grid), trace(solver, &grid));
    }
}

#[test]
fn test_wall_between_markers_exhausts_everyone() {
    let grid = grid_from_rows(&[
        "S.#..", //
        "..#..",
        "..#..",
        "..#..",
        "..#.E",
    ]);
    for solver in Solver::ALL {
        let steps = trace(solver, &grid);
        assert_eq!(steps.last(), Some(&StepResult::Exhausted), "{solver}");
        // The whole left side is explored before giving up
        assert_eq!(steps.len() - 1, 10, "{solver}");
    }
}

#[test]
fn test_adjacent_markers() {
    let grid = grid_from_rows(&[
        "SE.", //
        "...",
        "...",
    ]);
    for solver in Solver::ALL {
        let steps = trace(solver, &grid);
        assert_eq!(
            steps.last(),
            Some(&StepResult::Found(vec![Cell::new(0, 0), Cell::new(1, 0)])),
            "{solver}"
        );
    }
}

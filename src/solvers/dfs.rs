use super::{Progress, Search, Solver, StepResult, Traversal};
use crate::grid::{Cell, GridModel, neighbors};

/// Depth-first search over a LIFO stack.
///
/// Returns whichever path it stumbles on first. There is no length guarantee: on open
/// grids the path usually meanders far from the shortest one.
#[derive(Debug)]
pub struct Dfs {
    stack: Vec<Cell>,
    traversal: Traversal,
}

impl Dfs {
    pub fn new(start: Cell, end: Cell) -> Self {
        Dfs {
            stack: vec![start],
            traversal: Traversal::new(start, end),
        }
    }
}

impl Search for Dfs {
    fn step(&mut self, grid: &GridModel) -> StepResult {
        let Some(current) = self.stack.pop() else {
            return StepResult::Exhausted;
        };
        if current == self.traversal.end {
            return self.traversal.found();
        }
        if !self.traversal.close(current) {
            return StepResult::Idle;
        }
        for neighbor in neighbors(current, grid) {
            if self.traversal.discover(neighbor, current) {
                self.stack.push(neighbor);
            }
        }
        self.traversal.explored(current, Solver::Dfs)
    }

    fn progress(&self) -> Progress {
        self.traversal.progress()
    }
}

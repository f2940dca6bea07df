use std::collections::VecDeque;

use super::{Progress, Search, Solver, StepResult, Traversal};
use crate::grid::{Cell, GridModel, neighbors};

/// Breadth-first search over a FIFO queue. Returns a path with the fewest moves.
#[derive(Debug)]
pub struct Bfs {
    queue: VecDeque<Cell>,
    traversal: Traversal,
}

impl Bfs {
    pub fn new(start: Cell, end: Cell) -> Self {
        Bfs {
            queue: VecDeque::from([start]),
            traversal: Traversal::new(start, end),
        }
    }
}

impl Search for Bfs {
    fn step(&mut self, grid: &GridModel) -> StepResult {
        let Some(current) = self.queue.pop_front() else {
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
                self.queue.push_back(neighbor);
            }
        }
        self.traversal.explored(current, Solver::Bfs)
    }

    fn progress(&self) -> Progress {
        self.traversal.progress()
    }
}

use super::{Progress, Search, Solver, StepResult, Traversal, frontier::IndexedQueue};
use crate::grid::{Cell, GridModel, neighbors};

/// Greedy best-first search: always expands the queued cell that looks closest to the
/// goal by Manhattan distance, ignoring how far it is from the start.
///
/// Fast on open grids, but the path it returns can be far from the shortest. A cell is
/// queued at most once and never re-scored.
#[derive(Debug)]
pub struct GreedyBestFirst {
    frontier: IndexedQueue<u32>,
    traversal: Traversal,
}

impl GreedyBestFirst {
    pub fn new(start: Cell, end: Cell) -> Self {
        let mut frontier = IndexedQueue::new();
        frontier.insert(start, start.manhattan(end));
        GreedyBestFirst {
            frontier,
            traversal: Traversal::new(start, end),
        }
    }
}

impl Search for GreedyBestFirst {
    fn step(&mut self, grid: &GridModel) -> StepResult {
        let Some((_, current)) = self.frontier.pop() else {
            return StepResult::Exhausted;
        };
        if current == self.traversal.end {
            return self.traversal.found();
        }
        if !self.traversal.close(current) {
            return StepResult::Idle;
        }
        let end = self.traversal.end;
        for neighbor in neighbors(current, grid) {
            if self.traversal.is_closed(neighbor) || self.frontier.contains(neighbor) {
                continue;
            }
            if self.traversal.discover(neighbor, current) {
                self.frontier.insert(neighbor, neighbor.manhattan(end));
            }
        }
        self.traversal.explored(current, Solver::GreedyBestFirst)
    }

    fn progress(&self) -> Progress {
        self.traversal.progress()
    }
}

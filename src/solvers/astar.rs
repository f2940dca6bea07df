use std::collections::HashMap;

use super::{
    Progress, Search, Solver, StepCost, StepResult, Traversal, frontier::IndexedQueue,
    uniform_cost,
};
use crate::grid::{Cell, GridModel, neighbors};

/// A* with the Manhattan distance heuristic.
///
/// The frontier is keyed by `(f, h)`: among cells with equal `f`, the one closer to the
/// goal goes first. Finding a cheaper route to a queued cell re-keys its existing entry
/// instead of queueing a duplicate.
///
/// The heuristic never overestimates with [`uniform_cost`] on a 4-connected grid, so the
/// returned path is a shortest one.
#[derive(Debug)]
pub struct AStar {
    frontier: IndexedQueue<(u32, u32)>,
    g_score: HashMap<Cell, u32>,
    cost: StepCost,
    traversal: Traversal,
}

impl AStar {
    pub fn new(start: Cell, end: Cell) -> Self {
        AStar::with_cost(start, end, uniform_cost)
    }

    /// `cost` must never be less than 1 per move, or the heuristic stops being
    /// admissible and the path may not be the shortest.
    pub fn with_cost(start: Cell, end: Cell, cost: StepCost) -> Self {
        let h = start.manhattan(end);
        let mut frontier = IndexedQueue::new();
        frontier.insert(start, (h, h));
        AStar {
            frontier,
            g_score: HashMap::from([(start, 0)]),
            cost,
            traversal: Traversal::new(start, end),
        }
    }
}

impl Search for AStar {
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
        let current_g = self.g_score.get(&current).copied().unwrap_or_default();
        for neighbor in neighbors(current, grid) {
            if self.traversal.is_closed(neighbor) {
                continue;
            }
            let tentative_g = current_g + (self.cost)(current, neighbor);
            let is_better = self
                .g_score
                .get(&neighbor)
                .is_none_or(|&known| tentative_g < known);
            if !is_better {
                continue;
            }
            self.g_score.insert(neighbor, tentative_g);
            self.traversal.relink(neighbor, current);
            let h = neighbor.manhattan(end);
            self.frontier.upsert(neighbor, (tentative_g + h, h));
        }
        self.traversal.explored(current, Solver::AStar)
    }

    fn progress(&self) -> Progress {
        self.traversal.progress()
    }
}

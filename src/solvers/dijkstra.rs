use std::collections::HashMap;

use super::{
    Progress, Search, Solver, StepCost, StepResult, Traversal, frontier::LazyHeap, uniform_cost,
};
use crate::grid::{Cell, GridModel, neighbors};

/// Dijkstra's algorithm with lazy deletion.
///
/// Improving a cell's distance pushes a fresh heap entry and leaves the old one behind.
/// The leftover entries are recognised when popped, because by then their cell has been
/// closed through the cheaper entry, and are skipped as [`StepResult::Idle`].
#[derive(Debug)]
pub struct Dijkstra {
    frontier: LazyHeap<u32>,
    distances: HashMap<Cell, u32>,
    cost: StepCost,
    traversal: Traversal,
}

impl Dijkstra {
    pub fn new(start: Cell, end: Cell) -> Self {
        Dijkstra::with_cost(start, end, uniform_cost)
    }

    pub fn with_cost(start: Cell, end: Cell, cost: StepCost) -> Self {
        let mut frontier = LazyHeap::new();
        frontier.push(0, start);
        Dijkstra {
            frontier,
            distances: HashMap::from([(start, 0)]),
            cost,
            traversal: Traversal::new(start, end),
        }
    }
}

impl Search for Dijkstra {
    fn step(&mut self, grid: &GridModel) -> StepResult {
        let Some((distance, current)) = self.frontier.pop() else {
            return StepResult::Exhausted;
        };
        if self.traversal.is_closed(current) {
            return StepResult::Idle;
        }
        if current == self.traversal.end {
            return self.traversal.found();
        }
        self.traversal.close(current);

        for neighbor in neighbors(current, grid) {
            let tentative = distance + (self.cost)(current, neighbor);
            let is_cheaper = match self.distances.get(&neighbor) {
                Some(&known) => tentative < known,
                None => true,
            };
            if is_cheaper {
                self.distances.insert(neighbor, tentative);
                self.traversal.relink(neighbor, current);
                self.frontier.push(tentative, neighbor);
            }
        }
        self.traversal.explored(current, Solver::Dijkstra)
    }

    fn progress(&self) -> Progress {
        self.traversal.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::test_utils::{assert_valid_path, grid_from_rows, reference_distance};

    fn finish(dijkstra: &mut Dijkstra, grid: &GridModel) -> (StepResult, usize) {
        let mut idle = 0;
        loop {
            match dijkstra.step(grid) {
                StepResult::Idle => idle += 1,
                StepResult::Explored { .. } => {}
                terminal => return (terminal, idle),
            }
        }
    }

    #[test]
    fn test_shortest_path() {
        let grid = grid_from_rows(&[
            "S....", //
            "####.", //
            "...#.", //
            ".#...", //
            "E#.#.",
        ]);
        let mut dijkstra = Dijkstra::new(grid.start().unwrap(), grid.end().unwrap());
        let (result, _) = finish(&mut dijkstra, &grid);
        let StepResult::Found(path) = result else {
            panic!("expected a path");
        };
        assert_valid_path(&grid, &path);
        assert_eq!(Some(path.len() - 1), reference_distance(&grid));
    }

    /// Makes moves along row 0 expensive, so the detour through row 1 wins.
    fn toll_on_top_row(from: Cell, to: Cell) -> u32 {
        if from.y == 0 && to.y == 0 { 5 } else { 1 }
    }

    #[test]
    fn test_custom_cost_and_stale_entries() {
        let grid = grid_from_rows(&["S..E", "....", "####", "####"]);
        let mut dijkstra =
            Dijkstra::with_cost(grid.start().unwrap(), grid.end().unwrap(), toll_on_top_row);
        let (result, idle) = finish(&mut dijkstra, &grid);
        assert_eq!(
            result,
            StepResult::Found(vec![
                Cell::new(0, 0),
                Cell::new(0, 1),
                Cell::new(1, 1),
                Cell::new(2, 1),
                Cell::new(3, 1),
                Cell::new(3, 0),
            ])
        );
        // (1, 0) was first reached at cost 5 and later improved to 3 via (1, 1),
        // leaving a stale entry behind that has to be skipped
        assert!(idle >= 1);
        let progress = dijkstra.progress();
        assert_eq!(progress.closed, progress.expanded);
    }

    #[test]
    fn test_exhausted() {
        let grid = grid_from_rows(&["S#.", "##.", "..E"]);
        let mut dijkstra = Dijkstra::new(grid.start().unwrap(), grid.end().unwrap());
        let (result, _) = finish(&mut dijkstra, &grid);
        assert_eq!(result, StepResult::Exhausted);
        assert_eq!(dijkstra.progress().closed, 1);
    }
}

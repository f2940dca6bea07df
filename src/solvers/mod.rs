//! Stepwise grid searches.
//!
//! Every algorithm is an explicit state machine advanced one node expansion at a time by
//! [`SearchRun::step`]. Nothing runs to completion on its own: the caller decides when
//! (and whether) to take the next step.

mod astar;
mod bfs;
mod dfs;
mod dijkstra;
mod frontier;
mod greedy;
pub mod path;
#[cfg(test)]
mod properties;

use std::collections::{HashMap, HashSet};

use crossterm::style::Color;

pub use astar::AStar;
pub use bfs::Bfs;
pub use dfs::Dfs;
pub use dijkstra::Dijkstra;
pub use greedy::GreedyBestFirst;

use crate::{
    error::EngineError,
    grid::{Cell, GridModel},
};

/// Cost of moving between two adjacent cells.
pub type StepCost = fn(Cell, Cell) -> u32;

/// Every move costs the same. The Manhattan heuristic is admissible only for this cost
/// model; a different one needs a different heuristic for A* to stay optimal.
pub fn uniform_cost(_from: Cell, _to: Cell) -> u32 {
    1
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Solver {
    Bfs,
    Dfs,
    Dijkstra,
    GreedyBestFirst,
    AStar,
}

impl Solver {
    pub const ALL: [Solver; 5] = [
        Solver::Bfs,
        Solver::Dfs,
        Solver::Dijkstra,
        Solver::GreedyBestFirst,
        Solver::AStar,
    ];

    /// Tint used by renderers for cells this algorithm has explored.
    pub fn color(self) -> Color {
        match self {
            Solver::Bfs => Color::Green,
            Solver::Dfs => Color::Blue,
            Solver::Dijkstra => Color::Cyan,
            Solver::GreedyBestFirst => Color::Magenta,
            Solver::AStar => Color::Rgb {
                r: 255,
                g: 165,
                b: 0,
            },
        }
    }
}

impl std::fmt::Display for Solver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Solver::Bfs => write!(f, "Breadth-First Search (BFS)"),
            Solver::Dfs => write!(f, "Depth-First Search (DFS)"),
            Solver::Dijkstra => write!(f, "Dijkstra's Algorithm"),
            Solver::GreedyBestFirst => write!(f, "Greedy Best-First Search"),
            Solver::AStar => write!(f, "A* Search"),
        }
    }
}

/// Outcome of a single search step.
#[derive(Debug, Clone, PartialEq)]
pub enum StepResult {
    /// A cell was taken off the frontier and expanded. Never the goal.
    Explored { cell: Cell, color: Color },
    /// The goal was taken off the frontier. Holds the path from start to goal.
    Found(Vec<Cell>),
    /// The frontier ran dry before reaching the goal.
    Exhausted,
    /// A stale or duplicate frontier entry was skipped. Step again right away.
    Idle,
}

impl StepResult {
    pub fn is_terminal(&self) -> bool {
        matches!(self, StepResult::Found(_) | StepResult::Exhausted)
    }
}

/// Counters a run exposes between steps.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Size of the closed set.
    pub closed: usize,
    /// Number of `Explored` results emitted so far.
    pub expanded: usize,
}

/// A single algorithm's state machine.
pub trait Search {
    /// Advances the search by exactly one frontier pop.
    fn step(&mut self, grid: &GridModel) -> StepResult;

    fn progress(&self) -> Progress;
}

/// State common to every search: the closed set and the parent links.
#[derive(Debug)]
struct Traversal {
    start: Cell,
    end: Cell,
    closed: HashSet<Cell>,
    parents: HashMap<Cell, Cell>,
    expanded: usize,
}

impl Traversal {
    fn new(start: Cell, end: Cell) -> Self {
        Traversal {
            start,
            end,
            closed: HashSet::new(),
            parents: HashMap::new(),
            expanded: 0,
        }
    }

    fn is_closed(&self, cell: Cell) -> bool {
        self.closed.contains(&cell)
    }

    /// Returns `false` if the cell was already closed.
    fn close(&mut self, cell: Cell) -> bool {
        self.closed.insert(cell)
    }

    /// Records `parent` for a cell seen for the first time. Returns `false` if the cell
    /// is the start, closed, or already has a parent.
    fn discover(&mut self, cell: Cell, parent: Cell) -> bool {
        if cell == self.start || self.is_closed(cell) || self.parents.contains_key(&cell) {
            return false;
        }
        self.parents.insert(cell, parent);
        true
    }

    /// Unconditionally points a cell at a new parent.
    fn relink(&mut self, cell: Cell, parent: Cell) {
        self.parents.insert(cell, parent);
    }

    fn explored(&mut self, cell: Cell, solver: Solver) -> StepResult {
        self.expanded += 1;
        StepResult::Explored {
            cell,
            color: solver.color(),
        }
    }

    fn found(&self) -> StepResult {
        match path::reconstruct(&self.parents, self.start, self.end) {
            Some(path) => StepResult::Found(path),
            None => {
                tracing::warn!(end = %self.end, "goal popped without a parent chain to start");
                StepResult::Exhausted
            }
        }
    }

    fn progress(&self) -> Progress {
        Progress {
            closed: self.closed.len(),
            expanded: self.expanded,
        }
    }
}

/// Handle to one in-flight search.
///
/// Terminal results are sticky: once a run has produced `Found` or `Exhausted`, further
/// steps return the same result and leave the state untouched.
pub struct SearchRun {
    solver: Solver,
    search: Box<dyn Search + Send>,
    outcome: Option<StepResult>,
}

impl SearchRun {
    /// Sets up a fresh run on the grid's current start and end markers.
    pub fn start(solver: Solver, grid: &GridModel) -> Result<Self, EngineError> {
        let (Some(start), Some(end)) = (grid.start(), grid.end()) else {
            return Err(EngineError::NotConfigured);
        };
        let search: Box<dyn Search + Send> = match solver {
            Solver::Bfs => Box::new(Bfs::new(start, end)),
            Solver::Dfs => Box::new(Dfs::new(start, end)),
            Solver::Dijkstra => Box::new(Dijkstra::new(start, end)),
            Solver::GreedyBestFirst => Box::new(GreedyBestFirst::new(start, end)),
            Solver::AStar => Box::new(AStar::new(start, end)),
        };
        tracing::debug!(%solver, %start, %end, "search started");
        Ok(SearchRun {
            solver,
            search,
            outcome: None,
        })
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_some()
    }

    pub fn progress(&self) -> Progress {
        self.search.progress()
    }

    pub fn step(&mut self, grid: &GridModel) -> StepResult {
        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }
        let result = self.search.step(grid);
        if result.is_terminal() {
            let progress = self.search.progress();
            match &result {
                StepResult::Found(path) => tracing::debug!(
                    solver = %self.solver,
                    expanded = progress.expanded,
                    path_len = path.len(),
                    "goal reached"
                ),
                _ => tracing::debug!(
                    solver = %self.solver,
                    expanded = progress.expanded,
                    "frontier exhausted"
                ),
            }
            self.outcome = Some(result.clone());
        }
        result
    }

    /// Steps until a terminal result, for callers that do not animate.
    pub fn finish(&mut self, grid: &GridModel) -> StepResult {
        loop {
            let result = self.step(grid);
            if result.is_terminal() {
                return result;
            }
        }
    }
}

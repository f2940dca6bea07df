use rand::Rng;

use crate::{
    error::EngineError,
    grid::{Cell, CellState, GridModel},
};

/// Cell every maze is carved from.
pub const MAZE_ORIGIN: Cell = Cell::new(1, 1);

/// Outcome of a single carving step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MazeStep {
    /// `cell` and the `wall` between it and the previous cell were opened up.
    Carved { cell: Cell, wall: Cell },
    /// The cell had no uncarved neighbors left and was dropped from the stack.
    Backtracked(Cell),
    /// Every reachable lattice cell has been carved.
    Done,
}

impl MazeStep {
    pub fn is_terminal(&self) -> bool {
        matches!(self, MazeStep::Done)
    }
}

/// Randomized depth-first maze carving, one step at a time.
///
/// Rooms live on odd coordinates, walls on even ones. The outer ring stays blocked. The
/// result is a perfect maze: every room is connected to every other room by exactly one
/// simple path.
pub struct MazeGenerator<R> {
    stack: Vec<Cell>,
    rng: R,
    carved: usize,
}

impl<R: Rng> MazeGenerator<R> {
    /// Blocks the whole grid, clears the markers, and opens the origin room.
    pub fn start(grid: &mut GridModel, rng: R) -> Result<Self, EngineError> {
        if grid.size() < 3 {
            return Err(EngineError::GridTooSmall { size: grid.size() });
        }
        grid.fill(CellState::Blocked);
        grid.drop_markers();
        grid.put(MAZE_ORIGIN, CellState::Free);
        tracing::debug!(size = grid.size(), "maze generation started");
        Ok(MazeGenerator {
            stack: vec![MAZE_ORIGIN],
            rng,
            carved: 1,
        })
    }

    /// Number of rooms opened so far, the origin included.
    pub fn carved(&self) -> usize {
        self.carved
    }

    pub fn step(&mut self, grid: &mut GridModel) -> MazeStep {
        let Some(&current) = self.stack.last() else {
            // Any markers set before the run are meaningless on the new layout
            grid.drop_markers();
            return MazeStep::Done;
        };

        let neighbors = unvisited_neighbors(current, grid);
        if neighbors.is_empty() {
            self.stack.pop();
            if self.stack.is_empty() {
                tracing::debug!(rooms = self.carved, "maze generation finished");
            }
            return MazeStep::Backtracked(current);
        }

        let (cell, wall) = neighbors[self.rng.random_range(0..neighbors.len())];
        grid.put(wall, CellState::Free);
        grid.put(cell, CellState::Free);
        self.carved += 1;
        // Keep the current cell underneath so its other neighbors get a turn after backtracking
        self.stack.push(cell);
        MazeStep::Carved { cell, wall }
    }
}

/// Get uncarved neighbors of a room together with the wall in between.
/// A neighbor is a cell two steps away in the order right, left, down, up. It counts as
/// uncarved if it is still blocked and strictly inside the outer ring.
fn unvisited_neighbors(cell: Cell, grid: &GridModel) -> Vec<(Cell, Cell)> {
    let Cell { x, y } = cell;
    let size = grid.size();
    let is_interior = |c: Cell| c.x > 0 && c.y > 0 && c.x < size - 1 && c.y < size - 1;

    [
        x.checked_add(2)
            .map(|nx| (Cell::new(nx, y), Cell::new(x + 1, y))),
        x.checked_sub(2)
            .map(|nx| (Cell::new(nx, y), Cell::new(x - 1, y))),
        y.checked_add(2)
            .map(|ny| (Cell::new(x, ny), Cell::new(x, y + 1))),
        y.checked_sub(2)
            .map(|ny| (Cell::new(x, ny), Cell::new(x, y - 1))),
    ]
    .into_iter()
    .flatten()
    .filter(|&(c, _)| is_interior(c) && grid[c] == CellState::Blocked)
    .collect()
}

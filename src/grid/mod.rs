pub mod cell;

pub use cell::{Cell, CellState, Glyph};

use crate::error::GridError;

/// Square occupancy grid with optional start and end markers.
///
/// The grid is the only state shared between a run and the outside world. While a run
/// holds the lock, every public edit is refused with [`GridError::Locked`]; the engine
/// itself writes through the crate-private methods.
#[derive(Debug, Clone, PartialEq)]
pub struct GridModel {
    data: Box<[CellState]>,
    size: u16,
    start: Option<Cell>,
    end: Option<Cell>,
    locked: bool,
}

impl GridModel {
    /// Creates a `size`x`size` grid with every cell free and no markers.
    pub fn new(size: u16) -> Self {
        GridModel::filled(size, CellState::Free)
    }

    /// Creates a `size`x`size` grid with every cell set to `state`.
    pub fn filled(size: u16, state: CellState) -> Self {
        let data = vec![state; size as usize * size as usize].into_boxed_slice();
        GridModel {
            data,
            size,
            start: None,
            end: None,
            locked: false,
        }
    }

    /// Side length of the grid.
    pub fn size(&self) -> u16 {
        self.size
    }

    pub fn start(&self) -> Option<Cell> {
        self.start
    }

    pub fn end(&self) -> Option<Cell> {
        self.end
    }

    /// Whether an active run currently owns the grid.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Checks if the given cell is within the bounds of the grid.
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x < self.size && cell.y < self.size
    }

    /// State of the cell, or `None` when out of bounds.
    pub fn get(&self, cell: Cell) -> Option<CellState> {
        self.contains(cell).then(|| self.data[self.ravel_index(cell)])
    }

    /// Out-of-bounds cells count as not free.
    pub fn is_free(&self, cell: Cell) -> bool {
        self.get(cell) == Some(CellState::Free)
    }

    /// Iterates over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + use<> {
        let size = self.size;
        (0..size).flat_map(move |y| (0..size).map(move |x| Cell::new(x, y)))
    }

    fn ravel_index(&self, cell: Cell) -> usize {
        // Overflow-safe since size is u16 (assuming usize is at least 32 bits)
        cell.y as usize * self.size as usize + cell.x as usize
    }

    fn check_edit(&self, cell: Cell) -> Result<(), GridError> {
        if self.locked {
            return Err(GridError::Locked);
        }
        if !self.contains(cell) {
            return Err(GridError::OutOfBounds {
                x: cell.x,
                y: cell.y,
            });
        }
        Ok(())
    }

    fn is_marker(&self, cell: Cell) -> bool {
        self.start == Some(cell) || self.end == Some(cell)
    }

    /// Sets the state of a single cell. Markers can only sit on free cells, so blocking
    /// a marker cell is refused.
    pub fn set_state(&mut self, cell: Cell, state: CellState) -> Result<(), GridError> {
        self.check_edit(cell)?;
        if state == CellState::Blocked && self.is_marker(cell) {
            return Err(GridError::Occupied(cell));
        }
        let idx = self.ravel_index(cell);
        self.data[idx] = state;
        Ok(())
    }

    /// Flips a cell between free and blocked, returning the new state.
    pub fn toggle(&mut self, cell: Cell) -> Result<CellState, GridError> {
        self.check_edit(cell)?;
        let state = self[cell].toggled();
        self.set_state(cell, state)?;
        Ok(state)
    }

    pub fn set_start(&mut self, cell: Cell) -> Result<(), GridError> {
        self.check_marker(cell, self.end)?;
        self.start = Some(cell);
        Ok(())
    }

    pub fn set_end(&mut self, cell: Cell) -> Result<(), GridError> {
        self.check_marker(cell, self.start)?;
        self.end = Some(cell);
        Ok(())
    }

    fn check_marker(&self, cell: Cell, other: Option<Cell>) -> Result<(), GridError> {
        self.check_edit(cell)?;
        if self[cell] == CellState::Blocked {
            return Err(GridError::Blocked(cell));
        }
        if other == Some(cell) {
            return Err(GridError::Occupied(cell));
        }
        Ok(())
    }

    /// Removes both markers.
    pub fn clear_markers(&mut self) -> Result<(), GridError> {
        if self.locked {
            return Err(GridError::Locked);
        }
        self.start = None;
        self.end = None;
        Ok(())
    }

    /// Frees every cell and removes both markers.
    pub fn reset(&mut self) -> Result<(), GridError> {
        if self.locked {
            return Err(GridError::Locked);
        }
        self.fill(CellState::Free);
        self.start = None;
        self.end = None;
        Ok(())
    }

    pub(crate) fn lock(&mut self) {
        self.locked = true;
    }

    pub(crate) fn unlock(&mut self) {
        self.locked = false;
    }

    /// Engine-side write that ignores the lock. Out-of-bounds cells are ignored.
    pub(crate) fn put(&mut self, cell: Cell, state: CellState) {
        if self.contains(cell) {
            let idx = self.ravel_index(cell);
            self.data[idx] = state;
        }
    }

    pub(crate) fn fill(&mut self, state: CellState) {
        self.data.iter_mut().for_each(|c| *c = state);
    }

    pub(crate) fn drop_markers(&mut self) {
        self.start = None;
        self.end = None;
    }
}

impl std::ops::Index<Cell> for GridModel {
    type Output = CellState;

    fn index(&self, cell: Cell) -> &Self::Output {
        &self.data[self.ravel_index(cell)]
    }
}

/// Get the free neighbors of a cell.
/// A neighbor is a cell one step away in the cardinal directions, yielded in the fixed
/// order left, right, up, down. Exploration order of every search depends on it.
pub fn neighbors(cell: Cell, grid: &GridModel) -> impl Iterator<Item = Cell> + '_ {
    let Cell { x, y } = cell;
    [
        // NOTE: When x or y is 0, wrap to u16::MAX, which is never in bounds since the
        // largest index is size - 1 <= u16::MAX - 1. Saturating at u16::MAX on the other
        // side lands out of bounds the same way.
        (x.wrapping_sub(1), y),
        (x.saturating_add(1), y),
        (x, y.wrapping_sub(1)),
        (x, y.saturating_add(1)),
    ]
    .into_iter()
    .map(Cell::from)
    .filter(move |&c| c != cell && grid.is_free(c))
}

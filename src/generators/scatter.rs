use rand::Rng;

use crate::{
    error::GridError,
    grid::{Cell, CellState, GridModel},
};

/// Blocks each free, unmarked cell with probability `density`. Returns how many cells
/// were blocked.
///
/// This goes through the public edit path, so it fails with [`GridError::Locked`] while
/// a run owns the grid.
pub fn scatter_walls<R: Rng>(
    grid: &mut GridModel,
    density: f64,
    rng: &mut R,
) -> Result<usize, GridError> {
    if grid.is_locked() {
        return Err(GridError::Locked);
    }
    let density = density.clamp(0.0, 1.0);
    let mut blocked = 0;
    for cell in grid.cells() {
        if !is_open(grid, cell) {
            continue;
        }
        if rng.random_bool(density) {
            grid.set_state(cell, CellState::Blocked)?;
            blocked += 1;
        }
    }
    tracing::debug!(blocked, density, "scattered walls");
    Ok(blocked)
}

fn is_open(grid: &GridModel, cell: Cell) -> bool {
    grid.is_free(cell) && grid.start() != Some(cell) && grid.end() != Some(cell)
}

/// First free cell without a marker, in row-major order.
pub fn first_free_cell(grid: &GridModel) -> Option<Cell> {
    grid.cells().find(|&c| is_open(grid, c))
}

/// Last free cell without a marker, in row-major order.
pub fn last_free_cell(grid: &GridModel) -> Option<Cell> {
    grid.cells().filter(|&c| is_open(grid, c)).last()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::get_rng;

    #[test]
    fn test_scatter_spares_markers() {
        let mut grid = GridModel::new(10);
        grid.set_start(Cell::new(0, 0)).unwrap();
        grid.set_end(Cell::new(9, 9)).unwrap();
        let blocked = scatter_walls(&mut grid, 1.0, &mut get_rng(Some(1))).unwrap();
        assert_eq!(blocked, 98);
        assert!(grid.is_free(Cell::new(0, 0)));
        assert!(grid.is_free(Cell::new(9, 9)));
    }

    #[test]
    fn test_scatter_density_zero() {
        let mut grid = GridModel::new(6);
        assert_eq!(scatter_walls(&mut grid, 0.0, &mut get_rng(Some(1))), Ok(0));
        assert_eq!(grid, GridModel::new(6));
    }

    #[test]
    fn test_free_cell_lookup() {
        let mut grid = GridModel::new(3);
        grid.set_state(Cell::new(0, 0), CellState::Blocked).unwrap();
        grid.set_state(Cell::new(2, 2), CellState::Blocked).unwrap();
        assert_eq!(first_free_cell(&grid), Some(Cell::new(1, 0)));
        assert_eq!(last_free_cell(&grid), Some(Cell::new(1, 2)));
        assert_eq!(first_free_cell(&GridModel::filled(3, CellState::Blocked)), None);

        grid.set_start(Cell::new(1, 0)).unwrap();
        assert_eq!(first_free_cell(&grid), Some(Cell::new(2, 0)));
    }
}

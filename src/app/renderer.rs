use std::io::Write;

use crossterm::{
    cursor, queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use unicode_truncate::UnicodeTruncateStr;

use crate::{
    generators::MazeStep,
    grid::{Cell, GridModel, Glyph},
    session::SessionStep,
    solvers::StepResult,
};

/// Draws a grid and the steps of a run onto a terminal-like writer.
///
/// Each grid cell takes [`Glyph::CELL_WIDTH`] columns. The rows below the grid hold
/// status messages.
pub struct Renderer<W: Write> {
    out: W,
    /// Grid side length, needed to place the status rows
    grid_size: u16,
    /// Usable terminal width for status messages, in columns
    status_width: u16,
}

impl<W: Write> Renderer<W> {
    /// Number of terminal rows reserved below the grid.
    pub const STATUS_ROWS: u16 = 2;

    pub fn new(out: W, grid_size: u16, status_width: u16) -> Self {
        Self {
            out,
            grid_size,
            status_width,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn glyph_at(grid: &GridModel, cell: Cell) -> Glyph {
        if grid.start() == Some(cell) {
            Glyph::Start
        } else if grid.end() == Some(cell) {
            Glyph::End
        } else {
            Glyph::from(grid[cell])
        }
    }

    fn queue_glyph(&mut self, cell: Cell, glyph: Glyph) -> std::io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(cell.x * Glyph::CELL_WIDTH, cell.y),
            style::Print(glyph)
        )
    }

    /// Clears the screen and draws every cell of the grid.
    pub fn draw_grid(&mut self, grid: &GridModel) -> std::io::Result<()> {
        self.grid_size = grid.size();
        queue!(self.out, terminal::Clear(ClearType::All))?;
        for cell in grid.cells() {
            self.queue_glyph(cell, Self::glyph_at(grid, cell))?;
        }
        self.out.flush()
    }

    /// Draws the cells a single step touched.
    pub fn draw_step(&mut self, step: &SessionStep, grid: &GridModel) -> std::io::Result<()> {
        match step {
            SessionStep::Search(StepResult::Explored { cell, color }) => {
                // Keep the start marker visible
                if grid.start() != Some(*cell) {
                    self.queue_glyph(*cell, Glyph::Explored(*color))?;
                }
            }
            SessionStep::Search(StepResult::Found(path)) => {
                let inner = path.len().saturating_sub(1);
                for &cell in path.iter().take(inner).skip(1) {
                    self.queue_glyph(cell, Glyph::Path)?;
                }
            }
            SessionStep::Search(StepResult::Exhausted | StepResult::Idle) => {}
            SessionStep::Maze(MazeStep::Carved { cell, wall }) => {
                self.queue_glyph(*wall, Glyph::Free)?;
                self.queue_glyph(*cell, Glyph::Free)?;
            }
            SessionStep::Maze(MazeStep::Backtracked(_) | MazeStep::Done) => {}
        }
        self.out.flush()
    }

    /// Writes a message on the given status row, cut to fit the terminal width.
    pub fn status(&mut self, row: u16, msg: &str, color: Color) -> std::io::Result<()> {
        let (text, _) = msg.unicode_truncate(self.status_width as usize);
        queue!(
            self.out,
            cursor::MoveTo(0, self.grid_size + row.min(Self::STATUS_ROWS - 1)),
            terminal::Clear(ClearType::CurrentLine),
            style::PrintStyledContent(text.to_string().with(color).attribute(Attribute::Bold)),
        )?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellState;

    fn rendered(bytes: Vec<u8>) -> String {
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn test_draw_grid_shows_markers() {
        let mut grid = GridModel::new(3);
        grid.set_start(Cell::new(0, 0)).unwrap();
        grid.set_end(Cell::new(2, 2)).unwrap();
        grid.set_state(Cell::new(1, 1), CellState::Blocked).unwrap();
        let mut renderer = Renderer::new(Vec::new(), 3, 80);
        renderer.draw_grid(&grid).unwrap();
        let out = rendered(renderer.into_inner());
        assert_eq!(out.matches("🟩").count(), 1);
        assert_eq!(out.matches("🟥").count(), 1);
        assert_eq!(out.matches("⬜").count(), 1);
    }

    #[test]
    fn test_found_path_skips_endpoints() {
        let mut grid = GridModel::new(3);
        grid.set_start(Cell::new(0, 0)).unwrap();
        grid.set_end(Cell::new(2, 0)).unwrap();
        let path = vec![Cell::new(0, 0), Cell::new(1, 0), Cell::new(2, 0)];
        let mut renderer = Renderer::new(Vec::new(), 3, 80);
        renderer
            .draw_step(&SessionStep::Search(StepResult::Found(path)), &grid)
            .unwrap();
        let out = rendered(renderer.into_inner());
        assert_eq!(out.matches("🟨").count(), 1);
    }

    #[test]
    fn test_explored_start_is_not_repainted() {
        let mut grid = GridModel::new(3);
        grid.set_start(Cell::new(0, 0)).unwrap();
        let step = SessionStep::Search(StepResult::Explored {
            cell: Cell::new(0, 0),
            color: Color::Green,
        });
        let mut renderer = Renderer::new(Vec::new(), 3, 80);
        renderer.draw_step(&step, &grid).unwrap();
        assert!(!rendered(renderer.into_inner()).contains("··"));
    }

    #[test]
    fn test_status_is_truncated() {
        let mut renderer = Renderer::new(Vec::new(), 3, 5);
        renderer
            .status(0, "Path found in 123 steps", Color::Green)
            .unwrap();
        let out = rendered(renderer.into_inner());
        assert!(out.contains("Path "));
        assert!(!out.contains("found"));
    }
}

use crossterm::style::{Color, StyledContent, Stylize};

use std::fmt;

/// A coordinate on the grid. `x` is the column, `y` is the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: u16,
    pub y: u16,
}

impl Cell {
    pub const fn new(x: u16, y: u16) -> Self {
        Cell { x, y }
    }

    /// Manhattan distance between two cells.
    pub fn manhattan(self, other: Cell) -> u32 {
        self.x.abs_diff(other.x) as u32 + self.y.abs_diff(other.y) as u32
    }
}

impl From<(u16, u16)> for Cell {
    fn from((x, y): (u16, u16)) -> Self {
        Cell { x, y }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Occupancy of a single grid cell.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellState {
    #[default]
    Free,
    Blocked,
}

impl CellState {
    pub fn toggled(self) -> Self {
        match self {
            CellState::Free => CellState::Blocked,
            CellState::Blocked => CellState::Free,
        }
    }
}

/// What the terminal shows in a cell position. Only the renderer deals in these,
/// the engine itself works on [`CellState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Glyph {
    Free,
    Blocked,
    Start,
    End,
    /// Explored by a search, tinted with the algorithm's color.
    Explored(Color),
    Path,
}

impl Glyph {
    /// The width of each cell when rendered, in character widths.
    pub const CELL_WIDTH: u16 = 2;
}

impl From<CellState> for Glyph {
    fn from(state: CellState) -> Self {
        match state {
            CellState::Free => Glyph::Free,
            CellState::Blocked => Glyph::Blocked,
        }
    }
}

impl Glyph {
    fn styled(self) -> StyledContent<&'static str> {
        match self {
            Glyph::Free => "  ".with(Color::Reset),
            Glyph::Blocked => "⬜".with(Color::White),
            Glyph::Start => "🟩".with(Color::Green),
            Glyph::End => "🟥".with(Color::Red),
            Glyph::Explored(color) => "··".with(color),
            Glyph::Path => "🟨".with(Color::Yellow),
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let styled_symbol = self.styled();

        #[cfg(debug_assertions)]
        {
            use unicode_width::UnicodeWidthStr;
            debug_assert_eq!(
                styled_symbol.content().width(),
                Glyph::CELL_WIDTH as usize,
                "Each cell must occupy exactly two character widths."
            );
        }

        write!(f, "{}", styled_symbol)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manhattan() {
        assert_eq!(Cell::new(0, 0).manhattan(Cell::new(4, 4)), 8);
        assert_eq!(Cell::new(3, 1).manhattan(Cell::new(1, 3)), 4);
        assert_eq!(Cell::new(2, 2).manhattan(Cell::new(2, 2)), 0);
    }

    #[test]
    fn test_toggle_state() {
        assert_eq!(CellState::Free.toggled(), CellState::Blocked);
        assert_eq!(CellState::Blocked.toggled(), CellState::Free);
    }

    #[test]
    fn test_glyphs_are_two_columns() {
        use unicode_width::UnicodeWidthStr;
        for glyph in [
            Glyph::Free,
            Glyph::Blocked,
            Glyph::Start,
            Glyph::End,
            Glyph::Explored(Color::Cyan),
            Glyph::Path,
        ] {
            let styled = glyph.styled();
            assert_eq!(
                styled.content().width(),
                Glyph::CELL_WIDTH as usize,
                "{:?}",
                glyph
            );
            assert!(glyph.to_string().contains(*styled.content()));
        }
    }
}

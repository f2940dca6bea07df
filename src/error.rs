use thiserror::Error;

use crate::grid::Cell;

/// Reasons a run could not be started.
///
/// None of these change any state: a rejected request leaves the session
/// exactly as it was, so callers that want a silent no-op can drop the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("start and end cells must both be set before searching")]
    NotConfigured,
    #[error("another run is still active")]
    AlreadyRunning,
    #[error("a {size}x{size} grid is too small to carve a maze (minimum is 3x3)")]
    GridTooSmall { size: u16 },
}

/// Reasons a grid edit was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("the grid is locked by an active run")]
    Locked,
    #[error("cell ({x}, {y}) is outside the grid")]
    OutOfBounds { x: u16, y: u16 },
    #[error("cell {0} is blocked")]
    Blocked(Cell),
    #[error("cell {0} is occupied by the start or end marker")]
    Occupied(Cell),
}

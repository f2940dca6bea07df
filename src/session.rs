//! Owner of the grid and of the single run allowed on it at a time.

use rand::rngs::StdRng;

use crate::{
    error::{EngineError, GridError},
    generators::{MazeGenerator, MazeStep, get_rng},
    grid::{Cell, CellState, GridModel},
    solvers::{SearchRun, Solver, StepResult},
};

enum ActiveRun {
    Search(SearchRun),
    Maze(MazeGenerator<StdRng>),
}

/// One step of whichever run is active.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStep {
    Search(StepResult),
    Maze(MazeStep),
}

impl SessionStep {
    pub fn is_terminal(&self) -> bool {
        match self {
            SessionStep::Search(result) => result.is_terminal(),
            SessionStep::Maze(step) => step.is_terminal(),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, SessionStep::Search(StepResult::Idle))
    }
}

/// A grid plus at most one active run.
///
/// Starting a run locks the grid; the lock is released when the run yields a terminal
/// step or is cancelled. While locked, every edit is refused and leaves the grid as is.
pub struct Session {
    grid: GridModel,
    active: Option<ActiveRun>,
}

impl Session {
    /// Takes ownership of the grid. A lock copied along from another session's grid is
    /// dropped, since no run exists yet to hold it.
    pub fn new(mut grid: GridModel) -> Self {
        grid.unlock();
        Session { grid, active: None }
    }

    pub fn grid(&self) -> &GridModel {
        &self.grid
    }

    pub fn is_running(&self) -> bool {
        self.active.is_some()
    }

    pub fn start_search(&mut self, solver: Solver) -> Result<(), EngineError> {
        if self.active.is_some() {
            tracing::warn!(%solver, "search rejected, a run is already active");
            return Err(EngineError::AlreadyRunning);
        }
        let run = SearchRun::start(solver, &self.grid)?;
        self.grid.lock();
        self.active = Some(ActiveRun::Search(run));
        Ok(())
    }

    /// Starts carving a fresh maze over the whole grid. The same seed always yields the
    /// same maze.
    pub fn start_maze(&mut self, seed: Option<u64>) -> Result<(), EngineError> {
        if self.active.is_some() {
            tracing::warn!("maze generation rejected, a run is already active");
            return Err(EngineError::AlreadyRunning);
        }
        let generator = MazeGenerator::start(&mut self.grid, get_rng(seed))?;
        self.grid.lock();
        self.active = Some(ActiveRun::Maze(generator));
        Ok(())
    }

    /// Advances the active run by one step. Returns `None` when nothing is running.
    pub fn step(&mut self) -> Option<SessionStep> {
        let active = self.active.as_mut()?;
        let step = match active {
            ActiveRun::Search(run) => SessionStep::Search(run.step(&self.grid)),
            ActiveRun::Maze(generator) => SessionStep::Maze(generator.step(&mut self.grid)),
        };
        if step.is_terminal() {
            self.active = None;
            self.grid.unlock();
        }
        Some(step)
    }

    /// Abandons the active run, if any. Returns whether a run was dropped.
    ///
    /// A maze cancelled half way leaves its partially carved grid behind.
    pub fn cancel(&mut self) -> bool {
        let cancelled = self.active.take().is_some();
        if cancelled {
            tracing::debug!("active run cancelled");
            self.grid.unlock();
        }
        cancelled
    }

    pub fn toggle(&mut self, cell: Cell) -> Result<CellState, GridError> {
        self.grid.toggle(cell).inspect_err(log_rejected_edit)
    }

    pub fn set_state(&mut self, cell: Cell, state: CellState) -> Result<(), GridError> {
        self.grid
            .set_state(cell, state)
            .inspect_err(log_rejected_edit)
    }

    pub fn set_start(&mut self, cell: Cell) -> Result<(), GridError> {
        self.grid.set_start(cell).inspect_err(log_rejected_edit)
    }

    pub fn set_end(&mut self, cell: Cell) -> Result<(), GridError> {
        self.grid.set_end(cell).inspect_err(log_rejected_edit)
    }

    pub fn clear_markers(&mut self) -> Result<(), GridError> {
        self.grid.clear_markers().inspect_err(log_rejected_edit)
    }

    /// Frees every cell and clears both markers.
    pub fn reset(&mut self) -> Result<(), GridError> {
        self.grid.reset().inspect_err(log_rejected_edit)
    }

    /// Mutable access for bulk edits such as scattering walls. Refused while locked.
    pub fn grid_mut(&mut self) -> Result<&mut GridModel, GridError> {
        if self.grid.is_locked() {
            return Err(GridError::Locked);
        }
        Ok(&mut self.grid)
    }
}

fn log_rejected_edit(err: &GridError) {
    tracing::warn!(%err, "grid edit rejected");
}

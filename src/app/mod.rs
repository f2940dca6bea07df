mod renderer;

pub use renderer::Renderer;

use std::{
    io::{Stdout, Write},
    sync::{
        Arc,
        atomic::{AtomicBool, Ordering},
    },
    time::Duration,
};

use crossterm::{
    QueueableCommand, cursor,
    event::{self, KeyCode},
    queue,
    style::{self, Attribute, Color, Stylize},
    terminal::{self, ClearType},
};
use rand::{Rng, rngs::StdRng};

use crate::{
    config::Config,
    generators::{first_free_cell, get_rng, last_free_cell, scatter_walls},
    grid::{GridModel, Glyph},
    scheduler::{SchedulerControl, SchedulerStatus, StepScheduler},
    session::{Session, SessionStep},
    solvers::{Solver, StepResult},
};

/// Timeout for polling input events in the input thread, a.k.a.
/// how often to check whether the run is over
const USER_INPUT_EVENT_POLL_TIMEOUT: Duration = Duration::from_millis(100);

/// Entries of the main menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    Solve(Solver),
    GenerateMaze,
    ScatterWalls,
    Reset,
    Quit,
}

impl Action {
    pub const ALL: [Action; 9] = [
        Action::Solve(Solver::Bfs),
        Action::Solve(Solver::Dfs),
        Action::Solve(Solver::Dijkstra),
        Action::Solve(Solver::GreedyBestFirst),
        Action::Solve(Solver::AStar),
        Action::GenerateMaze,
        Action::ScatterWalls,
        Action::Reset,
        Action::Quit,
    ];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Solve(solver) => write!(f, "Solve with {}", solver),
            Action::GenerateMaze => write!(f, "Generate maze"),
            Action::ScatterWalls => write!(f, "Scatter random walls"),
            Action::Reset => write!(f, "Clear grid"),
            Action::Quit => write!(f, "Quit"),
        }
    }
}

/// Set a panic hook to restore terminal state on panic
/// This ensures that the terminal is not left in raw mode or alternate screen on panic
/// even if the panic occurs in a different thread
fn set_panic_hook() {
    let hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = restore_terminal(&mut std::io::stdout()); // ignore any errors as we are already failing
        hook(panic_info);
    }));
}

/// Setup terminal in raw mode and enter alternate screen
/// Also sets a panic hook to restore terminal on panic
pub fn setup_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    terminal::enable_raw_mode()?;
    set_panic_hook();
    queue!(
        stdout,
        terminal::EnterAlternateScreen,
        terminal::Clear(ClearType::All),
        cursor::Hide,
        cursor::MoveTo(0, 0)
    )?;
    stdout.flush()
}

/// Restore terminal to original state
/// Leave alternate screen and disable raw mode
pub fn restore_terminal(stdout: &mut Stdout) -> std::io::Result<()> {
    queue!(stdout, terminal::LeaveAlternateScreen, cursor::Show)?;
    stdout.flush()?;
    terminal::disable_raw_mode()
}

/// Largest grid side that fits the terminal, capped at `requested` and at least 3.
pub fn fit_grid_size(requested: u16, term_width: u16, term_height: u16) -> u16 {
    let by_width = term_width / Glyph::CELL_WIDTH;
    let by_height = term_height.saturating_sub(Renderer::<Stdout>::STATUS_ROWS);
    requested.min(by_width).min(by_height).max(3)
}

/// Places start and end on the first and last free cells if they are not set yet.
/// Returns whether both markers are in place afterwards.
pub fn ensure_markers(session: &mut Session) -> bool {
    if session.grid().start().is_none() {
        if let Some(cell) = first_free_cell(session.grid()) {
            session.set_start(cell).ok();
        }
    }
    if session.grid().end().is_none() {
        if let Some(cell) = last_free_cell(session.grid()) {
            session.set_end(cell).ok();
        }
    }
    session.grid().start().is_some() && session.grid().end().is_some()
}

/// Main application loop: pick an action from the menu, animate it, repeat.
pub fn run(stdout: &mut Stdout, config: &Config) -> std::io::Result<()> {
    let (term_width, term_height) = terminal::size()?;
    let size = fit_grid_size(config.grid_size, term_width, term_height);
    tracing::info!(size, requested = config.grid_size, "starting grid session");

    let mut session = Session::new(GridModel::new(size));
    let mut rng = get_rng(config.seed);
    let mut cadence = config.frame;

    loop {
        let Some(action) = select_from_menu(
            stdout,
            "Select an action (use arrow keys and Enter, or Esc to exit):",
            &Action::ALL,
        )?
        else {
            break;
        };
        tracing::info!(%action, "action selected");

        match action {
            Action::Quit => break,
            Action::Reset => {
                session.reset().ok();
                show_grid(stdout, &session, term_width, "Grid cleared.")?;
            }
            Action::ScatterWalls => {
                scatter(&mut session, config.wall_density, &mut rng);
                show_grid(stdout, &session, term_width, "Walls scattered.")?;
            }
            Action::GenerateMaze => {
                if let Err(err) = session.start_maze(Some(rng.random())) {
                    show_grid(stdout, &session, term_width, &err.to_string())?;
                    continue;
                }
                let outcome = animate(stdout, &mut session, term_width, &mut cadence)?;
                // The maze drops the markers, put fresh ones on its corners
                ensure_markers(&mut session);
                finish_run(stdout, &session, term_width, outcome)?;
            }
            Action::Solve(solver) => {
                ensure_markers(&mut session);
                if let Err(err) = session.start_search(solver) {
                    show_grid(stdout, &session, term_width, &err.to_string())?;
                    continue;
                }
                let outcome = animate(stdout, &mut session, term_width, &mut cadence)?;
                finish_run(stdout, &session, term_width, outcome)?;
            }
        }
    }
    Ok(())
}

/// Clears the grid, drops start and end on two random cells, and scatters walls
/// around them.
fn scatter(session: &mut Session, density: f64, rng: &mut StdRng) {
    if session.reset().is_err() {
        return;
    }
    let cells = session.grid().cells().collect::<Vec<_>>();
    if let [a, b] = rand::seq::index::sample(rng, cells.len(), 2).into_vec()[..] {
        session.set_start(cells[a]).ok();
        session.set_end(cells[b]).ok();
    }
    if let Ok(grid) = session.grid_mut() {
        scatter_walls(grid, density, rng).ok();
    }
}

/// Result of an animated run, for the status line.
struct RunOutcome {
    status: SchedulerStatus,
    explored: usize,
}

/// Drive the session's active run to its end while rendering every step.
/// Esc cancels, ↑/↓ change the speed. The final cadence is written back to `cadence`.
fn animate(
    stdout: &mut Stdout,
    session: &mut Session,
    term_width: u16,
    cadence: &mut Duration,
) -> std::io::Result<RunOutcome> {
    let mut renderer = Renderer::new(&mut *stdout, session.grid().size(), term_width);
    renderer.draw_grid(session.grid())?;
    renderer.status(
        1,
        "Esc: cancel  ↑/↓: speed up/slow down",
        Color::Cyan,
    )?;

    let scheduler = StepScheduler::new(*cadence);
    let control = scheduler.control();

    // Flag to indicate the input thread should stop. Set once the run is over.
    let done = Arc::new(AtomicBool::new(false));
    let done_for_input = done.clone();
    let control_for_input = control.clone();
    let input_thread_handle = std::thread::spawn(move || -> std::io::Result<()> {
        listen_to_user_input(
            control_for_input,
            USER_INPUT_EVENT_POLL_TIMEOUT,
            &done_for_input,
        )
    });

    let mut explored = 0;
    let mut render_error = None;
    let status = scheduler.drive(session, |step, grid| {
        if matches!(step, SessionStep::Search(StepResult::Explored { .. })) {
            explored += 1;
        }
        if let Err(err) = renderer.draw_step(step, grid) {
            // Stop stepping, the error is reported once the run is torn down
            render_error.get_or_insert(err);
            control.cancel();
        }
    });

    done.store(true, Ordering::Release);
    match input_thread_handle.join() {
        Ok(result) => result?,
        Err(_) => tracing::error!("input thread panicked"),
    }
    if let Some(err) = render_error {
        return Err(err);
    }

    *cadence = control.cadence();
    Ok(RunOutcome { status, explored })
}

fn finish_run(
    stdout: &mut Stdout,
    session: &Session,
    term_width: u16,
    outcome: RunOutcome,
) -> std::io::Result<()> {
    let (msg, color) = match &outcome.status {
        SchedulerStatus::Completed(SessionStep::Search(StepResult::Found(path))) => (
            format!(
                "Path found! {} moves, {} cells explored.",
                path.len().saturating_sub(1),
                outcome.explored
            ),
            Color::Green,
        ),
        SchedulerStatus::Completed(SessionStep::Search(_)) => (
            format!("No path found. {} cells explored.", outcome.explored),
            Color::Red,
        ),
        SchedulerStatus::Completed(SessionStep::Maze(_)) => {
            ("Maze generated.".to_string(), Color::Green)
        }
        SchedulerStatus::Cancelled => ("Run cancelled.".to_string(), Color::Yellow),
        SchedulerStatus::NothingToRun => ("Nothing to run.".to_string(), Color::Yellow),
    };
    tracing::info!(%msg, "run finished");

    let mut renderer = Renderer::new(&mut *stdout, session.grid().size(), term_width);
    if let SchedulerStatus::Completed(SessionStep::Maze(_)) = outcome.status {
        // Markers were placed after the last carving step
        renderer.draw_grid(session.grid())?;
    }
    renderer.status(0, &msg, color)?;
    renderer.status(1, "Press any key to return to the menu...", Color::Blue)?;
    wait_for_key()
}

fn show_grid(
    stdout: &mut Stdout,
    session: &Session,
    term_width: u16,
    msg: &str,
) -> std::io::Result<()> {
    let mut renderer = Renderer::new(&mut *stdout, session.grid().size(), term_width);
    renderer.draw_grid(session.grid())?;
    renderer.status(0, msg, Color::Green)?;
    renderer.status(1, "Press any key to return to the menu...", Color::Blue)?;
    wait_for_key()
}

/// Listen for key presses while a run is animating.
/// This function runs in a separate thread and only talks to the scheduler through
/// its control handle.
fn listen_to_user_input(
    control: SchedulerControl,
    event_poll_timeout: Duration,
    done: &AtomicBool,
) -> std::io::Result<()> {
    loop {
        if done.load(Ordering::Acquire) || control.is_cancelled() {
            return Ok(());
        }

        // Poll for events with a timeout
        if !event::poll(event_poll_timeout)? {
            // No event available, continue loop to check flags again
            continue;
        }

        if let event::Event::Key(key_event) = event::read()? {
            if key_event.kind != event::KeyEventKind::Press {
                continue;
            }
            match key_event.code {
                KeyCode::Esc => {
                    tracing::debug!("[input loop] Esc key pressed, cancelling run");
                    control.cancel();
                    return Ok(());
                }
                KeyCode::Up => {
                    let cadence = control.speed_up();
                    tracing::debug!(?cadence, "[input loop] speed up");
                }
                KeyCode::Down => {
                    let cadence = control.slow_down();
                    tracing::debug!(?cadence, "[input loop] slow down");
                }
                _ => {}
            }
        }
    }
}

/// Block until any key is pressed
fn wait_for_key() -> std::io::Result<()> {
    loop {
        if let event::Event::Key(event::KeyEvent { kind, .. }) = event::read()? {
            if kind == event::KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}

/// Present a menu of options to the user and let them select one using arrow keys
/// Returns None if user cancels input with Esc
/// Returns Some(T) if user selects an option and presses Enter
fn select_from_menu<T: std::fmt::Display + Copy>(
    stdout: &mut Stdout,
    prompt: &str,
    options: &[T],
) -> std::io::Result<Option<T>> {
    if options.is_empty() {
        return Ok(None);
    }

    let mut selected = 0;
    loop {
        queue!(
            stdout,
            terminal::Clear(ClearType::All),
            cursor::MoveTo(0, 0),
            style::PrintStyledContent(prompt.with(Color::Yellow).attribute(Attribute::Bold)),
        )?;
        for (i, option) in options.iter().enumerate() {
            if i == selected {
                stdout.queue(style::SetAttribute(Attribute::Reverse))?;
            }
            stdout.queue(style::Print(format!("\r\n{}", option)))?;
            if i == selected {
                stdout.queue(style::SetAttribute(Attribute::NoReverse))?;
            }
        }
        stdout.queue(style::Print("\r\n"))?;
        stdout.flush()?;

        if let event::Event::Key(event::KeyEvent { code, kind, .. }) = event::read()? {
            if kind != event::KeyEventKind::Press {
                continue;
            }
            match code {
                KeyCode::Up => {
                    selected = selected.checked_sub(1).unwrap_or(options.len() - 1);
                }
                KeyCode::Down => {
                    selected = (selected + 1) % options.len();
                }
                KeyCode::Enter => return Ok(Some(options[selected])),
                KeyCode::Esc => return Ok(None),
                _ => {}
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{Cell, CellState};

    #[test]
    fn test_fit_grid_size() {
        assert_eq!(fit_grid_size(50, 200, 80), 50);
        // Two columns per cell
        assert_eq!(fit_grid_size(50, 60, 80), 30);
        // Status rows are reserved below the grid
        assert_eq!(fit_grid_size(50, 200, 22), 20);
        assert_eq!(fit_grid_size(50, 2, 2), 3);
    }

    #[test]
    fn test_ensure_markers_on_open_grid() {
        let mut session = Session::new(GridModel::new(5));
        assert!(ensure_markers(&mut session));
        assert_eq!(session.grid().start(), Some(Cell::new(0, 0)));
        assert_eq!(session.grid().end(), Some(Cell::new(4, 4)));
    }

    #[test]
    fn test_ensure_markers_keeps_existing() {
        let mut session = Session::new(GridModel::new(5));
        session.set_end(Cell::new(0, 0)).unwrap();
        assert!(ensure_markers(&mut session));
        assert_eq!(session.grid().end(), Some(Cell::new(0, 0)));
        assert_eq!(session.grid().start(), Some(Cell::new(1, 0)));
    }

    #[test]
    fn test_ensure_markers_needs_two_free_cells() {
        let mut grid = GridModel::filled(3, CellState::Blocked);
        grid.put(Cell::new(1, 1), CellState::Free);
        let mut session = Session::new(grid);
        assert!(!ensure_markers(&mut session));
        assert_eq!(session.grid().start(), Some(Cell::new(1, 1)));
        assert_eq!(session.grid().end(), None);
    }

    #[test]
    fn test_scatter_places_markers_on_free_cells() {
        let mut session = Session::new(GridModel::new(8));
        scatter(&mut session, 0.4, &mut get_rng(Some(11)));
        let grid = session.grid();
        let start = grid.start().unwrap();
        let end = grid.end().unwrap();
        assert!(grid.is_free(start) && grid.is_free(end));
        assert!(grid.cells().any(|c| grid[c] == CellState::Blocked));
    }

    #[test]
    fn test_action_menu_covers_every_solver() {
        for solver in Solver::ALL {
            assert!(Action::ALL.contains(&Action::Solve(solver)));
        }
        assert_eq!(
            Action::Solve(Solver::AStar).to_string(),
            "Solve with A* Search"
        );
    }
}

use std::time::{Duration, Instant};

use gridpath::{
    config::Config,
    generators::{first_free_cell, last_free_cell},
    grid::GridModel,
    session::{Session, SessionStep},
    solvers::{Solver, StepResult},
};

/// Headless timing run: carve a seeded maze, then let every solver cross it.
///
/// Usage: `profile [iterations]`. Grid size and seed come from the usual
/// `GRIDPATH_*` variables.
fn main() -> std::io::Result<()> {
    let config = Config::from_env()
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;

    let mut args = std::env::args();
    args.next(); // Skip executable name
    let num_iters = args
        .next()
        .and_then(|s| s.parse::<usize>().ok())
        .unwrap_or(1);
    let seed = config.seed.unwrap_or(0);

    let mut session = Session::new(GridModel::new(config.grid_size));
    let started = Instant::now();
    session
        .start_maze(Some(seed))
        .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
    let carving_steps = std::iter::from_fn(|| session.step()).count();
    println!(
        "maze {0}x{0} (seed {seed}): {carving_steps} steps in {1:?}",
        config.grid_size,
        started.elapsed()
    );

    let grid = session.grid();
    let (Some(start), Some(end)) = (first_free_cell(grid), last_free_cell(grid)) else {
        return Err(std::io::Error::other("maze has no free cells"));
    };
    session.set_start(start).ok();
    session.set_end(end).ok();

    for solver in Solver::ALL {
        let mut total = Duration::ZERO;
        let mut explored = 0;
        let mut path_len = None;
        for _ in 0..num_iters {
            session
                .start_search(solver)
                .map_err(|err| std::io::Error::new(std::io::ErrorKind::InvalidInput, err))?;
            let started = Instant::now();
            explored = 0;
            while let Some(step) = session.step() {
                match step {
                    SessionStep::Search(StepResult::Explored { .. }) => explored += 1,
                    SessionStep::Search(StepResult::Found(path)) => path_len = Some(path.len()),
                    _ => {}
                }
            }
            total += started.elapsed();
        }
        let name = solver.to_string();
        println!(
            "{name:<28} explored {explored:>6}  path {:>6}  avg {:?}",
            path_len.map_or_else(|| "-".to_string(), |n| n.to_string()),
            total / num_iters.max(1) as u32,
        );
    }
    Ok(())
}

use rand::{SeedableRng, rngs::StdRng};

mod recur_backtrack;
mod scatter;

pub use recur_backtrack::{MAZE_ORIGIN, MazeGenerator, MazeStep};
pub use scatter::{first_free_cell, last_free_cell, scatter_walls};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

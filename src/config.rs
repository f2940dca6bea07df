use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Runtime settings for the terminal front end.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Side length of the grid, before clamping to the terminal size.
    pub grid_size: u16,
    /// Pause between two rendered steps.
    pub frame: Duration,
    /// Seed for maze generation and wall scattering. `None` draws from the OS.
    pub seed: Option<u64>,
    /// Directory the log file is written to.
    pub log_dir: PathBuf,
    /// Probability of a cell being blocked when scattering walls.
    pub wall_density: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grid_size: 50,
            frame: Duration::from_millis(15),
            seed: None,
            log_dir: PathBuf::from("."),
            wall_density: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid value {value:?} for {key}: {reason}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
    pub reason: &'static str,
}

impl Config {
    /// Largest accepted grid side.
    pub const MAX_GRID_SIZE: u16 = 1024;

    pub const GRID_SIZE_VAR: &'static str = "GRIDPATH_SIZE";
    pub const FRAME_MS_VAR: &'static str = "GRIDPATH_FRAME_MS";
    pub const SEED_VAR: &'static str = "GRIDPATH_SEED";
    pub const LOG_DIR_VAR: &'static str = "GRIDPATH_LOG_DIR";
    pub const DENSITY_VAR: &'static str = "GRIDPATH_WALL_DENSITY";

    /// Defaults overridden by the `GRIDPATH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable name.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Config::default();

        if let Some(value) = lookup(Self::GRID_SIZE_VAR) {
            config.grid_size = match value.trim().parse::<u16>() {
                Ok(n) if (3..=Self::MAX_GRID_SIZE).contains(&n) => n,
                _ => return Err(invalid(Self::GRID_SIZE_VAR, value, "expected 3..=1024")),
            };
        }
        if let Some(value) = lookup(Self::FRAME_MS_VAR) {
            let ms = value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(Self::FRAME_MS_VAR, value, "expected milliseconds"))?;
            config.frame = Duration::from_millis(ms);
        }
        if let Some(value) = lookup(Self::SEED_VAR) {
            let seed = value
                .trim()
                .parse::<u64>()
                .map_err(|_| invalid(Self::SEED_VAR, value, "expected an unsigned integer"))?;
            config.seed = Some(seed);
        }
        if let Some(value) = lookup(Self::LOG_DIR_VAR) {
            config.log_dir = PathBuf::from(value);
        }
        if let Some(value) = lookup(Self::DENSITY_VAR) {
            config.wall_density = match value.trim().parse::<f64>() {
                Ok(d) if (0.0..=1.0).contains(&d) => d,
                _ => return Err(invalid(Self::DENSITY_VAR, value, "expected 0.0..=1.0")),
            };
        }
        Ok(config)
    }
}

fn invalid(key: &'static str, value: String, reason: &'static str) -> ConfigError {
    ConfigError { key, value, reason }
}

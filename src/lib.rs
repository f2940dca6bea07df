pub mod app;
pub mod config;
pub mod error;
pub mod generators;
pub mod grid;
pub mod scheduler;
pub mod session;
pub mod solvers;

//! Configuration management for the crossword solver

pub mod settings;

pub use settings::{CliOverrides, OutputConfig, OutputFormat, Settings, SolverConfig};

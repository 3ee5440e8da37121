//! Output formatting and logging helpers for the command line tool

pub mod display;
pub mod logger;
pub mod render;

pub use display::{Color, ColorOutput, SolutionFormatter};

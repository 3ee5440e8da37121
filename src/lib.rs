//! Crossword CSP Solver
//!
//! Fills a crossword grid from a word list by treating every slot as a
//! constraint satisfaction variable: unary length constraints, binary
//! crossing constraints and global word uniqueness. Domains are pruned with
//! node consistency and AC-3 before a backtracking search with MRV, degree
//! and least-constraining-value heuristics.

pub mod config;
pub mod crossword;
pub mod csp;
pub mod generate;
pub mod utils;

pub use config::Settings;
pub use crossword::Crossword;
pub use csp::{Assignment, CrosswordCreator};
pub use generate::{CrosswordProblem, Solution, SolveOutcome};

use anyhow::Result;
use std::path::Path;

/// Main entry point: load a structure and a word list, then fill the grid
pub fn solve_crossword<P: AsRef<Path>, Q: AsRef<Path>>(
    structure: P,
    words: Q,
    settings: Settings,
) -> Result<SolveOutcome> {
    let problem = CrosswordProblem::new(structure, words, settings)?;
    problem.solve()
}

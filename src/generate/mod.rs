//! Crossword generation: problem definition, solutions and validation

pub mod problem;
pub mod solution;
pub mod validator;

pub use problem::{CrosswordProblem, PuzzleAnalysis, SolveOutcome};
pub use solution::{Entry, Solution, SolutionSummary};
pub use validator::{ConstraintViolation, SolutionValidator, ValidationResult};

//! Crossword puzzle model and file formats

pub mod puzzle;
pub mod io;

pub use puzzle::{Cell, Crossword, Direction, PuzzleError, Variable, VariableId};
pub use io::{
    create_example_puzzles, load_structure_from_file, load_words_from_file,
    parse_structure_from_string, parse_words_from_string,
};

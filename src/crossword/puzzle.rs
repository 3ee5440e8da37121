//! Crossword grid geometry, variable discovery and overlap tables

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Index of a variable in declaration order
pub type VariableId = usize;

/// Zero-indexed (row, col) of a cell
pub type Cell = (usize, usize);

/// Errors raised while building a crossword from a structure
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PuzzleError {
    #[error("crossword structure has no rows")]
    EmptyStructure,
    #[error("crossword structure has zero width")]
    ZeroWidth,
}

/// Direction that a slot is facing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Across,
    Down,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Across => write!(f, "across"),
            Direction::Down => write!(f, "down"),
        }
    }
}

/// A slot in the puzzle that must be filled with a single word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variable {
    pub row: usize,
    pub col: usize,
    pub direction: Direction,
    pub length: usize,
}

impl Variable {
    pub fn new(row: usize, col: usize, direction: Direction, length: usize) -> Self {
        Self { row, col, direction, length }
    }

    /// Cells covered by this variable, in letter order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.length).map(move |k| match self.direction {
            Direction::Across => (self.row, self.col + k),
            Direction::Down => (self.row + k, self.col),
        })
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}) {} : {}", self.row, self.col, self.direction, self.length)
    }
}

/// Immutable crossword structure: open cells, variables and their crossings
#[derive(Debug, Clone)]
pub struct Crossword {
    height: usize,
    width: usize,
    structure: Vec<Vec<bool>>,
    variables: Vec<Variable>,
    overlaps: HashMap<(VariableId, VariableId), (usize, usize)>,
    neighbors: Vec<Vec<VariableId>>,
}

impl Crossword {
    /// Build a crossword from rows of open (`true`) and blocked (`false`) cells.
    /// Short rows are padded with blocked cells.
    pub fn from_structure(rows: Vec<Vec<bool>>) -> Result<Self, PuzzleError> {
        if rows.is_empty() {
            return Err(PuzzleError::EmptyStructure);
        }

        let height = rows.len();
        let width = rows.iter().map(Vec::len).max().unwrap_or(0);
        if width == 0 {
            return Err(PuzzleError::ZeroWidth);
        }

        let structure: Vec<Vec<bool>> = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, false);
                row
            })
            .collect();

        let variables = Self::discover_variables(&structure, height, width);
        let (overlaps, neighbors) = Self::compute_overlaps(&variables);

        Ok(Self {
            height,
            width,
            structure,
            variables,
            overlaps,
            neighbors,
        })
    }

    /// Scan start cells row-major; a cell starting both a down and an across
    /// run declares the down variable first. Runs of length 1 are not slots.
    fn discover_variables(structure: &[Vec<bool>], height: usize, width: usize) -> Vec<Variable> {
        let open = |r: usize, c: usize| structure[r][c];
        let mut variables = Vec::new();

        for i in 0..height {
            for j in 0..width {
                if !open(i, j) {
                    continue;
                }

                if i == 0 || !open(i - 1, j) {
                    let length = (i..height).take_while(|&r| open(r, j)).count();
                    if length > 1 {
                        variables.push(Variable::new(i, j, Direction::Down, length));
                    }
                }

                if j == 0 || !open(i, j - 1) {
                    let length = (j..width).take_while(|&c| open(i, c)).count();
                    if length > 1 {
                        variables.push(Variable::new(i, j, Direction::Across, length));
                    }
                }
            }
        }

        variables
    }

    #[allow(clippy::type_complexity)]
    fn compute_overlaps(
        variables: &[Variable],
    ) -> (HashMap<(VariableId, VariableId), (usize, usize)>, Vec<Vec<VariableId>>) {
        let mut occupants: HashMap<Cell, Vec<(VariableId, usize)>> = HashMap::new();
        for (id, variable) in variables.iter().enumerate() {
            for (index, cell) in variable.cells().enumerate() {
                occupants.entry(cell).or_default().push((id, index));
            }
        }

        let mut overlaps = HashMap::new();
        for slots in occupants.values() {
            for &(x, i) in slots {
                for &(y, j) in slots {
                    if x != y {
                        overlaps.insert((x, y), (i, j));
                    }
                }
            }
        }

        let mut neighbors = vec![Vec::new(); variables.len()];
        for &(x, y) in overlaps.keys() {
            neighbors[x].push(y);
        }
        for list in &mut neighbors {
            list.sort_unstable();
        }

        (overlaps, neighbors)
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether the cell is part of the puzzle (out of bounds counts as blocked)
    pub fn is_open(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.structure[row][col]
    }

    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    pub fn variable(&self, id: VariableId) -> &Variable {
        &self.variables[id]
    }

    pub fn variable_count(&self) -> usize {
        self.variables.len()
    }

    /// Position pair `(i, j)` where letter `i` of `x` must equal letter `j` of `y`
    pub fn overlap(&self, x: VariableId, y: VariableId) -> Option<(usize, usize)> {
        self.overlaps.get(&(x, y)).copied()
    }

    /// Variables crossing `x`, in declaration order
    pub fn neighbors(&self, x: VariableId) -> &[VariableId] {
        &self.neighbors[x]
    }

    pub fn degree(&self, x: VariableId) -> usize {
        self.neighbors[x].len()
    }

    /// Number of open cells in the grid
    pub fn open_cell_count(&self) -> usize {
        self.structure.iter().flatten().filter(|&&open| open).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(lines: &[&str]) -> Vec<Vec<bool>> {
        lines.iter().map(|line| line.chars().map(|c| c == '_').collect()).collect()
    }

    #[test]
    fn test_discovers_down_before_across() {
        let crossword = Crossword::from_structure(rows(&["___", "_#_", "___"])).unwrap();
        let variables = crossword.variables();

        assert_eq!(variables.len(), 4);
        assert_eq!(variables[0], Variable::new(0, 0, Direction::Down, 3));
        assert_eq!(variables[1], Variable::new(0, 0, Direction::Across, 3));
        assert_eq!(variables[2], Variable::new(0, 2, Direction::Down, 3));
        assert_eq!(variables[3], Variable::new(2, 0, Direction::Across, 3));
    }

    #[test]
    fn test_single_cells_are_not_variables() {
        let crossword = Crossword::from_structure(rows(&["_#_", "#_#"])).unwrap();
        assert_eq!(crossword.variable_count(), 0);
    }

    #[test]
    fn test_overlaps_are_symmetric() {
        let crossword = Crossword::from_structure(rows(&["#_#", "___", "#_#"])).unwrap();
        // (0, 1) down is declared before (1, 0) across
        assert_eq!(crossword.overlap(0, 1), Some((1, 1)));
        assert_eq!(crossword.overlap(1, 0), Some((1, 1)));
        assert_eq!(crossword.neighbors(0), &[1]);
        assert_eq!(crossword.degree(1), 1);
    }

    #[test]
    fn test_non_crossing_variables_have_no_overlap() {
        let crossword = Crossword::from_structure(rows(&["___", "###", "___"])).unwrap();
        assert_eq!(crossword.variable_count(), 2);
        assert_eq!(crossword.overlap(0, 1), None);
        assert!(crossword.neighbors(0).is_empty());
    }

    #[test]
    fn test_ragged_rows_are_padded() {
        let crossword = Crossword::from_structure(rows(&["____", "__"])).unwrap();
        assert_eq!(crossword.width(), 4);
        assert!(!crossword.is_open(1, 3));
        assert_eq!(crossword.open_cell_count(), 6);
    }

    #[test]
    fn test_empty_structure_is_rejected() {
        assert_eq!(Crossword::from_structure(vec![]).unwrap_err(), PuzzleError::EmptyStructure);
        assert_eq!(Crossword::from_structure(vec![vec![]]).unwrap_err(), PuzzleError::ZeroWidth);
    }

    #[test]
    fn test_variable_cells_and_display() {
        let variable = Variable::new(1, 2, Direction::Down, 3);
        let cells: Vec<_> = variable.cells().collect();
        assert_eq!(cells, vec![(1, 2), (2, 2), (3, 2)]);
        assert_eq!(variable.to_string(), "(1, 2) down : 3");
    }
}

//! Filled crossword representation

use super::validator::ConstraintViolation;
use crate::crossword::{Crossword, Variable};
use crate::csp::{Assignment, SolveStatistics};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A filled crossword, independent of the solving session that produced it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Solution {
    pub height: usize,
    pub width: usize,
    /// One entry per slot, in declaration order
    pub entries: Vec<Entry>,
    /// Time taken to find this solution
    #[serde(skip)]
    pub solve_time: Duration,
    /// Statistics of the solve, absent for solutions loaded from elsewhere
    #[serde(default)]
    pub statistics: Option<SolveStatistics>,
    pub metadata: SolutionMetadata,
}

/// A slot and the word written into it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    #[serde(flatten)]
    pub variable: Variable,
    pub word: String,
}

/// Metadata about a solution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SolutionMetadata {
    /// Identifier derived from the grid contents
    pub id: String,
    pub word_count: usize,
    /// Open cells filled with a letter
    pub letter_count: usize,
    pub distinct_letters: usize,
    pub average_word_length: f64,
}

impl Solution {
    /// Wrap a complete assignment of `crossword`
    pub fn new(crossword: &Crossword, assignment: &Assignment, statistics: Option<SolveStatistics>) -> Self {
        let entries: Vec<Entry> = assignment
            .iter()
            .map(|(var, word)| Entry {
                variable: *crossword.variable(var),
                word: word.to_string(),
            })
            .collect();

        let mut solution = Self {
            height: crossword.height(),
            width: crossword.width(),
            entries,
            solve_time: statistics.map(|s| s.elapsed).unwrap_or_default(),
            statistics,
            metadata: SolutionMetadata::empty(),
        };
        solution.metadata = SolutionMetadata::analyze(&solution);
        solution
    }

    /// Map the entries back onto the variables of `crossword`
    pub fn to_assignment(&self, crossword: &Crossword) -> Result<Assignment, ConstraintViolation> {
        self.entries
            .iter()
            .map(|entry| {
                crossword
                    .variables()
                    .iter()
                    .position(|v| *v == entry.variable)
                    .map(|id| (id, entry.word.clone()))
                    .ok_or(ConstraintViolation::UnknownSlot { slot: entry.variable })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(|pairs| pairs.into_iter().collect())
    }

    /// Letters per cell; `None` for blocked or unfilled cells
    pub fn letter_grid(&self) -> Vec<Vec<Option<char>>> {
        let mut letters = vec![vec![None; self.width]; self.height];

        for entry in &self.entries {
            for ((row, col), letter) in entry.variable.cells().zip(entry.word.chars()) {
                if row < self.height && col < self.width {
                    letters[row][col] = Some(letter);
                }
            }
        }

        letters
    }

    /// Get a summary of the solution
    pub fn summary(&self) -> SolutionSummary {
        SolutionSummary {
            id: self.metadata.id.clone(),
            width: self.width,
            height: self.height,
            word_count: self.metadata.word_count,
            solve_time_ms: self.solve_time.as_millis() as u64,
            search_nodes: self.statistics.map(|s| s.search.nodes).unwrap_or(0),
        }
    }

    /// Convert to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Create from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Save to file
    pub fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> anyhow::Result<()> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Load from file
    pub fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(Self::from_json(&content)?)
    }
}

impl SolutionMetadata {
    fn empty() -> Self {
        Self {
            id: String::new(),
            word_count: 0,
            letter_count: 0,
            distinct_letters: 0,
            average_word_length: 0.0,
        }
    }

    /// Analyze a solution and create metadata
    pub fn analyze(solution: &Solution) -> Self {
        let letters: Vec<char> = solution.letter_grid().into_iter().flatten().flatten().collect();
        let word_count = solution.entries.len();
        let total_length: usize = solution.entries.iter().map(|e| e.variable.length).sum();

        let mut distinct = letters.clone();
        distinct.sort_unstable();
        distinct.dedup();

        Self {
            id: Self::generate_id(solution),
            word_count,
            letter_count: letters.len(),
            distinct_letters: distinct.len(),
            average_word_length: if word_count == 0 {
                0.0
            } else {
                total_length as f64 / word_count as f64
            },
        }
    }

    /// Generate an ID from the grid size and the words placed
    fn generate_id(solution: &Solution) -> String {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        solution.width.hash(&mut hasher);
        solution.height.hash(&mut hasher);
        for entry in &solution.entries {
            entry.variable.hash(&mut hasher);
            entry.word.hash(&mut hasher);
        }

        format!("xw_{:x}", hasher.finish())
    }
}

/// Summary of a solution for display purposes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionSummary {
    pub id: String,
    pub width: usize,
    pub height: usize,
    pub word_count: usize,
    pub solve_time_ms: u64,
    pub search_nodes: u64,
}

impl std::fmt::Display for SolutionSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Solution {}: {}x{}, {} words, {} nodes, {}ms",
            self.id, self.width, self.height, self.word_count, self.search_nodes, self.solve_time_ms
        )
    }
}

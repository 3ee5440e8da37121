//! Crossword generation problem definition

use super::{Solution, SolutionValidator};
use crate::config::Settings;
use crate::crossword::{load_structure_from_file, load_words_from_file, Crossword};
use crate::csp::{ConsistencyEngine, CrosswordCreator, Domains, SolveStatistics};
use anyhow::{Context, Result};
use itertools::Itertools;
use log::{info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

/// A crossword structure paired with the vocabulary used to fill it
pub struct CrosswordProblem {
    settings: Settings,
    crossword: Crossword,
    words: BTreeSet<String>,
    validator: SolutionValidator,
}

/// What a solve produced
#[derive(Debug, Clone)]
pub struct SolveOutcome {
    pub solution: Option<Solution>,
    pub statistics: SolveStatistics,
}

impl CrosswordProblem {
    /// Load a problem from a structure file and a word list
    pub fn new<P: AsRef<Path>, Q: AsRef<Path>>(structure: P, words: Q, settings: Settings) -> Result<Self> {
        let crossword = load_structure_from_file(structure).context("Failed to load crossword structure")?;
        let words = load_words_from_file(words).context("Failed to load word list")?;

        Ok(Self::from_parts(crossword, words, settings))
    }

    /// Create a problem from an already built crossword (useful for testing)
    pub fn from_parts(crossword: Crossword, words: BTreeSet<String>, settings: Settings) -> Self {
        Self {
            settings,
            crossword,
            words,
            validator: SolutionValidator::new(),
        }
    }

    /// Fill the crossword. `solution` is `None` when no fill exists or a
    /// search limit was reached; `statistics.termination` tells which.
    pub fn solve(&self) -> Result<SolveOutcome> {
        info!(
            "Solving {}x{} crossword with {} slots and {} words",
            self.crossword.width(),
            self.crossword.height(),
            self.crossword.variable_count(),
            self.words.len()
        );

        let mut creator = CrosswordCreator::new(&self.crossword, &self.words)
            .with_limits(self.settings.search_limits())
            .with_arc_consistency(self.settings.solver.enforce_arc_consistency);

        let assignment = creator.solve();
        let statistics = creator
            .statistics()
            .context("Solver finished without recording statistics")?;

        let Some(assignment) = assignment else {
            warn!("No fill found ({})", statistics.termination);
            return Ok(SolveOutcome {
                solution: None,
                statistics,
            });
        };

        let validation = self.validator.validate(&self.crossword, &assignment);
        if !validation.is_valid {
            anyhow::bail!("Solver produced an invalid fill:\n{}", validation);
        }

        Ok(SolveOutcome {
            solution: Some(Solution::new(&self.crossword, &assignment, Some(statistics))),
            statistics,
        })
    }

    pub fn crossword(&self) -> &Crossword {
        &self.crossword
    }

    pub fn words(&self) -> &BTreeSet<String> {
        &self.words
    }

    /// Get the problem settings
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Inspect the puzzle and the effect of propagation without searching
    pub fn analyze(&self) -> PuzzleAnalysis {
        let variables = self.crossword.variables();

        let slot_lengths: BTreeMap<usize, usize> =
            variables.iter().map(|v| v.length).counts().into_iter().collect();
        let words_by_length: BTreeMap<usize, usize> =
            self.words.iter().map(|w| w.chars().count()).counts().into_iter().collect();

        let mut domains = Domains::initialize(variables, &self.words);
        let mut engine = ConsistencyEngine::new(&self.crossword);

        engine.enforce_node_consistency(&mut domains);
        let node_consistent_sizes = domains.sizes();
        let arc_consistent = engine.ac3(&mut domains, None);
        let arc_consistent_sizes = domains.sizes();

        let crossings = (0..variables.len()).map(|v| self.crossword.degree(v)).sum::<usize>() / 2;
        let search_space_log10 = if arc_consistent {
            arc_consistent_sizes.iter().map(|&n| (n as f64).log10()).sum()
        } else {
            0.0
        };

        let recommendations = Self::generate_recommendations(
            &slot_lengths,
            &words_by_length,
            arc_consistent,
            search_space_log10,
        );

        PuzzleAnalysis {
            width: self.crossword.width(),
            height: self.crossword.height(),
            open_cells: self.crossword.open_cell_count(),
            variable_count: variables.len(),
            crossings,
            word_count: self.words.len(),
            slot_lengths,
            words_by_length,
            node_consistent_sizes,
            arc_consistent_sizes,
            arc_consistent,
            search_space_log10,
            recommendations,
        }
    }

    fn generate_recommendations(
        slot_lengths: &BTreeMap<usize, usize>,
        words_by_length: &BTreeMap<usize, usize>,
        arc_consistent: bool,
        search_space_log10: f64,
    ) -> Vec<String> {
        let mut recommendations = Vec::new();

        for (&length, &slots) in slot_lengths {
            let available = words_by_length.get(&length).copied().unwrap_or(0);
            if available < slots {
                recommendations.push(format!(
                    "Only {} words of length {} for {} slots - add more words of that length",
                    available, length, slots
                ));
            }
        }

        if !arc_consistent {
            recommendations.push("Arc consistency already proves this puzzle has no fill".to_string());
        } else if search_space_log10 > 30.0 {
            recommendations.push("Search space is very large - consider a node or time budget".to_string());
        }

        if recommendations.is_empty() {
            recommendations.push("Puzzle looks reasonable to solve".to_string());
        }

        recommendations
    }
}

/// Structural statistics of a puzzle and its word list
#[derive(Debug, Clone)]
pub struct PuzzleAnalysis {
    pub width: usize,
    pub height: usize,
    pub open_cells: usize,
    pub variable_count: usize,
    pub crossings: usize,
    pub word_count: usize,
    /// Slot length -> number of slots
    pub slot_lengths: BTreeMap<usize, usize>,
    /// Word length -> number of words
    pub words_by_length: BTreeMap<usize, usize>,
    pub node_consistent_sizes: Vec<usize>,
    pub arc_consistent_sizes: Vec<usize>,
    /// Whether AC-3 left every domain non-empty
    pub arc_consistent: bool,
    /// log10 of the product of domain sizes after AC-3
    pub search_space_log10: f64,
    pub recommendations: Vec<String>,
}

impl std::fmt::Display for PuzzleAnalysis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Puzzle Analysis:")?;
        writeln!(f, "  Grid: {}x{} ({} open cells)", self.width, self.height, self.open_cells)?;
        writeln!(f, "  Slots: {} ({} crossings)", self.variable_count, self.crossings)?;
        writeln!(f, "  Words: {}", self.word_count)?;
        writeln!(f, "  Slot lengths:")?;
        for (length, slots) in &self.slot_lengths {
            let words = self.words_by_length.get(length).copied().unwrap_or(0);
            writeln!(f, "    {:2} letters: {} slots, {} words", length, slots, words)?;
        }
        writeln!(
            f,
            "  Candidates after node consistency: {}",
            self.node_consistent_sizes.iter().sum::<usize>()
        )?;
        if self.arc_consistent {
            writeln!(
                f,
                "  Candidates after arc consistency: {}",
                self.arc_consistent_sizes.iter().sum::<usize>()
            )?;
            writeln!(f, "  Search space: ~10^{:.1}", self.search_space_log10)?;
        } else {
            writeln!(f, "  Arc consistency: unsatisfiable")?;
        }
        writeln!(f, "  Recommendations:")?;
        for rec in &self.recommendations {
            writeln!(f, "    - {}", rec)?;
        }
        Ok(())
    }
}

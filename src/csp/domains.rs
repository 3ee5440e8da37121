//! Per-variable candidate word sets

use crate::crossword::{Variable, VariableId};
use std::collections::BTreeSet;

/// Candidate words for every variable, indexed by [`VariableId`].
///
/// Each variable owns an independent set, so pruning one never affects
/// another. Sets only ever shrink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domains {
    sets: Vec<BTreeSet<String>>,
}

impl Domains {
    /// Give every variable its own copy of the full, unfiltered word list
    pub fn initialize(variables: &[Variable], words: &BTreeSet<String>) -> Self {
        Self {
            sets: variables.iter().map(|_| words.clone()).collect(),
        }
    }

    pub fn get(&self, var: VariableId) -> &BTreeSet<String> {
        &self.sets[var]
    }

    pub fn len(&self, var: VariableId) -> usize {
        self.sets[var].len()
    }

    pub fn is_empty(&self, var: VariableId) -> bool {
        self.sets[var].is_empty()
    }

    /// Whether any variable has run out of candidates
    pub fn any_empty(&self) -> bool {
        self.sets.iter().any(BTreeSet::is_empty)
    }

    pub fn contains(&self, var: VariableId, word: &str) -> bool {
        self.sets[var].contains(word)
    }

    /// Keep only the words of `var` matching `keep`, returning how many were removed
    pub fn retain<F>(&mut self, var: VariableId, mut keep: F) -> usize
    where
        F: FnMut(&str) -> bool,
    {
        let before = self.sets[var].len();
        self.sets[var].retain(|word| keep(word));
        before - self.sets[var].len()
    }

    /// Number of variables tracked
    pub fn variable_count(&self) -> usize {
        self.sets.len()
    }

    /// Sum of all domain sizes
    pub fn total_candidates(&self) -> usize {
        self.sets.iter().map(BTreeSet::len).sum()
    }

    /// Domain sizes in variable order
    pub fn sizes(&self) -> Vec<usize> {
        self.sets.iter().map(BTreeSet::len).collect()
    }
}

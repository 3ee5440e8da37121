//! Partial mapping from variables to chosen words

use crate::crossword::VariableId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Words chosen so far during search, keyed by variable
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    words: BTreeMap<VariableId, String>,
}

impl Assignment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Assign `word` to `var`, returning the previous word if any
    pub fn assign(&mut self, var: VariableId, word: impl Into<String>) -> Option<String> {
        self.words.insert(var, word.into())
    }

    /// Undo an assignment
    pub fn unassign(&mut self, var: VariableId) -> Option<String> {
        self.words.remove(&var)
    }

    pub fn get(&self, var: VariableId) -> Option<&str> {
        self.words.get(&var).map(String::as_str)
    }

    pub fn is_assigned(&self, var: VariableId) -> bool {
        self.words.contains_key(&var)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Assigned `(variable, word)` pairs in variable order
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, &str)> {
        self.words.iter().map(|(&var, word)| (var, word.as_str()))
    }
}

impl FromIterator<(VariableId, String)> for Assignment {
    fn from_iter<I: IntoIterator<Item = (VariableId, String)>>(iter: I) -> Self {
        Self {
            words: iter.into_iter().collect(),
        }
    }
}

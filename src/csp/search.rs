//! Backtracking search with MRV/degree variable ordering and LCV value ordering

use super::{Assignment, Domains};
use crate::crossword::{Crossword, VariableId};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::collections::HashSet;
use std::time::{Duration, Instant};

/// Optional budgets bounding a search. Exceeding either aborts the search,
/// which is reported like an unsatisfiable puzzle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchLimits {
    pub max_nodes: Option<u64>,
    pub time_limit: Option<Duration>,
}

impl SearchLimits {
    pub fn unlimited() -> Self {
        Self::default()
    }
}

/// Why a solve finished
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    Solved,
    Unsatisfiable,
    NodeLimit,
    TimeLimit,
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Termination::Solved => write!(f, "solved"),
            Termination::Unsatisfiable => write!(f, "unsatisfiable"),
            Termination::NodeLimit => write!(f, "node limit reached"),
            Termination::TimeLimit => write!(f, "time limit reached"),
        }
    }
}

/// Counters collected during backtracking
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchStatistics {
    /// Variables expanded
    pub nodes: u64,
    /// Values tried
    pub assignments_tried: u64,
    /// Variables whose values were all exhausted
    pub backtracks: u64,
    pub max_depth: usize,
}

/// Whether every variable of the crossword has a word
pub fn assignment_complete(crossword: &Crossword, assignment: &Assignment) -> bool {
    (0..crossword.variable_count()).all(|var| assignment.is_assigned(var))
}

/// Whether the assignment respects lengths, word uniqueness and crossings
pub fn consistent(crossword: &Crossword, assignment: &Assignment) -> bool {
    let mut used = HashSet::with_capacity(assignment.len());

    for (var, word) in assignment.iter() {
        if word.chars().count() != crossword.variable(var).length {
            return false;
        }

        if !used.insert(word) {
            return false;
        }

        for &neighbor in crossword.neighbors(var) {
            let (Some(other), Some((i, j))) = (assignment.get(neighbor), crossword.overlap(var, neighbor)) else {
                continue;
            };
            if word.chars().nth(i) != other.chars().nth(j) {
                return false;
            }
        }
    }

    true
}

/// Pick the unassigned variable with the fewest candidates, then the most
/// neighbors, then the lowest id. `None` once everything is assigned.
pub fn select_unassigned_variable(
    crossword: &Crossword,
    domains: &Domains,
    assignment: &Assignment,
) -> Option<VariableId> {
    (0..crossword.variable_count())
        .filter(|&var| !assignment.is_assigned(var))
        .min_by_key(|&var| (domains.len(var), Reverse(crossword.degree(var))))
}

/// Candidates of `var` ordered by how many neighboring domains also hold the
/// same word (choosing it would rule the word out there). Ties keep the
/// lexicographic domain order.
pub fn order_domain_values(crossword: &Crossword, domains: &Domains, var: VariableId) -> Vec<String> {
    let neighbors = crossword.neighbors(var);

    let mut ranked: Vec<(usize, &String)> = domains
        .get(var)
        .iter()
        .map(|word| {
            let ruled_out = neighbors
                .iter()
                .filter(|&&neighbor| domains.contains(neighbor, word))
                .count();
            (ruled_out, word)
        })
        .collect();

    ranked.sort_by_key(|&(ruled_out, _)| ruled_out);
    ranked.into_iter().map(|(_, word)| word.clone()).collect()
}

/// Depth-first search over a fixed set of domains
pub struct BacktrackingSearch<'a> {
    crossword: &'a Crossword,
    domains: &'a Domains,
    limits: SearchLimits,
    started: Instant,
    stats: SearchStatistics,
    aborted: Option<Termination>,
}

impl<'a> BacktrackingSearch<'a> {
    pub fn new(crossword: &'a Crossword, domains: &'a Domains, limits: SearchLimits) -> Self {
        Self {
            crossword,
            domains,
            limits,
            started: Instant::now(),
            stats: SearchStatistics::default(),
            aborted: None,
        }
    }

    /// Search from an empty assignment
    pub fn run(&mut self) -> Option<Assignment> {
        self.started = Instant::now();
        let mut assignment = Assignment::new();

        if self.backtrack(&mut assignment) {
            debug!("search solved after {} nodes", self.stats.nodes);
            Some(assignment)
        } else {
            debug!("search failed after {} nodes ({})", self.stats.nodes, self.termination(false));
            None
        }
    }

    /// Extend `assignment` to a complete, consistent one. On success the
    /// assignment is left complete; on failure it is restored to its input state.
    pub fn backtrack(&mut self, assignment: &mut Assignment) -> bool {
        if assignment_complete(self.crossword, assignment) {
            return true;
        }

        if self.limit_reached() {
            return false;
        }

        let Some(var) = select_unassigned_variable(self.crossword, self.domains, assignment) else {
            return true;
        };

        self.stats.nodes += 1;
        self.stats.max_depth = self.stats.max_depth.max(assignment.len() + 1);
        trace!("expanding {} with {} candidates", self.crossword.variable(var), self.domains.len(var));

        for value in order_domain_values(self.crossword, self.domains, var) {
            self.stats.assignments_tried += 1;
            assignment.assign(var, value);

            if consistent(self.crossword, assignment) && self.backtrack(assignment) {
                return true;
            }

            assignment.unassign(var);

            if self.aborted.is_some() {
                return false;
            }
        }

        self.stats.backtracks += 1;
        false
    }

    fn limit_reached(&mut self) -> bool {
        if self.aborted.is_some() {
            return true;
        }

        if self.limits.max_nodes.is_some_and(|max| self.stats.nodes >= max) {
            self.aborted = Some(Termination::NodeLimit);
        } else if self.limits.time_limit.is_some_and(|limit| self.started.elapsed() >= limit) {
            self.aborted = Some(Termination::TimeLimit);
        }

        if let Some(reason) = self.aborted {
            debug!("search aborted: {}", reason);
        }
        self.aborted.is_some()
    }

    pub fn statistics(&self) -> SearchStatistics {
        self.stats
    }

    /// How the last run ended, given whether it produced a solution
    pub fn termination(&self, solved: bool) -> Termination {
        if solved {
            Termination::Solved
        } else {
            self.aborted.unwrap_or(Termination::Unsatisfiable)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::parse_structure_from_string;
    use crate::csp::ConsistencyEngine;
    use std::collections::BTreeSet;

    fn words(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn setup(structure: &str, list: &[&str]) -> (Crossword, Domains) {
        let crossword = parse_structure_from_string(structure).unwrap();
        let domains = Domains::initialize(crossword.variables(), &words(list));
        (crossword, domains)
    }

    fn assignment(pairs: &[(VariableId, &str)]) -> Assignment {
        pairs.iter().map(|&(var, word)| (var, word.to_string())).collect()
    }

    const CROSS: &str = "#_#\n___\n#_#\n";

    #[test]
    fn test_consistent_checks_overlap() {
        let (crossword, _) = setup(CROSS, &[]);

        assert!(consistent(&crossword, &assignment(&[(0, "CAR"), (1, "CAT")])));
        assert!(!consistent(&crossword, &assignment(&[(0, "CAR"), (1, "ART")])));
        assert!(consistent(&crossword, &Assignment::new()));
    }

    #[test]
    fn test_consistent_checks_length_and_uniqueness() {
        let (crossword, _) = setup("___\n###\n___\n", &[]);

        assert!(!consistent(&crossword, &assignment(&[(0, "CATS")])));
        assert!(!consistent(&crossword, &assignment(&[(0, "CAT"), (1, "CAT")])));
        assert!(consistent(&crossword, &assignment(&[(0, "CAT"), (1, "DOG")])));
    }

    #[test]
    fn test_assignment_complete() {
        let (crossword, _) = setup(CROSS, &[]);
        assert!(!assignment_complete(&crossword, &assignment(&[(0, "CAR")])));
        assert!(assignment_complete(&crossword, &assignment(&[(0, "CAR"), (1, "CAT")])));
    }

    #[test]
    fn test_select_prefers_fewest_candidates() {
        let (crossword, mut domains) = setup(CROSS, &["CAT", "CAR", "ART"]);
        domains.retain(1, |word| word != "ART");

        assert_eq!(select_unassigned_variable(&crossword, &domains, &Assignment::new()), Some(1));
    }

    #[test]
    fn test_select_breaks_ties_by_degree() {
        // (0, 0) across has no crossings; (0, 3) down and (0, 3) across cross each other
        let (crossword, mut domains) = setup("__#___\n###_##\n###_##\n", &["AB", "AC", "CAT", "COW"]);
        let mut engine = ConsistencyEngine::new(&crossword);
        engine.enforce_node_consistency(&mut domains);

        assert_eq!(crossword.degree(0), 0);
        assert_eq!(domains.sizes(), vec![2, 2, 2]);
        assert_eq!(select_unassigned_variable(&crossword, &domains, &Assignment::new()), Some(1));
    }

    #[test]
    fn test_select_falls_back_to_declaration_order() {
        let (crossword, domains) = setup(CROSS, &["CAT"]);
        assert_eq!(select_unassigned_variable(&crossword, &domains, &Assignment::new()), Some(0));
        assert_eq!(select_unassigned_variable(&crossword, &domains, &assignment(&[(0, "CAT")])), Some(1));
        assert_eq!(
            select_unassigned_variable(&crossword, &domains, &assignment(&[(0, "CAT"), (1, "CAT")])),
            None
        );
    }

    #[test]
    fn test_order_domain_values_least_constraining_first() {
        let (crossword, mut domains) = setup(CROSS, &["ANT", "BAT", "CAT"]);
        domains.retain(0, |word| word != "CAT");
        domains.retain(1, |word| word != "BAT");

        // ANT also sits in the across domain; BAT does not
        assert_eq!(order_domain_values(&crossword, &domains, 0), vec!["BAT", "ANT"]);
    }

    #[test]
    fn test_order_domain_values_ties_keep_domain_order() {
        let (crossword, domains) = setup(CROSS, &["CAT", "ANT", "BAT"]);
        assert_eq!(order_domain_values(&crossword, &domains, 0), vec!["ANT", "BAT", "CAT"]);
    }

    #[test]
    fn test_backtrack_restores_assignment_on_failure() {
        let (crossword, domains) = setup("___\n###\n___\n", &["CAT"]);
        let mut search = BacktrackingSearch::new(&crossword, &domains, SearchLimits::unlimited());
        let mut partial = Assignment::new();

        assert!(!search.backtrack(&mut partial));
        assert!(partial.is_empty());
        assert_eq!(search.termination(false), Termination::Unsatisfiable);
    }

    #[test]
    fn test_run_finds_crossing_pair() {
        let (crossword, domains) = setup(CROSS, &["CAT", "CAR", "ART", "ANT"]);
        let mut search = BacktrackingSearch::new(&crossword, &domains, SearchLimits::unlimited());

        let solution = search.run().unwrap();
        assert_eq!(solution.get(0), Some("CAR"));
        assert_eq!(solution.get(1), Some("CAT"));
        assert!(search.statistics().backtracks > 0);
    }

    #[test]
    fn test_node_limit_aborts_search() {
        let (crossword, domains) = setup(CROSS, &["CAT", "CAR", "ART", "ANT"]);
        let limits = SearchLimits {
            max_nodes: Some(1),
            time_limit: None,
        };
        let mut search = BacktrackingSearch::new(&crossword, &domains, limits);

        assert!(search.run().is_none());
        assert_eq!(search.termination(false), Termination::NodeLimit);
        assert_eq!(search.statistics().nodes, 1);
    }

    #[test]
    fn test_zero_time_limit_aborts_immediately() {
        let (crossword, domains) = setup(CROSS, &["CAT", "CAR"]);
        let limits = SearchLimits {
            max_nodes: None,
            time_limit: Some(Duration::ZERO),
        };
        let mut search = BacktrackingSearch::new(&crossword, &domains, limits);

        assert!(search.run().is_none());
        assert_eq!(search.termination(false), Termination::TimeLimit);
        assert_eq!(search.statistics().nodes, 0);
    }
}

//! Node consistency and AC-3 arc consistency over crossword domains

use super::Domains;
use crate::crossword::{Crossword, VariableId};
use itertools::iproduct;
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

/// An ordered pair `(x, y)`: make `x` consistent with `y`
pub type Arc = (VariableId, VariableId);

/// Counters collected while pruning domains
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropagationStatistics {
    /// Words dropped for having the wrong length
    pub node_removals: usize,
    /// Arcs taken off the AC-3 queue
    pub arcs_processed: usize,
    /// Revisions that removed at least one word
    pub revisions: usize,
    /// Words dropped by arc revisions
    pub arc_removals: usize,
}

/// Prunes [`Domains`] against the unary and binary constraints of a crossword
#[derive(Debug)]
pub struct ConsistencyEngine<'a> {
    crossword: &'a Crossword,
    stats: PropagationStatistics,
}

impl<'a> ConsistencyEngine<'a> {
    pub fn new(crossword: &'a Crossword) -> Self {
        Self {
            crossword,
            stats: PropagationStatistics::default(),
        }
    }

    pub fn statistics(&self) -> PropagationStatistics {
        self.stats
    }

    /// Remove every word whose length differs from its variable's length.
    /// May leave a domain empty; that is detected by [`Self::ac3`].
    pub fn enforce_node_consistency(&mut self, domains: &mut Domains) {
        for (var, variable) in self.crossword.variables().iter().enumerate() {
            let length = variable.length;
            let removed = domains.retain(var, |word| word.chars().count() == length);
            self.stats.node_removals += removed;
        }

        debug!(
            "node consistency removed {} candidates, {} remain",
            self.stats.node_removals,
            domains.total_candidates()
        );
    }

    /// Make `x` arc consistent with `y`: drop each word of `x` whose letter at
    /// the overlap has no match in any word of `y`. Only `x` is modified.
    ///
    /// Returns whether anything was removed; `false` when `x` and `y` do not cross.
    pub fn revise(&mut self, domains: &mut Domains, x: VariableId, y: VariableId) -> bool {
        let Some((i, j)) = self.crossword.overlap(x, y) else {
            return false;
        };

        let supported: HashSet<char> = domains
            .get(y)
            .iter()
            .filter_map(|word| word.chars().nth(j))
            .collect();

        let removed = domains.retain(x, |word| {
            word.chars().nth(i).is_some_and(|letter| supported.contains(&letter))
        });

        if removed == 0 {
            return false;
        }

        self.stats.revisions += 1;
        self.stats.arc_removals += removed;
        trace!("revise({}, {}) removed {} words, {} left", x, y, removed, domains.len(x));
        true
    }

    /// Enforce arc consistency with the AC-3 worklist algorithm.
    ///
    /// Starts from `arcs`, or from every ordered pair of distinct variables
    /// when `None`. Returns `false` as soon as any domain is empty.
    pub fn ac3(&mut self, domains: &mut Domains, arcs: Option<Vec<Arc>>) -> bool {
        if domains.any_empty() {
            debug!("ac3: a domain is already empty");
            return false;
        }

        let mut queue: VecDeque<Arc> = match arcs {
            Some(arcs) => arcs.into(),
            None => self.all_arcs().into(),
        };
        debug!("ac3 starting with {} arcs", queue.len());

        while let Some((x, y)) = queue.pop_front() {
            self.stats.arcs_processed += 1;

            if self.revise(domains, x, y) {
                if domains.is_empty(x) {
                    debug!("ac3: domain of {} emptied", self.crossword.variable(x));
                    return false;
                }

                queue.extend(
                    self.crossword
                        .neighbors(x)
                        .iter()
                        .filter(|&&z| z != y)
                        .map(|&z| (z, x)),
                );
            }
        }

        debug!(
            "ac3 reached fixpoint after {} arcs, {} candidates remain",
            self.stats.arcs_processed,
            domains.total_candidates()
        );
        true
    }

    /// Every ordered pair of distinct variables
    pub fn all_arcs(&self) -> Vec<Arc> {
        let count = self.crossword.variable_count();
        iproduct!(0..count, 0..count).filter(|(x, y)| x != y).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crossword::parse_structure_from_string;
    use std::collections::BTreeSet;

    fn words(list: &[&str]) -> BTreeSet<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn setup(structure: &str, list: &[&str]) -> (Crossword, Domains) {
        let crossword = parse_structure_from_string(structure).unwrap();
        let domains = Domains::initialize(crossword.variables(), &words(list));
        (crossword, domains)
    }

    // (0, 1) down and (1, 0) across, crossing at letter 1 of each
    const CROSS: &str = "#_#\n___\n#_#\n";

    #[test]
    fn test_node_consistency_prunes_lengths() {
        let (crossword, mut domains) = setup("___\n", &["CAT", "DOG", "AB", "HORSE"]);
        let mut engine = ConsistencyEngine::new(&crossword);

        engine.enforce_node_consistency(&mut domains);

        assert_eq!(domains.get(0), &words(&["CAT", "DOG"]));
        assert_eq!(engine.statistics().node_removals, 2);
    }

    #[test]
    fn test_node_consistency_counts_characters() {
        let (crossword, mut domains) = setup("___\n", &["ÉTÉ", "EAU"]);
        let mut engine = ConsistencyEngine::new(&crossword);

        engine.enforce_node_consistency(&mut domains);
        assert_eq!(domains.len(0), 2);
    }

    #[test]
    fn test_revise_only_shrinks_x() {
        let (crossword, mut domains) = setup(CROSS, &["CAT", "CAR", "ART", "ANT"]);
        let mut engine = ConsistencyEngine::new(&crossword);
        domains.retain(1, |word| word == "ART");

        assert!(engine.revise(&mut domains, 0, 1));
        assert_eq!(domains.get(0), &words(&["ART"]));
        assert_eq!(domains.get(1), &words(&["ART"]));

        // Already consistent
        assert!(!engine.revise(&mut domains, 0, 1));
    }

    #[test]
    fn test_revise_without_overlap_is_noop() {
        let (crossword, mut domains) = setup("___\n###\n___\n", &["CAT", "DOG"]);
        let mut engine = ConsistencyEngine::new(&crossword);
        domains.retain(1, |word| word == "DOG");

        assert!(!engine.revise(&mut domains, 0, 1));
        assert_eq!(domains.len(0), 2);
    }

    #[test]
    fn test_ac3_detects_empty_domain_after_node_consistency() {
        let (crossword, mut domains) = setup(CROSS, &[]);
        let mut engine = ConsistencyEngine::new(&crossword);

        engine.enforce_node_consistency(&mut domains);
        assert!(!engine.ac3(&mut domains, None));
        assert_eq!(engine.statistics().arcs_processed, 0);
    }

    #[test]
    fn test_ac3_fails_when_revision_empties_domain() {
        // Down slot of length 3 crosses an across slot of length 4 at letter 1 of each
        let (crossword, mut domains) = setup("#_##\n____\n#_##\n", &["CAT", "DOGS"]);
        let mut engine = ConsistencyEngine::new(&crossword);

        engine.enforce_node_consistency(&mut domains);
        assert!(!engine.ac3(&mut domains, None));
    }

    #[test]
    fn test_ac3_prunes_unsupported_words() {
        // Down slot ends where the across slot starts
        let (crossword, mut domains) = setup("_##\n_##\n___\n", &["CAT", "TOE", "DOG"]);
        let mut engine = ConsistencyEngine::new(&crossword);
        engine.enforce_node_consistency(&mut domains);

        assert!(engine.ac3(&mut domains, None));
        assert_eq!(domains.get(0), &words(&["CAT"]));
        assert_eq!(domains.get(1), &words(&["TOE"]));
        assert_eq!(engine.statistics().arc_removals, 4);
        assert_eq!(engine.statistics().revisions, 2);
    }

    #[test]
    fn test_ac3_is_idempotent() {
        let (crossword, mut domains) = setup("____\n_##_\n____\n", &["CAT", "COLD", "DOE", "TREE", "DOG", "CATS"]);
        let mut engine = ConsistencyEngine::new(&crossword);
        engine.enforce_node_consistency(&mut domains);

        assert!(engine.ac3(&mut domains, None));
        let settled = domains.clone();
        let removals = engine.statistics().arc_removals;

        assert!(engine.ac3(&mut domains, None));
        assert_eq!(domains, settled);
        assert_eq!(engine.statistics().arc_removals, removals);
    }

    #[test]
    fn test_ac3_with_explicit_arcs() {
        let (crossword, mut domains) = setup(CROSS, &["CAT", "BOX", "AXE"]);
        let mut engine = ConsistencyEngine::new(&crossword);
        engine.enforce_node_consistency(&mut domains);
        domains.retain(1, |word| word == "BOX");

        assert!(engine.ac3(&mut domains, Some(vec![(0, 1)])));
        assert_eq!(domains.get(0), &words(&["BOX"]));
    }

    #[test]
    fn test_ac3_propagates_along_a_chain() {
        // 0 down crosses 1 across at (1, 0); 1 crosses 2 down at (1, 2)
        let (crossword, mut domains) = setup("_##\n___\n##_\n", &["CAT", "DOG", "AC", "AD", "TO"]);
        let mut engine = ConsistencyEngine::new(&crossword);
        engine.enforce_node_consistency(&mut domains);

        assert!(engine.ac3(&mut domains, Some(vec![(1, 2)])));

        // DOG loses its support in 2, which leaves only AC supported in 0
        assert_eq!(domains.get(1), &words(&["CAT"]));
        assert_eq!(domains.get(0), &words(&["AC"]));
        // (2, 1) is never queued, so 2 keeps its full domain
        assert_eq!(domains.get(2), &words(&["AC", "AD", "TO"]));
        assert_eq!(engine.statistics().arcs_processed, 2);
    }

    #[test]
    fn test_all_arcs() {
        let (crossword, _) = setup("____\n_##_\n____\n", &[]);
        let engine = ConsistencyEngine::new(&crossword);
        let arcs = engine.all_arcs();

        assert_eq!(arcs.len(), 12);
        assert!(!arcs.iter().any(|(x, y)| x == y));
        assert_eq!(arcs[0], (0, 1));
    }
}

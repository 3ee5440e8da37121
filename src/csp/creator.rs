//! Solving session tying the domain store, consistency engine and search together

use super::consistency::{Arc, ConsistencyEngine, PropagationStatistics};
use super::search::{self, BacktrackingSearch, SearchLimits, SearchStatistics, Termination};
use super::{Assignment, Domains};
use crate::crossword::{Crossword, VariableId};
use log::info;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::time::{Duration, Instant};

/// Everything measured during one call to [`CrosswordCreator::solve`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveStatistics {
    pub propagation: PropagationStatistics,
    pub search: SearchStatistics,
    pub termination: Termination,
    #[serde(skip)]
    pub elapsed: Duration,
}

impl std::fmt::Display for SolveStatistics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Solve Statistics:")?;
        writeln!(f, "  Result: {}", self.termination)?;
        writeln!(f, "  Node consistency removals: {}", self.propagation.node_removals)?;
        writeln!(f, "  Arcs processed: {}", self.propagation.arcs_processed)?;
        writeln!(f, "  Arc removals: {} ({} revisions)", self.propagation.arc_removals, self.propagation.revisions)?;
        writeln!(f, "  Search nodes: {}", self.search.nodes)?;
        writeln!(f, "  Values tried: {}", self.search.assignments_tried)?;
        writeln!(f, "  Backtracks: {}", self.search.backtracks)?;
        writeln!(f, "  Max depth: {}", self.search.max_depth)?;
        write!(f, "  Time: {:.3}s", self.elapsed.as_secs_f64())
    }
}

/// A single solving session over one crossword and word list.
///
/// Owns its [`Domains`]; they are discarded with the creator.
pub struct CrosswordCreator<'a> {
    crossword: &'a Crossword,
    domains: Domains,
    engine: ConsistencyEngine<'a>,
    limits: SearchLimits,
    arc_consistency: bool,
    statistics: Option<SolveStatistics>,
}

impl<'a> CrosswordCreator<'a> {
    pub fn new(crossword: &'a Crossword, words: &BTreeSet<String>) -> Self {
        Self {
            crossword,
            domains: Domains::initialize(crossword.variables(), words),
            engine: ConsistencyEngine::new(crossword),
            limits: SearchLimits::unlimited(),
            arc_consistency: true,
            statistics: None,
        }
    }

    /// Bound the backtracking phase
    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Skip the AC-3 pass (node consistency still runs)
    pub fn with_arc_consistency(mut self, enabled: bool) -> Self {
        self.arc_consistency = enabled;
        self
    }

    pub fn crossword(&self) -> &Crossword {
        self.crossword
    }

    pub fn domains(&self) -> &Domains {
        &self.domains
    }

    /// Statistics of the last [`Self::solve`] call
    pub fn statistics(&self) -> Option<SolveStatistics> {
        self.statistics
    }

    /// Enforce node and arc consistency, then search for a complete assignment.
    /// `None` means no solution exists (or a search limit was hit).
    pub fn solve(&mut self) -> Option<Assignment> {
        let started = Instant::now();

        self.enforce_node_consistency();

        let (result, search_stats, termination) = if self.arc_consistency && !self.ac3(None) {
            (None, SearchStatistics::default(), Termination::Unsatisfiable)
        } else {
            let mut search = BacktrackingSearch::new(self.crossword, &self.domains, self.limits);
            let result = search.run();
            let termination = search.termination(result.is_some());
            (result, search.statistics(), termination)
        };

        self.record(search_stats, termination, started);
        info!(
            "solve finished: {} after {} search nodes in {:.3}s",
            termination,
            search_stats.nodes,
            started.elapsed().as_secs_f64()
        );

        result
    }

    fn record(&mut self, search: SearchStatistics, termination: Termination, started: Instant) {
        self.statistics = Some(SolveStatistics {
            propagation: self.engine.statistics(),
            search,
            termination,
            elapsed: started.elapsed(),
        });
    }

    pub fn enforce_node_consistency(&mut self) {
        self.engine.enforce_node_consistency(&mut self.domains);
    }

    pub fn revise(&mut self, x: VariableId, y: VariableId) -> bool {
        self.engine.revise(&mut self.domains, x, y)
    }

    pub fn ac3(&mut self, arcs: Option<Vec<Arc>>) -> bool {
        self.engine.ac3(&mut self.domains, arcs)
    }

    pub fn assignment_complete(&self, assignment: &Assignment) -> bool {
        search::assignment_complete(self.crossword, assignment)
    }

    pub fn consistent(&self, assignment: &Assignment) -> bool {
        search::consistent(self.crossword, assignment)
    }

    pub fn order_domain_values(&self, var: VariableId) -> Vec<String> {
        search::order_domain_values(self.crossword, &self.domains, var)
    }

    pub fn select_unassigned_variable(&self, assignment: &Assignment) -> Option<VariableId> {
        search::select_unassigned_variable(self.crossword, &self.domains, assignment)
    }

    /// Backtrack from `assignment` over the current domains, without limits
    pub fn backtrack(&self, assignment: &mut Assignment) -> bool {
        BacktrackingSearch::new(self.crossword, &self.domains, SearchLimits::unlimited()).backtrack(assignment)
    }
}

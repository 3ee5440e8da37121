//! Constraint satisfaction engine for filling crosswords

pub mod domains;
pub mod assignment;
pub mod consistency;
pub mod search;
pub mod creator;

pub use domains::Domains;
pub use assignment::Assignment;
pub use consistency::{Arc, ConsistencyEngine, PropagationStatistics};
pub use search::{BacktrackingSearch, SearchLimits, SearchStatistics, Termination};
pub use creator::{CrosswordCreator, SolveStatistics};

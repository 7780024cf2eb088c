//! SMT Solver Implementations
//!
//! 1. **EnumerativeSolver**: finite-domain search, always available
//! 2. **Z3Backend**: full SMT solver (optional, feature-gated)

use crate::features::smt::domain::{Formula, VarId};
use std::collections::BTreeMap;

pub mod enumerative;

#[cfg(feature = "z3")]
pub mod z3_backend;

pub use enumerative::EnumerativeSolver;

#[cfg(feature = "z3")]
pub use z3_backend::Z3Backend;

/// Incremental integer constraint solver
///
/// One instance is owned by one analysis. Declarations and assertions made
/// after a `push` are discarded by the matching `pop`.
pub trait ConstraintSolver {
    /// Name of this solver
    fn name(&self) -> &'static str;

    /// Declare a fresh integer variable
    fn declare_int(&mut self, name: &str) -> VarId;

    /// Add a constraint to the current scope
    fn assert(&mut self, formula: Formula);

    /// Open a scope
    fn push(&mut self);

    /// Close the innermost scope
    fn pop(&mut self);

    /// Number of open scopes
    fn scope_depth(&self) -> usize;

    /// Check satisfiability of everything asserted so far
    fn check(&mut self) -> SolverResult;
}

/// Solver result
#[derive(Debug, Clone, PartialEq)]
pub enum SolverResult {
    /// Satisfiable (with optional model/assignment)
    Sat(Option<Model>),

    /// Unsatisfiable (contradiction)
    Unsat,

    /// Unknown (timeout, budget, unsupported), with the solver's reason
    Unknown(String),
}

impl SolverResult {
    pub fn is_sat(&self) -> bool {
        matches!(self, SolverResult::Sat(_))
    }

    pub fn is_unsat(&self) -> bool {
        matches!(self, SolverResult::Unsat)
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, SolverResult::Unknown(_))
    }
}

/// Variable assignment model, keyed by declared name
pub type Model = BTreeMap<String, i64>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_result_predicates() {
        assert!(SolverResult::Sat(None).is_sat());
        assert!(SolverResult::Unsat.is_unsat());
        assert!(SolverResult::Unknown("timeout".to_string()).is_unknown());
        assert!(!SolverResult::Unsat.is_sat());
    }
}

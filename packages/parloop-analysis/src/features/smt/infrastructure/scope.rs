//! Scoped solver state
//!
//! `SolverScope` pushes on creation and pops on drop, so a query's
//! constraints are released on every exit path, `?` included.

use super::solvers::ConstraintSolver;
use std::ops::{Deref, DerefMut};

/// Guard for one push/pop frame
pub struct SolverScope<'a, S: ConstraintSolver + ?Sized> {
    solver: &'a mut S,
    depth: usize,
}

impl<'a, S: ConstraintSolver + ?Sized> SolverScope<'a, S> {
    /// Push a frame on `solver`
    pub fn enter(solver: &'a mut S) -> Self {
        solver.push();
        let depth = solver.scope_depth();
        Self { solver, depth }
    }

    /// Depth of this frame (1 for the first scope above the base)
    pub fn depth(&self) -> usize {
        self.depth
    }
}

impl<S: ConstraintSolver + ?Sized> Deref for SolverScope<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.solver
    }
}

impl<S: ConstraintSolver + ?Sized> DerefMut for SolverScope<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.solver
    }
}

impl<S: ConstraintSolver + ?Sized> Drop for SolverScope<'_, S> {
    fn drop(&mut self) {
        debug_assert_eq!(
            self.solver.scope_depth(),
            self.depth,
            "inner scope outlived its parent"
        );
        self.solver.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::smt::domain::{Formula, Term};
    use crate::features::smt::infrastructure::solvers::{EnumerativeSolver, SolverResult};

    #[test]
    fn test_scope_pops_on_drop() {
        let mut solver = EnumerativeSolver::new(1_000);
        let x = Term::var(solver.declare_int("x"));
        solver.assert(Formula::within(x.clone(), Term::constant(0), Term::constant(3)));

        {
            let mut scope = SolverScope::enter(&mut solver);
            assert_eq!(scope.depth(), 1);
            scope.assert(Formula::eq(x.clone(), Term::constant(7)));
            assert_eq!(scope.check(), SolverResult::Unsat);
        }

        assert_eq!(solver.scope_depth(), 0);
        assert!(solver.check().is_sat());
    }

    #[test]
    fn test_scope_pops_on_error_path() {
        fn failing_query(solver: &mut EnumerativeSolver) -> Result<(), String> {
            let mut scope = SolverScope::enter(solver);
            scope.assert(Formula::eq(Term::constant(0), Term::constant(1)));
            let aborted: Result<(), String> = Err("query aborted".to_string());
            aborted?;
            Ok(())
        }

        let mut solver = EnumerativeSolver::new(1_000);
        assert!(failing_query(&mut solver).is_err());
        assert_eq!(solver.scope_depth(), 0);
        assert!(solver.check().is_sat());
    }

    #[test]
    fn test_nested_scopes_unwind_in_order() {
        let mut solver = EnumerativeSolver::new(1_000);
        {
            let mut outer = SolverScope::enter(&mut solver);
            {
                let inner = SolverScope::enter(&mut *outer);
                assert_eq!(inner.depth(), 2);
            }
            assert_eq!(outer.scope_depth(), 1);
        }
        assert_eq!(solver.scope_depth(), 0);
    }
}

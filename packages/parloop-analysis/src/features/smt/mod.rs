//! SMT (Satisfiability Modulo Theories) Module
//!
//! Solver-independent integer terms and formulas, a single-owner solver
//! handle with guarded push/pop scopes, and the backends.
//!
//! ## Architecture
//!
//! ```text
//! smt
//! ├── domain/               # Term, Formula, VarId
//! └── infrastructure/
//!     ├── scope             # SolverScope guard (push on enter, pop on drop)
//!     └── solvers/          # ConstraintSolver trait + backends
//!         ├── enumerative   # finite-domain search (default)
//!         └── z3_backend    # Z3 (feature `z3`)
//! ```

pub mod domain;
pub mod infrastructure;

pub use domain::{ArithOp, CmpOp, EvalFault, Formula, Term, VarId};
pub use infrastructure::{
    ConstraintSolver, EnumerativeSolver, Model, SolverResult, SolverScope,
};

#[cfg(feature = "z3")]
pub use infrastructure::Z3Backend;

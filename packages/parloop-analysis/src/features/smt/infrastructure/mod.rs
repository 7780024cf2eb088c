//! Solver handle and backends

pub mod scope;
pub mod solvers;

pub use scope::SolverScope;
pub use solvers::{ConstraintSolver, EnumerativeSolver, Model, SolverResult};

#[cfg(feature = "z3")]
pub use solvers::Z3Backend;

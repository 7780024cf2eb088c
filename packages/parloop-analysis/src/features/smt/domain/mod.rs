//! SMT Domain Models

pub mod term;

pub use term::{ArithOp, CmpOp, EvalFault, Formula, Term, VarId};

//! Structural Access Model
//!
//! One modeled loop nest: the outer `LoopSpec`, any nested loop headers, and
//! the ordered read/write `Access` records of the body.

pub mod domain;
pub mod infrastructure;

pub use domain::{
    Access, AccessKind, AccessModel, BinaryOperator, ConstantEnv, Expr, LoopId, LoopSpec,
};
pub use infrastructure::AccessExtractor;

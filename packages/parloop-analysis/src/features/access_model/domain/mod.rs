//! Access model domain types

pub mod access;
pub mod expr;
pub mod loop_spec;

pub use access::{Access, AccessKind, AccessModel};
pub use expr::{BinaryOperator, Expr};
pub use loop_spec::{ConstantEnv, LoopId, LoopSpec};

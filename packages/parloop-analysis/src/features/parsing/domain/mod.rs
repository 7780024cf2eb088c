//! Narrow syntax tree

pub mod syntax;

pub use syntax::{ForLoop, LoopIterable, SyntaxExpr, SyntaxModule, SyntaxStmt};

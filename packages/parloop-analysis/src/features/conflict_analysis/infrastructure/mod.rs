//! Symbolic evaluation and the query engine

pub mod binding;
pub mod engine;
pub mod evaluator;

pub use binding::{ThreadBinding, ThreadId};
pub use engine::ConflictAnalyzer;
pub use evaluator::{definedness, evaluate};

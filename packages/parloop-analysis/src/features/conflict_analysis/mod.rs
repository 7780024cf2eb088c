//! Conflict Analysis Module
//!
//! Models two distinct iterations of the outer loop ("thread 0" and
//! "thread 1") over the same bounds and asks whether they can touch the same
//! element in conflicting ways.
//!
//! ## Architecture
//!
//! ```text
//! conflict_analysis
//! ├── domain/           # ConflictResult, ConflictVerdict, ConflictWitness
//! ├── infrastructure/
//! │   ├── binding       # ThreadBinding: name → per-thread term
//! │   ├── evaluator     # Expr → Term under a binding
//! │   └── engine        # ConflictAnalyzer: base model + scoped queries
//! └── application/      # analyze_source / analyze_file driver
//! ```
//!
//! ## Queries
//!
//! | Query       | Thread 0 | Thread 1 | Pairs                       |
//! |-------------|----------|----------|-----------------------------|
//! | write-write | write    | write    | unordered, with repetition  |
//! | read-write  | read     | write    | every read × every write    |
//!
//! A query asks `index_0 = index_1` on top of the base model
//! (`lower <= i_t < upper`, `i_0 != i_1`).

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::{analyze_file, analyze_source};
pub use domain::{AccessSite, ConflictResult, ConflictVerdict, ConflictWitness, QueryKind};
pub use infrastructure::{evaluate, ConflictAnalyzer, ThreadBinding, ThreadId};

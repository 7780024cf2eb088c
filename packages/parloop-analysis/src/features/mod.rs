//! Feature slices, leaves first:
//!
//! - `parsing`: tree-sitter adapter producing the narrow syntax tree
//! - `access_model`: loop bounds and indexed accesses extracted from it
//! - `smt`: solver-independent terms, scoped solver handle, backends
//! - `conflict_analysis`: symbolic evaluation, two-thread queries, driver

pub mod access_model;
pub mod conflict_analysis;
pub mod parsing;
pub mod smt;

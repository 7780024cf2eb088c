//! Conflict analysis results

pub mod result;

pub use result::{AccessSite, ConflictResult, ConflictVerdict, ConflictWitness, QueryKind};

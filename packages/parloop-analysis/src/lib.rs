/*
 * parloop - Loop Parallelization Conflict Analysis
 *
 * Feature-First Hexagonal Architecture:
 * - shared/      : Common models (Span)
 * - features/    : Vertical slices (parsing → access_model → smt → conflict_analysis)
 * - config/      : Analysis configuration (presets, env overrides)
 *
 * Pipeline:
 *   source file → tree-sitter (Python) → narrow syntax tree
 *              → LoopSpec + Access list → two-thread SMT model → ConflictResult
 */

#![allow(clippy::module_inception)] // Module naming intentional
#![allow(clippy::new_without_default)] // Default impl not always needed

/// Shared models and utilities
pub mod shared;

/// Feature modules (parsing, access model, SMT, conflict analysis)
pub mod features;

/// Configuration system
pub mod config;

/// Error types
pub mod errors;

// ═══════════════════════════════════════════════════════════════════════════
// Re-exports for Public API
// ═══════════════════════════════════════════════════════════════════════════

pub use config::{AliasPolicy, AnalysisConfig, Preset, SolverKind};
pub use errors::{AnalysisError, Result};
pub use features::conflict_analysis::{
    analyze_file, analyze_source, ConflictAnalyzer, ConflictResult, ConflictVerdict,
    ConflictWitness,
};

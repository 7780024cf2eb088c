//! Analysis configuration
//!
//! Layering (later wins):
//! 1. `Preset` defaults (`fast`, `balanced`, `thorough`)
//! 2. Environment overrides (`PARLOOP_*`)
//! 3. Explicit builder calls / CLI flags
//!
//! There is no configuration file.

pub mod analysis_config;
pub mod error;
pub mod preset;
pub mod validation;

pub use analysis_config::{AliasPolicy, AnalysisConfig, SolverKind};
pub use error::{ConfigError, ConfigResult};
pub use preset::Preset;
pub use validation::Validatable;

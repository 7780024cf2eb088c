//! Preset configurations
//!
//! Presets trade solver effort for latency. They only differ in budgets;
//! none of them changes the soundness of a verdict, a budget that runs out
//! yields an indeterminate result rather than "no conflict".

use super::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// Configuration preset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// CI: small budgets, quick "unknown" on large iteration spaces
    ///
    /// - Z3 timeout: 1s
    /// - Enumeration: 100k assignments per query
    Fast,

    /// Default
    ///
    /// - Z3 timeout: 5s
    /// - Enumeration: 5M assignments per query
    Balanced,

    /// Offline audits
    ///
    /// - Z3 timeout: 60s
    /// - Enumeration: 200M assignments per query
    Thorough,
}

impl Preset {
    /// Parse preset from string
    pub fn from_str(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "fast" => Ok(Self::Fast),
            "balanced" => Ok(Self::Balanced),
            "thorough" => Ok(Self::Thorough),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }

    /// Convert to string
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Balanced => "balanced",
            Self::Thorough => "thorough",
        }
    }

    /// Z3 per-query timeout in milliseconds
    pub fn timeout_ms(&self) -> u64 {
        match self {
            Self::Fast => 1_000,
            Self::Balanced => 5_000,
            Self::Thorough => 60_000,
        }
    }

    /// Enumerative solver assignment budget per query
    pub fn max_assignments(&self) -> u64 {
        match self {
            Self::Fast => 100_000,
            Self::Balanced => 5_000_000,
            Self::Thorough => 200_000_000,
        }
    }
}

impl Default for Preset {
    fn default() -> Self {
        Self::Balanced
    }
}

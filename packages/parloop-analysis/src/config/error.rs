//! Configuration error types

use thiserror::Error;

/// Configuration error type
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Range validation error
    #[error("Invalid range for field '{field}': {value} not in {min}..={max}. {hint}")]
    Range {
        field: String,
        value: String,
        min: String,
        max: String,
        hint: String,
    },

    /// Unknown preset name
    #[error("Unknown preset '{0}'. Valid presets: fast, balanced, thorough")]
    UnknownPreset(String),

    /// Unknown enumerated value (solver name, alias policy, ...)
    #[error("Unknown value '{value}' for '{field}'. Expected one of: {}", .expected.join(", "))]
    UnknownValue {
        field: String,
        value: String,
        expected: Vec<&'static str>,
    },

    /// Non-numeric value where a number was expected
    #[error("Invalid number '{value}' for '{field}'")]
    InvalidNumber { field: String, value: String },

    /// Requested solver backend was not compiled in
    #[error("Solver backend '{0}' is not available in this build. Rebuild with `--features {0}`")]
    BackendUnavailable(String),
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Create a range error with a hint
    pub fn range_with_hint(
        field: impl Into<String>,
        value: impl ToString,
        min: impl ToString,
        max: impl ToString,
        hint: impl Into<String>,
    ) -> Self {
        Self::Range {
            field: field.into(),
            value: value.to_string(),
            min: min.to_string(),
            max: max.to_string(),
            hint: hint.into(),
        }
    }
}

//! Configuration validation

use super::error::{ConfigError, ConfigResult};

/// Trait for validatable configuration objects
pub trait Validatable {
    /// Validate the configuration
    ///
    /// Returns `Ok(())` if valid, `Err(ConfigError)` with details if invalid.
    fn validate(&self) -> ConfigResult<()>;

    /// Get the configuration name for error messages
    fn config_name(&self) -> &'static str {
        "Config"
    }
}

/// Check `value` lies in `min..=max`
pub(crate) fn check_range(
    field: &str,
    value: u64,
    min: u64,
    max: u64,
    hint: &str,
) -> ConfigResult<()> {
    if value < min || value > max {
        return Err(ConfigError::range_with_hint(field, value, min, max, hint));
    }
    Ok(())
}

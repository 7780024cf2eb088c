//! Analysis configuration

use super::error::{ConfigError, ConfigResult};
use super::preset::Preset;
use super::validation::{check_range, Validatable};
use serde::{Deserialize, Serialize};

/// Environment variable selecting the solver backend
pub const ENV_SOLVER: &str = "PARLOOP_SOLVER";
/// Environment variable overriding the Z3 timeout (milliseconds)
pub const ENV_TIMEOUT_MS: &str = "PARLOOP_TIMEOUT_MS";
/// Environment variable overriding the enumeration budget
pub const ENV_MAX_ASSIGNMENTS: &str = "PARLOOP_MAX_ASSIGNMENTS";
/// Environment variable selecting the alias policy
pub const ENV_ALIAS_POLICY: &str = "PARLOOP_ALIAS_POLICY";

/// Constraint solver backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverKind {
    /// Built-in finite-domain search (no native dependency)
    Enumerative,
    /// Z3 (requires the `z3` cargo feature)
    Z3,
}

impl SolverKind {
    pub fn parse(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "enumerative" | "builtin" => Ok(Self::Enumerative),
            "z3" => Ok(Self::Z3),
            _ => Err(ConfigError::UnknownValue {
                field: "solver".to_string(),
                value: s.to_string(),
                expected: vec!["enumerative", "z3"],
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Enumerative => "enumerative",
            Self::Z3 => "z3",
        }
    }

    /// Whether this backend was compiled in
    pub fn is_available(&self) -> bool {
        match self {
            Self::Enumerative => true,
            Self::Z3 => cfg!(feature = "z3"),
        }
    }
}

impl Default for SolverKind {
    fn default() -> Self {
        Self::Enumerative
    }
}

/// Which access pairs are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AliasPolicy {
    /// Every pair is compared regardless of array name (names may alias)
    MayAlias,
    /// Only accesses naming the same array are compared
    DistinctArrays,
}

impl AliasPolicy {
    pub fn parse(s: &str) -> ConfigResult<Self> {
        match s.to_lowercase().as_str() {
            "may-alias" | "may_alias" => Ok(Self::MayAlias),
            "distinct-arrays" | "distinct_arrays" => Ok(Self::DistinctArrays),
            _ => Err(ConfigError::UnknownValue {
                field: "alias_policy".to_string(),
                value: s.to_string(),
                expected: vec!["may-alias", "distinct-arrays"],
            }),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MayAlias => "may-alias",
            Self::DistinctArrays => "distinct-arrays",
        }
    }

    /// Whether accesses to `a` and `b` must be compared
    pub fn compares(&self, a: &str, b: &str) -> bool {
        match self {
            Self::MayAlias => true,
            Self::DistinctArrays => a == b,
        }
    }
}

impl Default for AliasPolicy {
    fn default() -> Self {
        Self::MayAlias
    }
}

/// Conflict analysis configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Solver backend
    pub solver: SolverKind,

    /// Z3 per-query timeout in milliseconds (1..=600000)
    pub timeout_ms: u64,

    /// Enumerative solver assignment budget per query (1..=10^10)
    pub max_assignments: u64,

    /// Which access pairs are compared
    pub alias_policy: AliasPolicy,
}

impl AnalysisConfig {
    pub fn from_preset(preset: Preset) -> Self {
        Self {
            solver: SolverKind::default(),
            timeout_ms: preset.timeout_ms(),
            max_assignments: preset.max_assignments(),
            alias_policy: AliasPolicy::default(),
        }
    }

    pub fn with_solver(mut self, solver: SolverKind) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    pub fn with_max_assignments(mut self, max_assignments: u64) -> Self {
        self.max_assignments = max_assignments;
        self
    }

    pub fn with_alias_policy(mut self, alias_policy: AliasPolicy) -> Self {
        self.alias_policy = alias_policy;
        self
    }

    /// Apply `PARLOOP_*` overrides from the process environment
    pub fn with_env_overrides(self) -> ConfigResult<Self> {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply `PARLOOP_*` overrides from an arbitrary lookup
    pub fn with_overrides_from<F>(mut self, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(value) = lookup(ENV_SOLVER) {
            self.solver = SolverKind::parse(value.trim())?;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_MS) {
            self.timeout_ms = parse_number(ENV_TIMEOUT_MS, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_ASSIGNMENTS) {
            self.max_assignments = parse_number(ENV_MAX_ASSIGNMENTS, &value)?;
        }
        if let Some(value) = lookup(ENV_ALIAS_POLICY) {
            self.alias_policy = AliasPolicy::parse(value.trim())?;
        }
        Ok(self)
    }
}

fn parse_number(field: &str, value: &str) -> ConfigResult<u64> {
    value
        .trim()
        .replace('_', "")
        .parse()
        .map_err(|_| ConfigError::InvalidNumber {
            field: field.to_string(),
            value: value.to_string(),
        })
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self::from_preset(Preset::default())
    }
}

impl Validatable for AnalysisConfig {
    fn validate(&self) -> ConfigResult<()> {
        if !self.solver.is_available() {
            return Err(ConfigError::BackendUnavailable(
                self.solver.as_str().to_string(),
            ));
        }
        check_range(
            "timeout_ms",
            self.timeout_ms,
            1,
            600_000,
            "Use 5000 for interactive use",
        )?;
        check_range(
            "max_assignments",
            self.max_assignments,
            1,
            10_000_000_000,
            "Large budgets only help when iteration spaces are small enough to enumerate",
        )?;
        Ok(())
    }

    fn config_name(&self) -> &'static str {
        "AnalysisConfig"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_is_balanced_enumerative() {
        let config = AnalysisConfig::default();
        assert_eq!(config.solver, SolverKind::Enumerative);
        assert_eq!(config.max_assignments, Preset::Balanced.max_assignments());
        assert_eq!(config.alias_policy, AliasPolicy::MayAlias);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_apply() {
        let config = AnalysisConfig::default()
            .with_overrides_from(lookup(&[
                (ENV_MAX_ASSIGNMENTS, "1_000"),
                (ENV_ALIAS_POLICY, "distinct-arrays"),
                (ENV_TIMEOUT_MS, " 250 "),
            ]))
            .unwrap();
        assert_eq!(config.max_assignments, 1_000);
        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.alias_policy, AliasPolicy::DistinctArrays);
    }

    #[test]
    fn test_env_override_rejects_garbage() {
        let err = AnalysisConfig::default()
            .with_overrides_from(lookup(&[(ENV_TIMEOUT_MS, "soon")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidNumber { .. }));

        let err = AnalysisConfig::default()
            .with_overrides_from(lookup(&[(ENV_SOLVER, "cvc5")]))
            .unwrap_err();
        assert!(err.to_string().contains("enumerative, z3"));
    }

    #[test]
    fn test_zero_budget_is_invalid() {
        let config = AnalysisConfig::default().with_max_assignments(0);
        assert!(matches!(config.validate(), Err(ConfigError::Range { .. })));
    }

    #[cfg(not(feature = "z3"))]
    #[test]
    fn test_z3_unavailable_without_feature() {
        let config = AnalysisConfig::default().with_solver(SolverKind::Z3);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::BackendUnavailable(_))
        ));
    }

    #[test]
    fn test_alias_policy_compares() {
        assert!(AliasPolicy::MayAlias.compares("a", "b"));
        assert!(AliasPolicy::DistinctArrays.compares("a", "a"));
        assert!(!AliasPolicy::DistinctArrays.compares("a", "b"));
    }

    #[test]
    fn test_config_json_roundtrip_uses_defaults_for_missing_fields() {
        let config: AnalysisConfig = serde_json::from_str(r#"{"solver":"z3"}"#).unwrap();
        assert_eq!(config.solver, SolverKind::Z3);
        assert_eq!(config.timeout_ms, Preset::Balanced.timeout_ms());
    }
}

//! Driver: source → parser → extraction → engine

use crate::config::{AnalysisConfig, Validatable};
use crate::errors::Result;
use crate::features::access_model::AccessExtractor;
use crate::features::conflict_analysis::domain::ConflictResult;
use crate::features::conflict_analysis::infrastructure::ConflictAnalyzer;
use crate::features::parsing::{LoopSourceParser, TreeSitterPythonParser};
use std::path::Path;
use tracing::debug;

/// Analyze Python source text
///
/// # Example
///
/// ```
/// use parloop_analysis::{analyze_source, AnalysisConfig};
///
/// let result = analyze_source("for i in range(1, 10):\n    a[i] = a[i - 1]\n", &AnalysisConfig::default())?;
/// assert_eq!(result.as_bools()?, (false, true));
/// # Ok::<(), parloop_analysis::AnalysisError>(())
/// ```
pub fn analyze_source(source: &str, config: &AnalysisConfig) -> Result<ConflictResult> {
    config.validate()?;

    let module = TreeSitterPythonParser::new().parse_module(source)?;
    let model = AccessExtractor::new().extract(&module)?;

    ConflictAnalyzer::new(config.clone()).analyze(&model)
}

/// Analyze the Python file at `path`
pub fn analyze_file(path: impl AsRef<Path>, config: &AnalysisConfig) -> Result<ConflictResult> {
    let path = path.as_ref();
    debug!(path = %path.display(), "reading source");
    let source = std::fs::read_to_string(path)?;
    analyze_source(&source, config)
}

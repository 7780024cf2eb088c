//! Parser port

use crate::errors::Result;
use crate::features::parsing::domain::SyntaxModule;

/// Turns source text into the narrow syntax tree
pub trait LoopSourceParser {
    /// Parse a whole module
    ///
    /// Fails only when the source is not syntactically valid. Statements
    /// outside the supported grammar are kept as `SyntaxStmt::Unsupported`
    /// so the caller decides whether they matter.
    fn parse_module(&self, source: &str) -> Result<SyntaxModule>;
}

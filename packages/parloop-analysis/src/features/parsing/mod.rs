//! Parsing Module
//!
//! Boundary to the parsing collaborator. The tree-sitter Python tree is
//! converted into a closed, narrow syntax variant (`SyntaxModule`) so that
//! nothing downstream depends on tree-sitter's vocabulary.
//!
//! ```text
//! parsing
//! ├── domain/          # SyntaxModule, SyntaxStmt, SyntaxExpr
//! ├── ports/           # LoopSourceParser trait
//! └── infrastructure/  # TreeSitterPythonParser
//! ```

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{ForLoop, LoopIterable, SyntaxExpr, SyntaxModule, SyntaxStmt};
pub use infrastructure::TreeSitterPythonParser;
pub use ports::LoopSourceParser;

//! Error types for parloop-analysis
//!
//! Provides unified error handling across the crate. Extraction errors
//! (`MalformedLoop`, `UnsupportedConstruct`, `UnboundVariable`) abort an
//! analysis before any solver query is issued.

use crate::config::ConfigError;
use crate::shared::models::Span;
use thiserror::Error;

/// Main error type for parloop-analysis operations
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The parsing collaborator rejected the source text
    #[error("Parse error{}: {message}", at(.span))]
    Parse { message: String, span: Option<Span> },

    /// No single top-level `for ... in range(...)` loop
    #[error("Malformed loop{}: {reason}", at(.span))]
    MalformedLoop { reason: String, span: Option<Span> },

    /// A statement or expression outside the supported grammar
    #[error("Unsupported construct{}: {construct}", at(.span))]
    UnsupportedConstruct {
        construct: String,
        span: Option<Span>,
    },

    /// An index or bound expression references a name that is not in scope
    #[error("Unbound variable '{name}'{}", at(.span))]
    UnboundVariable { name: String, span: Option<Span> },

    /// The solver could not decide one of the conflict queries
    #[error("Indeterminate {query} conflict: {reason}")]
    IndeterminateConflict { query: String, reason: String },

    /// The solver backend failed outright (not an "unknown" answer)
    #[error("Solver error: {0}")]
    Solver(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

fn at(span: &Option<Span>) -> String {
    match span {
        Some(span) => format!(" at {}", span),
        None => String::new(),
    }
}

impl AnalysisError {
    pub fn parse(message: impl Into<String>, span: Option<Span>) -> Self {
        AnalysisError::Parse {
            message: message.into(),
            span,
        }
    }

    pub fn malformed_loop(reason: impl Into<String>, span: Option<Span>) -> Self {
        AnalysisError::MalformedLoop {
            reason: reason.into(),
            span,
        }
    }

    pub fn unsupported(construct: impl Into<String>, span: Option<Span>) -> Self {
        AnalysisError::UnsupportedConstruct {
            construct: construct.into(),
            span,
        }
    }

    pub fn unbound(name: impl Into<String>, span: Option<Span>) -> Self {
        AnalysisError::UnboundVariable {
            name: name.into(),
            span,
        }
    }

    /// Location of the offending construct, if one is known
    pub fn span(&self) -> Option<Span> {
        match self {
            AnalysisError::Parse { span, .. }
            | AnalysisError::MalformedLoop { span, .. }
            | AnalysisError::UnsupportedConstruct { span, .. }
            | AnalysisError::UnboundVariable { span, .. } => *span,
            _ => None,
        }
    }

    /// True for errors raised while building the access model
    pub fn is_extraction_error(&self) -> bool {
        matches!(
            self,
            AnalysisError::Parse { .. }
                | AnalysisError::MalformedLoop { .. }
                | AnalysisError::UnsupportedConstruct { .. }
                | AnalysisError::UnboundVariable { .. }
        )
    }
}

/// Result type alias for parloop operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_include_location() {
        let err = AnalysisError::unbound("n", Some(Span::new(3, 17, 3, 18)));
        assert_eq!(err.to_string(), "Unbound variable 'n' at 3:17-3:18");
        assert!(err.is_extraction_error());
    }

    #[test]
    fn test_error_messages_without_location() {
        let err = AnalysisError::malformed_loop("no top-level for loop", None);
        assert_eq!(err.to_string(), "Malformed loop: no top-level for loop");
        assert_eq!(err.span(), None);
    }

    #[test]
    fn test_indeterminate_is_not_extraction_error() {
        let err = AnalysisError::IndeterminateConflict {
            query: "write-write".to_string(),
            reason: "timeout".to_string(),
        };
        assert!(!err.is_extraction_error());
    }
}

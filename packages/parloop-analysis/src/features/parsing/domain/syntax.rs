//! Narrow syntax tree
//!
//! Closed variants carrying only what loop analysis needs. Anything the
//! adapter cannot express here becomes `SyntaxStmt::Unsupported` (statement
//! level) so that top-level noise can be skipped while the same construct
//! inside a loop body is reported.

use crate::features::access_model::BinaryOperator;
use crate::shared::models::Span;

/// Expression: integer literal, name, binary arithmetic, or one-index subscript
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxExpr {
    Int {
        value: i64,
        span: Span,
    },
    Name {
        id: String,
        span: Span,
    },
    Binary {
        op: BinaryOperator,
        left: Box<SyntaxExpr>,
        right: Box<SyntaxExpr>,
        span: Span,
    },
    Subscript {
        array: String,
        index: Box<SyntaxExpr>,
        span: Span,
    },
}

impl SyntaxExpr {
    pub fn span(&self) -> Span {
        match self {
            SyntaxExpr::Int { span, .. }
            | SyntaxExpr::Name { span, .. }
            | SyntaxExpr::Binary { span, .. }
            | SyntaxExpr::Subscript { span, .. } => *span,
        }
    }
}

/// What a `for` statement iterates over
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopIterable {
    /// `range(...)` with its positional arguments
    Range(Vec<SyntaxExpr>),
    /// Anything else, with a short description
    Other(String),
}

/// `for <target> in <iterable>: <body>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForLoop {
    /// Loop variable; `None` when the target is not a single identifier
    pub target: Option<String>,
    pub iterable: LoopIterable,
    pub body: Vec<SyntaxStmt>,
    pub has_else: bool,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxStmt {
    /// `target = value`, or `target op= value` when `augmented` is set
    Assign {
        target: SyntaxExpr,
        value: SyntaxExpr,
        augmented: Option<BinaryOperator>,
        span: Span,
    },
    For(ForLoop),
    /// Statement outside the narrow grammar
    Unsupported { construct: String, span: Span },
}

impl SyntaxStmt {
    pub fn span(&self) -> Span {
        match self {
            SyntaxStmt::Assign { span, .. } | SyntaxStmt::Unsupported { span, .. } => *span,
            SyntaxStmt::For(for_loop) => for_loop.span,
        }
    }
}

/// Top-level statements in source order (comments dropped)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyntaxModule {
    pub statements: Vec<SyntaxStmt>,
}

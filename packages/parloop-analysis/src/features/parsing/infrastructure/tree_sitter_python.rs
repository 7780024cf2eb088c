/*
 * Infrastructure: tree-sitter Python Adapter
 *
 * Implements the LoopSourceParser port with tree-sitter-python.
 *
 * The tree-sitter tree never leaves this file: every node is converted into
 * the narrow SyntaxModule variant before the parser and tree are dropped.
 */

use crate::errors::{AnalysisError, Result};
use crate::features::access_model::BinaryOperator;
use crate::features::parsing::domain::{
    ForLoop, LoopIterable, SyntaxExpr, SyntaxModule, SyntaxStmt,
};
use crate::features::parsing::ports::LoopSourceParser;
use crate::shared::models::Span;
use tracing::debug;
use tree_sitter::{Node, Parser};

const SNIPPET_LEN: usize = 40;

/// tree-sitter parser adapter for Python sources
pub struct TreeSitterPythonParser {
    _marker: std::marker::PhantomData<()>,
}

impl TreeSitterPythonParser {
    pub fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }
}

impl Default for TreeSitterPythonParser {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopSourceParser for TreeSitterPythonParser {
    fn parse_module(&self, source: &str) -> Result<SyntaxModule> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::language())
            .map_err(|e| AnalysisError::parse(format!("Failed to set language: {}", e), None))?;

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| AnalysisError::parse("Failed to parse content", None))?;

        let root = tree.root_node();
        let converter = Converter {
            source: source.as_bytes(),
        };

        if root.has_error() {
            let bad = first_error(root).unwrap_or(root);
            let message = if bad.is_missing() {
                format!("missing `{}`", bad.kind())
            } else {
                format!("invalid syntax near `{}`", converter.snippet(bad))
            };
            return Err(AnalysisError::parse(message, Some(node_span(bad))));
        }

        let statements = converter.statements(root);
        debug!(count = statements.len(), "parsed top-level statements");
        Ok(SyntaxModule { statements })
    }
}

/// Depth-first search for the first ERROR or MISSING node
fn first_error(node: Node<'_>) -> Option<Node<'_>> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    let mut cursor = node.walk();
    let children: Vec<_> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .filter(|child| child.has_error() || child.is_missing())
        .find_map(first_error)
}

fn node_span(node: Node<'_>) -> Span {
    let start = node.start_position();
    let end = node.end_position();
    Span::new(
        start.row as u32 + 1,
        start.column as u32,
        end.row as u32 + 1,
        end.column as u32,
    )
}

/// Conversion failure, turned into `SyntaxStmt::Unsupported` by the caller
struct Unsupported {
    construct: String,
    span: Span,
}

impl Unsupported {
    fn at(node: Node<'_>, construct: impl Into<String>) -> Self {
        Self {
            construct: construct.into(),
            span: node_span(node),
        }
    }
}

type Conv<T> = std::result::Result<T, Unsupported>;

struct Converter<'s> {
    source: &'s [u8],
}

impl<'s> Converter<'s> {
    fn text(&self, node: Node<'_>) -> &'s str {
        node.utf8_text(self.source).unwrap_or("")
    }

    /// First line of the node's text, shortened for messages
    fn snippet(&self, node: Node<'_>) -> String {
        let line = self.text(node).lines().next().unwrap_or("").trim();
        if line.chars().count() > SNIPPET_LEN {
            let cut: String = line.chars().take(SNIPPET_LEN).collect();
            format!("{}...", cut)
        } else {
            line.to_string()
        }
    }

    fn describe(&self, node: Node<'_>) -> String {
        format!("{} `{}`", node.kind().replace('_', " "), self.snippet(node))
    }

    fn named_children<'t>(&self, node: Node<'t>) -> Vec<Node<'t>> {
        let mut cursor = node.walk();
        node.named_children(&mut cursor)
            .filter(|child| child.kind() != "comment")
            .collect()
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Statements
    // ═══════════════════════════════════════════════════════════════════════

    fn statements(&self, block: Node<'_>) -> Vec<SyntaxStmt> {
        self.named_children(block)
            .into_iter()
            .filter(|node| node.kind() != "pass_statement")
            .map(|node| self.statement(node))
            .collect()
    }

    fn statement(&self, node: Node<'_>) -> SyntaxStmt {
        let converted = match node.kind() {
            "for_statement" => return SyntaxStmt::For(self.for_loop(node)),
            "expression_statement" => self.expression_statement(node),
            _ => Err(Unsupported::at(node, self.describe(node))),
        };
        converted.unwrap_or_else(|u| SyntaxStmt::Unsupported {
            construct: u.construct,
            span: u.span,
        })
    }

    fn expression_statement(&self, node: Node<'_>) -> Conv<SyntaxStmt> {
        match self.named_children(node).as_slice() {
            [inner] if inner.kind() == "assignment" => self.assignment(*inner),
            [inner] if inner.kind() == "augmented_assignment" => {
                self.augmented_assignment(*inner)
            }
            _ => Err(Unsupported::at(
                node,
                format!("expression statement `{}`", self.snippet(node)),
            )),
        }
    }

    fn assignment(&self, node: Node<'_>) -> Conv<SyntaxStmt> {
        let left = node
            .child_by_field_name("left")
            .ok_or_else(|| Unsupported::at(node, "assignment without target"))?;
        let right = node
            .child_by_field_name("right")
            .ok_or_else(|| Unsupported::at(node, "annotation without value"))?;
        if right.kind() == "assignment" {
            return Err(Unsupported::at(
                node,
                format!("chained assignment `{}`", self.snippet(node)),
            ));
        }
        Ok(SyntaxStmt::Assign {
            target: self.expr(left)?,
            value: self.expr(right)?,
            augmented: None,
            span: node_span(node),
        })
    }

    fn augmented_assignment(&self, node: Node<'_>) -> Conv<SyntaxStmt> {
        let (left, op, right) = match (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) {
            (Some(l), Some(o), Some(r)) => (l, o, r),
            _ => return Err(Unsupported::at(node, self.describe(node))),
        };
        let op = match op.kind() {
            "+=" => BinaryOperator::Add,
            "-=" => BinaryOperator::Sub,
            "*=" => BinaryOperator::Mul,
            "/=" | "//=" => BinaryOperator::Div,
            "%=" => BinaryOperator::Mod,
            other => {
                return Err(Unsupported::at(
                    op,
                    format!("augmented operator `{}`", other),
                ))
            }
        };
        Ok(SyntaxStmt::Assign {
            target: self.expr(left)?,
            value: self.expr(right)?,
            augmented: Some(op),
            span: node_span(node),
        })
    }

    fn for_loop(&self, node: Node<'_>) -> ForLoop {
        let target = node
            .child_by_field_name("left")
            .filter(|left| left.kind() == "identifier")
            .map(|left| self.text(left).to_string());

        let iterable = match node.child_by_field_name("right") {
            Some(right) => self.iterable(right),
            None => LoopIterable::Other("missing iterable".to_string()),
        };

        let body = node
            .child_by_field_name("body")
            .map(|body| self.statements(body))
            .unwrap_or_default();

        ForLoop {
            target,
            iterable,
            body,
            has_else: node.child_by_field_name("alternative").is_some(),
            span: node_span(node),
        }
    }

    fn iterable(&self, node: Node<'_>) -> LoopIterable {
        let is_range = node.kind() == "call"
            && node
                .child_by_field_name("function")
                .map_or(false, |f| f.kind() == "identifier" && self.text(f) == "range");
        if !is_range {
            return LoopIterable::Other(format!("`{}`", self.snippet(node)));
        }

        let Some(arguments) = node.child_by_field_name("arguments") else {
            return LoopIterable::Other(format!("`{}`", self.snippet(node)));
        };

        let mut args = Vec::new();
        for arg in self.named_children(arguments) {
            match self.expr(arg) {
                Ok(expr) => args.push(expr),
                Err(u) => return LoopIterable::Other(format!("range argument {}", u.construct)),
            }
        }
        LoopIterable::Range(args)
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════════

    fn expr(&self, node: Node<'_>) -> Conv<SyntaxExpr> {
        let span = node_span(node);
        match node.kind() {
            "integer" => {
                let value = parse_int(self.text(node)).ok_or_else(|| {
                    Unsupported::at(node, format!("integer literal `{}`", self.text(node)))
                })?;
                Ok(SyntaxExpr::Int { value, span })
            }
            "identifier" => Ok(SyntaxExpr::Name {
                id: self.text(node).to_string(),
                span,
            }),
            "parenthesized_expression" => match self.named_children(node).as_slice() {
                [inner] => self.expr(*inner),
                _ => Err(Unsupported::at(node, self.describe(node))),
            },
            "binary_operator" => self.binary(node),
            "unary_operator" => self.unary(node),
            "subscript" => self.subscript(node),
            _ => Err(Unsupported::at(node, self.describe(node))),
        }
    }

    fn binary(&self, node: Node<'_>) -> Conv<SyntaxExpr> {
        let (left, op, right) = match (
            node.child_by_field_name("left"),
            node.child_by_field_name("operator"),
            node.child_by_field_name("right"),
        ) {
            (Some(l), Some(o), Some(r)) => (l, o, r),
            _ => return Err(Unsupported::at(node, self.describe(node))),
        };
        let op = match op.kind() {
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "*" => BinaryOperator::Mul,
            "/" | "//" => BinaryOperator::Div,
            "%" => BinaryOperator::Mod,
            other => return Err(Unsupported::at(op, format!("operator `{}`", other))),
        };
        Ok(SyntaxExpr::Binary {
            op,
            left: Box::new(self.expr(left)?),
            right: Box::new(self.expr(right)?),
            span: node_span(node),
        })
    }

    fn unary(&self, node: Node<'_>) -> Conv<SyntaxExpr> {
        let (op, argument) = match (
            node.child_by_field_name("operator"),
            node.child_by_field_name("argument"),
        ) {
            (Some(o), Some(a)) => (o, a),
            _ => return Err(Unsupported::at(node, self.describe(node))),
        };
        let span = node_span(node);
        let argument = self.expr(argument)?;
        match op.kind() {
            "+" => Ok(argument),
            "-" => match argument {
                SyntaxExpr::Int { value, .. } => value
                    .checked_neg()
                    .map(|value| SyntaxExpr::Int { value, span })
                    .ok_or_else(|| Unsupported::at(node, "integer literal out of range")),
                other => Ok(SyntaxExpr::Binary {
                    op: BinaryOperator::Sub,
                    left: Box::new(SyntaxExpr::Int { value: 0, span }),
                    right: Box::new(other),
                    span,
                }),
            },
            other => Err(Unsupported::at(op, format!("operator `{}`", other))),
        }
    }

    fn subscript(&self, node: Node<'_>) -> Conv<SyntaxExpr> {
        let value = node
            .child_by_field_name("value")
            .ok_or_else(|| Unsupported::at(node, self.describe(node)))?;
        if value.kind() != "identifier" {
            let construct = if value.kind() == "subscript" {
                format!("multi-dimensional subscript `{}`", self.snippet(node))
            } else {
                format!("subscript of non-name `{}`", self.snippet(node))
            };
            return Err(Unsupported::at(node, construct));
        }

        let mut cursor = node.walk();
        let indices: Vec<_> = node
            .children_by_field_name("subscript", &mut cursor)
            .collect();
        let index = match indices.as_slice() {
            [index] if index.kind() != "slice" => *index,
            [index] => {
                return Err(Unsupported::at(
                    *index,
                    format!("slice `{}`", self.snippet(node)),
                ))
            }
            _ => {
                return Err(Unsupported::at(
                    node,
                    format!("multi-index subscript `{}`", self.snippet(node)),
                ))
            }
        };

        Ok(SyntaxExpr::Subscript {
            array: self.text(value).to_string(),
            index: Box::new(self.expr(index)?),
            span: node_span(node),
        })
    }
}

/// Python integer literal (decimal, `0x`, `0o`, `0b`, underscores allowed)
fn parse_int(text: &str) -> Option<i64> {
    let cleaned = text.replace('_', "").to_lowercase();
    let (digits, radix) = if let Some(rest) = cleaned.strip_prefix("0x") {
        (rest.to_string(), 16)
    } else if let Some(rest) = cleaned.strip_prefix("0o") {
        (rest.to_string(), 8)
    } else if let Some(rest) = cleaned.strip_prefix("0b") {
        (rest.to_string(), 2)
    } else {
        (cleaned, 10)
    };
    i64::from_str_radix(&digits, radix).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> SyntaxModule {
        TreeSitterPythonParser::new().parse_module(source).unwrap()
    }

    fn only_loop(module: &SyntaxModule) -> &ForLoop {
        match module.statements.as_slice() {
            [SyntaxStmt::For(for_loop)] => for_loop,
            other => panic!("expected a single for loop, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_int_literals() {
        assert_eq!(parse_int("42"), Some(42));
        assert_eq!(parse_int("1_000"), Some(1000));
        assert_eq!(parse_int("0x1F"), Some(31));
        assert_eq!(parse_int("0b101"), Some(5));
        assert_eq!(parse_int("0o17"), Some(15));
        assert_eq!(parse_int("99999999999999999999"), None);
    }

    #[test]
    fn test_simple_loop_shape() {
        let module = parse("for i in range(0, 10):\n    a[i] = a[i - 1] + 1\n");
        let for_loop = only_loop(&module);
        assert_eq!(for_loop.target.as_deref(), Some("i"));
        assert!(!for_loop.has_else);

        let LoopIterable::Range(args) = &for_loop.iterable else {
            panic!("expected range");
        };
        assert_eq!(args.len(), 2);
        assert!(matches!(args[1], SyntaxExpr::Int { value: 10, .. }));

        let [SyntaxStmt::Assign { target, value, augmented, .. }] = for_loop.body.as_slice() else {
            panic!("expected one assignment");
        };
        assert_eq!(*augmented, None);
        assert!(matches!(target, SyntaxExpr::Subscript { array, .. } if array == "a"));
        let SyntaxExpr::Binary { op, left, .. } = value else {
            panic!("expected binary rhs");
        };
        assert_eq!(*op, BinaryOperator::Add);
        assert!(matches!(**left, SyntaxExpr::Subscript { .. }));
    }

    #[test]
    fn test_comments_and_pass_are_dropped() {
        let module = parse("# header\nfor i in range(3):\n    # body\n    pass\n    a[i] = 1\n");
        let for_loop = only_loop(&module);
        assert_eq!(for_loop.body.len(), 1);
    }

    #[test]
    fn test_unary_minus_folds_literals() {
        let module = parse("for i in range(-5, 5):\n    a[-i] = 0\n");
        let for_loop = only_loop(&module);
        let LoopIterable::Range(args) = &for_loop.iterable else {
            panic!("expected range");
        };
        assert!(matches!(args[0], SyntaxExpr::Int { value: -5, .. }));
        let [SyntaxStmt::Assign { target, .. }] = for_loop.body.as_slice() else {
            panic!("expected assignment");
        };
        let SyntaxExpr::Subscript { index, .. } = target else {
            panic!("expected subscript");
        };
        assert!(matches!(
            **index,
            SyntaxExpr::Binary { op: BinaryOperator::Sub, .. }
        ));
    }

    #[test]
    fn test_augmented_assignment() {
        let module = parse("for i in range(4):\n    a[i] //= 2\n");
        let for_loop = only_loop(&module);
        assert!(matches!(
            for_loop.body.as_slice(),
            [SyntaxStmt::Assign { augmented: Some(BinaryOperator::Div), .. }]
        ));
    }

    #[test]
    fn test_nested_loop_kept_as_for() {
        let module = parse("for i in range(4):\n    for j in range(i, 4):\n        a[j] = 0\n");
        let for_loop = only_loop(&module);
        let [SyntaxStmt::For(inner)] = for_loop.body.as_slice() else {
            panic!("expected nested loop");
        };
        assert_eq!(inner.target.as_deref(), Some("j"));
        assert_eq!(inner.body.len(), 1);
    }

    #[test]
    fn test_unsupported_statements_are_kept_with_span() {
        let module = parse("for i in range(4):\n    if i:\n        a[i] = 0\n    print(a[i])\n");
        let for_loop = only_loop(&module);
        assert_eq!(for_loop.body.len(), 2);
        let SyntaxStmt::Unsupported { construct, span } = &for_loop.body[0] else {
            panic!("expected unsupported if");
        };
        assert!(construct.starts_with("if statement"), "{}", construct);
        assert_eq!(span.start_line, 2);
        assert!(matches!(&for_loop.body[1], SyntaxStmt::Unsupported { construct, .. } if construct.starts_with("expression statement")));
    }

    #[test]
    fn test_non_range_iterable() {
        let module = parse("for x in items:\n    a[x] = 0\n");
        let for_loop = only_loop(&module);
        assert!(matches!(&for_loop.iterable, LoopIterable::Other(_)));
    }

    #[test]
    fn test_tuple_target_has_no_variable() {
        let module = parse("for i, j in range(4):\n    a[i] = 0\n");
        assert_eq!(only_loop(&module).target, None);
    }

    #[test]
    fn test_multi_dimensional_subscript_is_unsupported() {
        let module = parse("for i in range(4):\n    a[i][i] = 0\n");
        let for_loop = only_loop(&module);
        assert!(matches!(
            &for_loop.body[0],
            SyntaxStmt::Unsupported { construct, .. } if construct.starts_with("multi-dimensional")
        ));
    }

    #[test]
    fn test_syntax_error_reports_location() {
        let err = TreeSitterPythonParser::new()
            .parse_module("for i in range(0, 10)\n    a[i] = 1\n")
            .unwrap_err();
        assert!(matches!(err, AnalysisError::Parse { span: Some(_), .. }));
    }
}

//! Read/write accesses and the assembled access model

use super::expr::Expr;
use super::loop_spec::{ConstantEnv, LoopId, LoopSpec};
use crate::shared::models::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccessKind {
    Read,
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Read => write!(f, "read"),
            AccessKind::Write => write!(f, "write"),
        }
    }
}

/// One read or write of `array[index]` performed by a body statement
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Access {
    pub kind: AccessKind,
    pub array: String,
    pub index: Expr,
    /// Innermost loop enclosing the statement
    pub scope: LoopId,
    /// Ordinal of the assignment statement within the loop nest
    pub statement: usize,
    pub span: Span,
}

impl Access {
    pub fn read(array: impl Into<String>, index: Expr) -> Self {
        Self::new(AccessKind::Read, array, index)
    }

    pub fn write(array: impl Into<String>, index: Expr) -> Self {
        Self::new(AccessKind::Write, array, index)
    }

    fn new(kind: AccessKind, array: impl Into<String>, index: Expr) -> Self {
        Self {
            kind,
            array: array.into(),
            index,
            scope: LoopId::OUTER,
            statement: 0,
            span: Span::zero(),
        }
    }

    pub fn in_scope(mut self, scope: LoopId) -> Self {
        self.scope = scope;
        self
    }

    pub fn at(mut self, statement: usize, span: Span) -> Self {
        self.statement = statement;
        self.span = span;
        self
    }

    pub fn is_write(&self) -> bool {
        self.kind == AccessKind::Write
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}[{}]", self.kind, self.array, self.index)
    }
}

/// Everything the conflict engine needs about one loop nest
///
/// `loops[0]` is the outer loop; nested loops follow in source order and
/// always appear after their parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessModel {
    loops: Vec<LoopSpec>,
    accesses: Vec<Access>,
    constants: ConstantEnv,
}

impl AccessModel {
    /// Assemble a model; `loops` must start with the outer loop
    pub fn new(loops: Vec<LoopSpec>, accesses: Vec<Access>, constants: ConstantEnv) -> Self {
        debug_assert!(loops.first().map_or(false, |l| l.is_outer()));
        Self {
            loops,
            accesses,
            constants,
        }
    }

    /// Single-loop model without nested headers or constants
    pub fn single(outer: LoopSpec, accesses: Vec<Access>) -> Self {
        Self::new(vec![outer], accesses, ConstantEnv::new())
    }

    pub fn outer(&self) -> &LoopSpec {
        &self.loops[0]
    }

    pub fn loops(&self) -> &[LoopSpec] {
        &self.loops
    }

    pub fn loop_spec(&self, id: LoopId) -> Option<&LoopSpec> {
        self.loops.get(id.0)
    }

    /// Loops enclosing `id`, outermost first, `id` itself last
    pub fn scope_chain(&self, id: LoopId) -> Vec<&LoopSpec> {
        let mut chain = Vec::new();
        let mut cursor = self.loop_spec(id);
        while let Some(spec) = cursor {
            chain.push(spec);
            cursor = spec.parent.and_then(|p| self.loop_spec(p));
        }
        chain.reverse();
        chain
    }

    pub fn accesses(&self) -> &[Access] {
        &self.accesses
    }

    pub fn reads(&self) -> impl Iterator<Item = &Access> {
        self.accesses.iter().filter(|a| !a.is_write())
    }

    pub fn writes(&self) -> impl Iterator<Item = &Access> {
        self.accesses.iter().filter(|a| a.is_write())
    }

    pub fn constants(&self) -> &ConstantEnv {
        &self.constants
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::access_model::domain::BinaryOperator;

    fn nest() -> AccessModel {
        let outer = LoopSpec::new(LoopId(0), "i", Expr::lit(0), Expr::lit(10));
        let inner = LoopSpec::new(LoopId(1), "j", Expr::lit(0), Expr::var("i")).with_parent(LoopId(0));
        let innermost =
            LoopSpec::new(LoopId(2), "k", Expr::var("j"), Expr::var("i")).with_parent(LoopId(1));
        let write = Access::write(
            "a",
            Expr::binary(BinaryOperator::Add, Expr::var("i"), Expr::var("k")),
        )
        .in_scope(LoopId(2));
        let read = Access::read("b", Expr::var("i"));
        AccessModel::new(vec![outer, inner, innermost], vec![write, read], ConstantEnv::new())
    }

    #[test]
    fn test_scope_chain_is_outermost_first() {
        let model = nest();
        let names: Vec<_> = model
            .scope_chain(LoopId(2))
            .iter()
            .map(|l| l.variable.as_str())
            .collect();
        assert_eq!(names, vec!["i", "j", "k"]);
        assert_eq!(model.scope_chain(LoopId::OUTER).len(), 1);
    }

    #[test]
    fn test_reads_and_writes_partition_accesses() {
        let model = nest();
        assert_eq!(model.writes().count(), 1);
        assert_eq!(model.reads().count(), 1);
        assert_eq!(model.writes().next().unwrap().to_string(), "write a[i + k]");
    }
}

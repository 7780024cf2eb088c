//! Access extraction
//!
//! Lowers a [`SyntaxModule`] into an [`AccessModel`]:
//!
//! 1. Top-level `name = <int expr>` assignments are folded into constants.
//! 2. The single top-level `for ... in range(...)` becomes the outer loop.
//! 3. The body is walked in order: assignments yield accesses, nested `for`
//!    headers open a new scope.
//! 4. Every name in a bound or index must be an enclosing loop variable or a
//!    constant.
//!
//! All failures happen here, before any solver is created.

use crate::errors::{AnalysisError, Result};
use crate::features::access_model::domain::{
    Access, AccessModel, BinaryOperator, ConstantEnv, Expr, LoopId, LoopSpec,
};
use crate::features::parsing::{ForLoop, LoopIterable, SyntaxExpr, SyntaxModule, SyntaxStmt};
use crate::shared::models::Span;
use tracing::debug;

/// Builds the access model for the one loop nest in a module
#[derive(Debug, Default)]
pub struct AccessExtractor {
    constants: ConstantEnv,
    loops: Vec<LoopSpec>,
    accesses: Vec<Access>,
    /// Enclosing loop variables, outermost first
    scope: Vec<(String, LoopId)>,
    statements: usize,
}

impl AccessExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract the model for `module`
    pub fn extract(mut self, module: &SyntaxModule) -> Result<AccessModel> {
        let mut outer: Option<&ForLoop> = None;
        for stmt in &module.statements {
            match stmt {
                SyntaxStmt::For(for_loop) => {
                    if outer.is_some() {
                        return Err(AnalysisError::malformed_loop(
                            "more than one top-level for loop",
                            Some(for_loop.span),
                        ));
                    }
                    outer = Some(for_loop);
                }
                SyntaxStmt::Assign {
                    target: SyntaxExpr::Name { id, .. },
                    value,
                    augmented,
                    ..
                } => self.fold_constant(id, value, *augmented),
                other => debug!(span = %other.span(), "ignoring top-level statement"),
            }
        }

        let outer = outer.ok_or_else(|| {
            AnalysisError::malformed_loop("no top-level for loop", None)
        })?;

        self.enter_loop(outer, None)?;

        debug!(
            loops = self.loops.len(),
            accesses = self.accesses.len(),
            constants = self.constants.len(),
            "extracted access model"
        );
        Ok(AccessModel::new(self.loops, self.accesses, self.constants))
    }

    fn fold_constant(
        &mut self,
        name: &str,
        value: &SyntaxExpr,
        augmented: Option<BinaryOperator>,
    ) {
        let lowered = lower_plain(value).map(|rhs| match augmented {
            Some(op) => Expr::binary(op, Expr::var(name), rhs),
            None => rhs,
        });
        match lowered.and_then(|expr| expr.eval_const(self.constants.as_map())) {
            Some(folded) => {
                debug!(name, value = folded, "folded top-level constant");
                self.constants.insert(name, folded);
            }
            None => {
                debug!(name, "top-level assignment does not fold; name is not a constant");
                self.constants.remove(name);
            }
        }
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Loops
    // ═══════════════════════════════════════════════════════════════════════

    fn enter_loop(&mut self, for_loop: &ForLoop, parent: Option<LoopId>) -> Result<()> {
        let span = Some(for_loop.span);
        let variable = for_loop.target.clone().ok_or_else(|| {
            AnalysisError::malformed_loop("loop target is not a single name", span)
        })?;
        if for_loop.has_else {
            return Err(AnalysisError::malformed_loop(
                "for loop with an else clause",
                span,
            ));
        }
        if self.scope.iter().any(|(name, _)| *name == variable) {
            return Err(AnalysisError::malformed_loop(
                format!("loop variable `{}` shadows an enclosing loop", variable),
                span,
            ));
        }

        let (lower, upper) = match &for_loop.iterable {
            LoopIterable::Range(args) => match args.as_slice() {
                [upper] => (Expr::lit(0), self.bound(upper)?),
                [lower, upper] => (self.bound(lower)?, self.bound(upper)?),
                [] => return Err(AnalysisError::malformed_loop("range() without arguments", span)),
                _ => {
                    return Err(AnalysisError::malformed_loop(
                        "range() with a step argument",
                        span,
                    ))
                }
            },
            LoopIterable::Other(what) => {
                return Err(AnalysisError::malformed_loop(
                    format!("iterable {} is not range(lower, upper)", what),
                    span,
                ))
            }
        };

        let id = LoopId(self.loops.len());
        let mut spec = LoopSpec::new(id, variable.clone(), lower, upper).with_span(for_loop.span);
        if let Some(parent) = parent {
            spec = spec.with_parent(parent);
        }
        debug!(
            variable = %spec.variable,
            lower = %spec.lower,
            upper = %spec.upper,
            depth = self.scope.len(),
            "loop header"
        );
        self.loops.push(spec);

        self.scope.push((variable, id));
        let walked = self.body(&for_loop.body, id);
        self.scope.pop();
        walked
    }

    fn body(&mut self, body: &[SyntaxStmt], scope: LoopId) -> Result<()> {
        for stmt in body {
            match stmt {
                SyntaxStmt::Assign {
                    target,
                    value,
                    augmented,
                    span,
                } => self.assignment(target, value, augmented.is_some(), *span, scope)?,
                SyntaxStmt::For(nested) => self.enter_loop(nested, Some(scope))?,
                SyntaxStmt::Unsupported { construct, span } => {
                    return Err(AnalysisError::unsupported(construct.clone(), Some(*span)))
                }
            }
        }
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Accesses
    // ═══════════════════════════════════════════════════════════════════════

    fn assignment(
        &mut self,
        target: &SyntaxExpr,
        value: &SyntaxExpr,
        augmented: bool,
        span: Span,
        scope: LoopId,
    ) -> Result<()> {
        let SyntaxExpr::Subscript {
            array,
            index,
            span: target_span,
        } = target
        else {
            return Err(AnalysisError::unsupported(
                "assignment target is not an array element",
                Some(target.span()),
            ));
        };

        let statement = self.statements;
        self.statements += 1;
        let write_index = self.index(index)?;

        if augmented {
            self.accesses.push(
                Access::read(array.clone(), write_index.clone())
                    .in_scope(scope)
                    .at(statement, *target_span),
            );
        }

        let mut reads = Vec::new();
        collect_subscripts(value, &mut reads);
        for (read_array, read_index, read_span) in reads {
            let read_index = self.index(read_index)?;
            self.accesses.push(
                Access::read(read_array, read_index)
                    .in_scope(scope)
                    .at(statement, read_span),
            );
        }

        self.accesses.push(
            Access::write(array.clone(), write_index)
                .in_scope(scope)
                .at(statement, *target_span),
        );
        debug!(statement, span = %span, "assignment");
        Ok(())
    }

    // ═══════════════════════════════════════════════════════════════════════
    // Expressions
    // ═══════════════════════════════════════════════════════════════════════

    fn bound(&self, expr: &SyntaxExpr) -> Result<Expr> {
        self.scoped(expr, "subscript in a loop bound")
    }

    fn index(&self, expr: &SyntaxExpr) -> Result<Expr> {
        self.scoped(expr, "subscript inside an index expression")
    }

    /// Lower `expr`, rejecting subscripts and names not in scope
    fn scoped(&self, expr: &SyntaxExpr, subscript_construct: &str) -> Result<Expr> {
        match expr {
            SyntaxExpr::Int { value, .. } => Ok(Expr::lit(*value)),
            SyntaxExpr::Name { id, span } => {
                let in_scope = self.scope.iter().any(|(name, _)| name == id)
                    || self.constants.contains(id);
                if in_scope {
                    Ok(Expr::var(id.clone()))
                } else {
                    Err(AnalysisError::unbound(id.clone(), Some(*span)))
                }
            }
            SyntaxExpr::Binary {
                op, left, right, ..
            } => Ok(Expr::binary(
                *op,
                self.scoped(left, subscript_construct)?,
                self.scoped(right, subscript_construct)?,
            )),
            SyntaxExpr::Subscript { span, .. } => Err(AnalysisError::unsupported(
                subscript_construct,
                Some(*span),
            )),
        }
    }
}

/// Lower without scope checks; `None` if a subscript appears
fn lower_plain(expr: &SyntaxExpr) -> Option<Expr> {
    match expr {
        SyntaxExpr::Int { value, .. } => Some(Expr::lit(*value)),
        SyntaxExpr::Name { id, .. } => Some(Expr::var(id.clone())),
        SyntaxExpr::Binary {
            op, left, right, ..
        } => Some(Expr::binary(*op, lower_plain(left)?, lower_plain(right)?)),
        SyntaxExpr::Subscript { .. } => None,
    }
}

/// Subscripts of `expr` in left-to-right order, without descending into indices
fn collect_subscripts<'a>(expr: &'a SyntaxExpr, out: &mut Vec<(String, &'a SyntaxExpr, Span)>) {
    match expr {
        SyntaxExpr::Int { .. } | SyntaxExpr::Name { .. } => {}
        SyntaxExpr::Binary { left, right, .. } => {
            collect_subscripts(left, out);
            collect_subscripts(right, out);
        }
        SyntaxExpr::Subscript { array, index, span } => out.push((array.clone(), index, *span)),
    }
}

//! Index and bound expressions
//!
//! Strictly a tree: literals, variable references, and binary arithmetic.

use crate::shared::models::{floor_div, floor_mod};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Arithmetic operator
///
/// `Div` and `Mod` are floored (see [`crate::shared::models::integer`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl BinaryOperator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "//",
            Self::Mod => "%",
        }
    }

    /// Concrete semantics; `None` on overflow or a zero divisor
    pub fn apply(&self, a: i64, b: i64) -> Option<i64> {
        match self {
            Self::Add => a.checked_add(b),
            Self::Sub => a.checked_sub(b),
            Self::Mul => a.checked_mul(b),
            Self::Div => floor_div(a, b),
            Self::Mod => floor_mod(a, b),
        }
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div | Self::Mod => 2,
        }
    }
}

/// Index / bound expression
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Expr {
    Literal(i64),
    VariableRef(String),
    BinaryOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
}

impl Expr {
    pub fn lit(value: i64) -> Self {
        Expr::Literal(value)
    }

    pub fn var(name: impl Into<String>) -> Self {
        Expr::VariableRef(name.into())
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::BinaryOp {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    /// Names referenced anywhere in the tree, in first-occurrence order
    pub fn variables(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    fn collect_variables<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expr::Literal(_) => {}
            Expr::VariableRef(name) => {
                if !out.contains(&name.as_str()) {
                    out.push(name.as_str());
                }
            }
            Expr::BinaryOp { left, right, .. } => {
                left.collect_variables(out);
                right.collect_variables(out);
            }
        }
    }

    pub fn references(&self, name: &str) -> bool {
        self.variables().contains(&name)
    }

    /// Fold to a concrete value using `constants`
    ///
    /// `None` if a name is missing, a divisor is zero, or arithmetic overflows.
    pub fn eval_const(&self, constants: &FxHashMap<String, i64>) -> Option<i64> {
        match self {
            Expr::Literal(v) => Some(*v),
            Expr::VariableRef(name) => constants.get(name).copied(),
            Expr::BinaryOp { op, left, right } => {
                let l = left.eval_const(constants)?;
                let r = right.eval_const(constants)?;
                op.apply(l, r)
            }
        }
    }

    fn fmt_with(&self, f: &mut fmt::Formatter<'_>, parent: u8, right_side: bool) -> fmt::Result {
        match self {
            Expr::Literal(v) => write!(f, "{}", v),
            Expr::VariableRef(name) => write!(f, "{}", name),
            Expr::BinaryOp { op, left, right } => {
                let prec = op.precedence();
                let parens = prec < parent || (right_side && prec == parent);
                if parens {
                    write!(f, "(")?;
                }
                left.fmt_with(f, prec, false)?;
                write!(f, " {} ", op.symbol())?;
                right.fmt_with(f, prec, true)?;
                if parens {
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.fmt_with(f, 0, false)
    }
}

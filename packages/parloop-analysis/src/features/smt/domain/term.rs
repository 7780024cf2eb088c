//! Integer terms and formulas
//!
//! The representation every backend consumes. Backends translate it into
//! their native vocabulary (Z3 ASTs) or evaluate it directly (enumeration).
//! `Div` and `Mod` are floored, as everywhere else in the crate.

use crate::shared::models::{floor_div, floor_mod};
use std::fmt;

/// Handle to a solver-declared integer variable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(pub u32);

impl VarId {
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    /// Floored division
    Div,
    /// Floored modulo
    Mod,
}

impl ArithOp {
    pub fn apply(&self, a: i64, b: i64) -> Result<i64, EvalFault> {
        let result = match self {
            ArithOp::Add => a.checked_add(b),
            ArithOp::Sub => a.checked_sub(b),
            ArithOp::Mul => a.checked_mul(b),
            ArithOp::Div | ArithOp::Mod if b == 0 => return Err(EvalFault::DivisionByZero),
            ArithOp::Div => floor_div(a, b),
            ArithOp::Mod => floor_mod(a, b),
        };
        result.ok_or(EvalFault::Overflow)
    }

    fn symbol(&self) -> &'static str {
        match self {
            ArithOp::Add => "+",
            ArithOp::Sub => "-",
            ArithOp::Mul => "*",
            ArithOp::Div => "div",
            ArithOp::Mod => "mod",
        }
    }
}

/// Why a term has no concrete value under an assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalFault {
    DivisionByZero,
    Overflow,
    /// Variable outside the assignment
    Unassigned(VarId),
}

/// Integer-valued term
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Const(i64),
    Var(VarId),
    Arith {
        op: ArithOp,
        lhs: Box<Term>,
        rhs: Box<Term>,
    },
}

impl Term {
    pub fn constant(value: i64) -> Self {
        Term::Const(value)
    }

    pub fn var(id: VarId) -> Self {
        Term::Var(id)
    }

    /// Build `lhs op rhs`, folding when both sides are constant and the
    /// operation is defined
    pub fn arith(op: ArithOp, lhs: Term, rhs: Term) -> Self {
        if let (Term::Const(a), Term::Const(b)) = (&lhs, &rhs) {
            if let Ok(value) = op.apply(*a, *b) {
                return Term::Const(value);
            }
        }
        Term::Arith {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        }
    }

    pub fn as_const(&self) -> Option<i64> {
        match self {
            Term::Const(v) => Some(*v),
            _ => None,
        }
    }

    /// Highest variable mentioned, `None` for closed terms
    pub fn max_var(&self) -> Option<VarId> {
        match self {
            Term::Const(_) => None,
            Term::Var(id) => Some(*id),
            Term::Arith { lhs, rhs, .. } => lhs.max_var().max(rhs.max_var()),
        }
    }

    pub fn mentions(&self, var: VarId) -> bool {
        match self {
            Term::Const(_) => false,
            Term::Var(id) => *id == var,
            Term::Arith { lhs, rhs, .. } => lhs.mentions(var) || rhs.mentions(var),
        }
    }

    /// Every divisor of a `div`/`mod` node, outermost first
    pub fn divisors(&self) -> Vec<&Term> {
        let mut out = Vec::new();
        self.collect_divisors(&mut out);
        out
    }

    fn collect_divisors<'a>(&'a self, out: &mut Vec<&'a Term>) {
        if let Term::Arith { op, lhs, rhs } = self {
            if matches!(op, ArithOp::Div | ArithOp::Mod) {
                out.push(rhs);
            }
            lhs.collect_divisors(out);
            rhs.collect_divisors(out);
        }
    }

    /// Replace every occurrence of `var` with `replacement`
    pub fn substitute(&self, var: VarId, replacement: &Term) -> Term {
        match self {
            Term::Var(id) if *id == var => replacement.clone(),
            Term::Const(_) | Term::Var(_) => self.clone(),
            Term::Arith { op, lhs, rhs } => Term::arith(
                *op,
                lhs.substitute(var, replacement),
                rhs.substitute(var, replacement),
            ),
        }
    }

    /// Evaluate under `assignment[var.index()]`
    pub fn eval(&self, assignment: &[i64]) -> Result<i64, EvalFault> {
        match self {
            Term::Const(v) => Ok(*v),
            Term::Var(id) => assignment
                .get(id.index())
                .copied()
                .ok_or(EvalFault::Unassigned(*id)),
            Term::Arith { op, lhs, rhs } => {
                let a = lhs.eval(assignment)?;
                let b = rhs.eval(assignment)?;
                op.apply(a, b)
            }
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Const(v) => write!(f, "{}", v),
            Term::Var(id) => write!(f, "v{}", id.0),
            Term::Arith { op, lhs, rhs } => write!(f, "({} {} {})", op.symbol(), lhs, rhs),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CmpOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
}

impl CmpOp {
    pub fn holds(&self, a: i64, b: i64) -> bool {
        match self {
            CmpOp::Eq => a == b,
            CmpOp::Ne => a != b,
            CmpOp::Lt => a < b,
            CmpOp::Le => a <= b,
            CmpOp::Gt => a > b,
            CmpOp::Ge => a >= b,
        }
    }

    fn symbol(&self) -> &'static str {
        match self {
            CmpOp::Eq => "=",
            CmpOp::Ne => "distinct",
            CmpOp::Lt => "<",
            CmpOp::Le => "<=",
            CmpOp::Gt => ">",
            CmpOp::Ge => ">=",
        }
    }
}

/// Boolean formula over integer terms
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Formula {
    Cmp { op: CmpOp, lhs: Term, rhs: Term },
    And(Vec<Formula>),
    Not(Box<Formula>),
}

impl Formula {
    pub fn cmp(op: CmpOp, lhs: Term, rhs: Term) -> Self {
        Formula::Cmp { op, lhs, rhs }
    }

    pub fn eq(lhs: Term, rhs: Term) -> Self {
        Self::cmp(CmpOp::Eq, lhs, rhs)
    }

    pub fn ne(lhs: Term, rhs: Term) -> Self {
        Self::cmp(CmpOp::Ne, lhs, rhs)
    }

    pub fn and(parts: Vec<Formula>) -> Self {
        Formula::And(parts)
    }

    pub fn not(inner: Formula) -> Self {
        Formula::Not(Box::new(inner))
    }

    /// `lower <= value < upper`
    pub fn within(value: Term, lower: Term, upper: Term) -> Self {
        Formula::And(vec![
            Self::cmp(CmpOp::Le, lower, value.clone()),
            Self::cmp(CmpOp::Lt, value, upper),
        ])
    }

    pub fn max_var(&self) -> Option<VarId> {
        match self {
            Formula::Cmp { lhs, rhs, .. } => lhs.max_var().max(rhs.max_var()),
            Formula::And(parts) => parts.iter().filter_map(Formula::max_var).max(),
            Formula::Not(inner) => inner.max_var(),
        }
    }

    /// Top-level conjuncts with nested `And`s flattened
    pub fn conjuncts(&self) -> Vec<&Formula> {
        match self {
            Formula::And(parts) => parts.iter().flat_map(Formula::conjuncts).collect(),
            other => vec![other],
        }
    }

    pub fn substitute(&self, var: VarId, replacement: &Term) -> Formula {
        match self {
            Formula::Cmp { op, lhs, rhs } => Formula::Cmp {
                op: *op,
                lhs: lhs.substitute(var, replacement),
                rhs: rhs.substitute(var, replacement),
            },
            Formula::And(parts) => Formula::And(
                parts
                    .iter()
                    .map(|part| part.substitute(var, replacement))
                    .collect(),
            ),
            Formula::Not(inner) => Formula::not(inner.substitute(var, replacement)),
        }
    }

    /// Evaluate under a full assignment
    pub fn eval(&self, assignment: &[i64]) -> Result<bool, EvalFault> {
        match self {
            Formula::Cmp { op, lhs, rhs } => Ok(op.holds(lhs.eval(assignment)?, rhs.eval(assignment)?)),
            Formula::And(parts) => {
                for part in parts {
                    if !part.eval(assignment)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Formula::Not(inner) => Ok(!inner.eval(assignment)?),
        }
    }
}

impl fmt::Display for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Cmp { op, lhs, rhs } => write!(f, "({} {} {})", op.symbol(), lhs, rhs),
            Formula::And(parts) => {
                write!(f, "(and")?;
                for part in parts {
                    write!(f, " {}", part)?;
                }
                write!(f, ")")
            }
            Formula::Not(inner) => write!(f, "(not {})", inner),
        }
    }
}

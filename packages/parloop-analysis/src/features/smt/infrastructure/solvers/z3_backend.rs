//! Z3 SMT Solver Backend
//!
//! Translates [`Term`]/[`Formula`] into Z3 integer arithmetic and forwards
//! push/pop to Z3's own scopes.
//!
//! Only available when compiled with `--features z3`.
//!
//! ## Installation
//!
//! ```bash
//! apt-get install libz3-dev  # Linux
//! brew install z3            # macOS
//!
//! cargo build --release --features z3
//! ```
//!
//! ## Division
//!
//! SMT-LIB `div`/`mod` are Euclidean (remainder never negative). Terms here
//! are floored, so both are rewritten:
//!
//! ```text
//! floordiv(a, b) = ite(b > 0, div(a, b), div(-a, -b))
//! floormod(a, b) = a - b * floordiv(a, b)
//! ```
//!
//! For `b = 0` both are unconstrained; callers assert `b != 0` separately.

#![cfg(feature = "z3")]

use super::{ConstraintSolver, Model, SolverResult};
use crate::features::smt::domain::{ArithOp, CmpOp, Formula, Term, VarId};
use z3::ast::{Ast, Bool, Int};
use z3::{Context, Params, SatResult, Solver};

/// Z3 backend bound to a caller-owned context
///
/// ```rust,ignore
/// let ctx = z3::Context::new(&z3::Config::new());
/// let mut solver = Z3Backend::new(&ctx, 5_000);
/// ```
pub struct Z3Backend<'ctx> {
    ctx: &'ctx Context,
    solver: Solver<'ctx>,
    vars: Vec<(String, Int<'ctx>)>,
    /// Declared variable count at each `push`
    frames: Vec<usize>,
}

impl<'ctx> Z3Backend<'ctx> {
    /// Create a backend with a per-check timeout
    pub fn new(ctx: &'ctx Context, timeout_ms: u64) -> Self {
        let solver = Solver::new(ctx);
        let mut params = Params::new(ctx);
        params.set_u32("timeout", timeout_ms.min(u32::MAX as u64) as u32);
        solver.set_params(&params);

        Self {
            ctx,
            solver,
            vars: Vec::new(),
            frames: Vec::new(),
        }
    }

    fn int(&self, term: &Term) -> Int<'ctx> {
        match term {
            Term::Const(v) => Int::from_i64(self.ctx, *v),
            Term::Var(id) => self.vars[id.index()].1.clone(),
            Term::Arith { op, lhs, rhs } => {
                let l = self.int(lhs);
                let r = self.int(rhs);
                match op {
                    ArithOp::Add => Int::add(self.ctx, &[&l, &r]),
                    ArithOp::Sub => Int::sub(self.ctx, &[&l, &r]),
                    ArithOp::Mul => Int::mul(self.ctx, &[&l, &r]),
                    ArithOp::Div => self.floor_div(&l, &r),
                    ArithOp::Mod => {
                        let q = self.floor_div(&l, &r);
                        Int::sub(self.ctx, &[&l, &Int::mul(self.ctx, &[&r, &q])])
                    }
                }
            }
        }
    }

    fn floor_div(&self, a: &Int<'ctx>, b: &Int<'ctx>) -> Int<'ctx> {
        let zero = Int::from_i64(self.ctx, 0);
        let positive = a.div(b);
        let negative = a.unary_minus().div(&b.unary_minus());
        b.gt(&zero).ite(&positive, &negative)
    }

    fn bool(&self, formula: &Formula) -> Bool<'ctx> {
        match formula {
            Formula::Cmp { op, lhs, rhs } => {
                let l = self.int(lhs);
                let r = self.int(rhs);
                match op {
                    CmpOp::Eq => l._eq(&r),
                    CmpOp::Ne => l._eq(&r).not(),
                    CmpOp::Lt => l.lt(&r),
                    CmpOp::Le => l.le(&r),
                    CmpOp::Gt => l.gt(&r),
                    CmpOp::Ge => l.ge(&r),
                }
            }
            Formula::And(parts) => {
                let parts: Vec<Bool<'ctx>> = parts.iter().map(|p| self.bool(p)).collect();
                let refs: Vec<&Bool<'ctx>> = parts.iter().collect();
                Bool::and(self.ctx, &refs)
            }
            Formula::Not(inner) => self.bool(inner).not(),
        }
    }

    fn extract_model(&self) -> Option<Model> {
        let model = self.solver.get_model()?;
        let mut out = Model::new();
        for (name, var) in &self.vars {
            if let Some(value) = model.eval(var, true).and_then(|v| v.as_i64()) {
                out.insert(name.clone(), value);
            }
        }
        Some(out)
    }
}

impl ConstraintSolver for Z3Backend<'_> {
    fn name(&self) -> &'static str {
        "z3"
    }

    fn declare_int(&mut self, name: &str) -> VarId {
        let var = Int::new_const(self.ctx, name);
        self.vars.push((name.to_string(), var));
        VarId((self.vars.len() - 1) as u32)
    }

    fn assert(&mut self, formula: Formula) {
        let encoded = self.bool(&formula);
        self.solver.assert(&encoded);
    }

    fn push(&mut self) {
        self.solver.push();
        self.frames.push(self.vars.len());
    }

    fn pop(&mut self) {
        if let Some(vars) = self.frames.pop() {
            self.solver.pop(1);
            self.vars.truncate(vars);
        }
    }

    fn scope_depth(&self) -> usize {
        self.frames.len()
    }

    fn check(&mut self) -> SolverResult {
        match self.solver.check() {
            SatResult::Sat => SolverResult::Sat(self.extract_model()),
            SatResult::Unsat => SolverResult::Unsat,
            SatResult::Unknown => SolverResult::Unknown(
                self.solver
                    .get_reason_unknown()
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
        }
    }
}

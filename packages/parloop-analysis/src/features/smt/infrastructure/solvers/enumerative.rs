//! Enumerative Finite-Domain Solver
//!
//! Decides conjunctions of integer comparisons whose variables all have
//! finite ranges, by depth-first search over variables in declaration order.
//!
//! ## Algorithm
//!
//! 1. Flatten every assertion into conjuncts. Comparisons between affine
//!    terms become linear constraints `sum(c_i * x_i) + k <op> 0`; the rest
//!    stay opaque formulas.
//! 2. Divide every linear (dis)equality by the gcd of its coefficients; an
//!    equality whose constant the gcd does not divide is refuted outright.
//! 3. Walk variables from last to first. A linear equality with a `±1`
//!    coefficient on the highest variable pins that variable to an affine
//!    term over earlier ones; the pin is substituted into the level's other
//!    constraints, which move down to earlier levels. Unit-coefficient
//!    inequalities become interval bounds. Closed constraints are decided on
//!    the spot.
//! 4. Search: each variable ranges over `[max(lower), min(upper))` (or its
//!    pin), and every remaining constraint is checked as soon as its highest
//!    variable is assigned.
//!
//! ```text
//!   0 <= i0 < n,  0 <= i1 < n,  i0 != i1,  i0 = i1
//!
//!   pin  i1 := i0          (from i0 - i1 = 0)
//!   i0 - i0 != 0           → closed, false → UNSAT without searching
//!
//!   2*i0 - 2*i1 + 1 = 0    → gcd 2 does not divide 1 → UNSAT
//! ```
//!
//! Every candidate value counts against `max_assignments`. Exhausting the
//! budget, a variable with no finite range, or an arithmetic overflow yields
//! `Unknown`. Division by zero makes the enclosing conjunct false, matching
//! the side conditions callers add for every divisor.

use super::{ConstraintSolver, Model, SolverResult};
use crate::features::smt::domain::{ArithOp, CmpOp, EvalFault, Formula, Term, VarId};
use std::collections::BTreeMap;

/// Finite-domain depth-first solver
pub struct EnumerativeSolver {
    names: Vec<String>,
    assertions: Vec<Formula>,
    /// (declared variables, assertions) at each `push`
    frames: Vec<(usize, usize)>,
    max_assignments: u64,
    total_explored: u64,
}

impl EnumerativeSolver {
    pub fn new(max_assignments: u64) -> Self {
        Self {
            names: Vec::new(),
            assertions: Vec::new(),
            frames: Vec::new(),
            max_assignments,
            total_explored: 0,
        }
    }

    /// Candidate values tried across every `check` so far
    pub fn total_explored(&self) -> u64 {
        self.total_explored
    }

    fn solve(&self, explored: &mut u64) -> SolverResult {
        let plan = match Plan::build(self.names.len(), &self.assertions) {
            Ok(plan) => plan,
            Err(Stop::Refuted) => return SolverResult::Unsat,
            Err(Stop::Fault(reason)) => return SolverResult::Unknown(reason),
            Err(Stop::Budget) => return SolverResult::Unknown(self.budget_reason()),
        };

        if let Some(level) = plan.unbounded_level() {
            return SolverResult::Unknown(format!(
                "variable `{}` has no finite domain",
                self.names[level]
            ));
        }

        let mut assignment = Vec::with_capacity(self.names.len());
        match self.search(&plan, 0, &mut assignment, explored) {
            Ok(true) => {
                let model: Model = self
                    .names
                    .iter()
                    .cloned()
                    .zip(assignment.iter().copied())
                    .collect();
                SolverResult::Sat(Some(model))
            }
            Ok(false) | Err(Stop::Refuted) => SolverResult::Unsat,
            Err(Stop::Budget) => SolverResult::Unknown(self.budget_reason()),
            Err(Stop::Fault(reason)) => SolverResult::Unknown(reason),
        }
    }

    fn search(
        &self,
        plan: &Plan,
        level: usize,
        assignment: &mut Vec<i64>,
        explored: &mut u64,
    ) -> Result<bool, Stop> {
        if level == plan.levels.len() {
            return Ok(true);
        }

        let (lower, upper) = match plan.domain(level, assignment)? {
            Some(range) => range,
            None => return Ok(false),
        };

        let mut value = lower;
        while value < upper {
            *explored += 1;
            if *explored > self.max_assignments {
                return Err(Stop::Budget);
            }

            assignment.push(value);
            if plan.admits(level, assignment)? && self.search(plan, level + 1, assignment, explored)? {
                return Ok(true);
            }
            assignment.pop();
            value += 1;
        }
        Ok(false)
    }

    fn budget_reason(&self) -> String {
        format!(
            "search budget of {} assignments exhausted",
            self.max_assignments
        )
    }
}

impl ConstraintSolver for EnumerativeSolver {
    fn name(&self) -> &'static str {
        "enumerative"
    }

    fn declare_int(&mut self, name: &str) -> VarId {
        self.names.push(name.to_string());
        VarId((self.names.len() - 1) as u32)
    }

    fn assert(&mut self, formula: Formula) {
        self.assertions.push(formula);
    }

    fn push(&mut self) {
        self.frames.push((self.names.len(), self.assertions.len()));
    }

    fn pop(&mut self) {
        if let Some((vars, assertions)) = self.frames.pop() {
            self.names.truncate(vars);
            self.assertions.truncate(assertions);
        }
    }

    fn scope_depth(&self) -> usize {
        self.frames.len()
    }

    fn check(&mut self) -> SolverResult {
        let mut explored = 0;
        let result = self.solve(&mut explored);
        self.total_explored += explored;
        tracing::trace!(
            explored,
            vars = self.names.len(),
            assertions = self.assertions.len(),
            "enumerative check finished"
        );
        result
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Search plan
// ═══════════════════════════════════════════════════════════════════════════

/// Why the search stopped early
enum Stop {
    /// Proven unsatisfiable before enumeration
    Refuted,
    Budget,
    Fault(String),
}

impl Stop {
    fn overflow(context: &impl std::fmt::Display) -> Self {
        Stop::Fault(format!("integer overflow evaluating {}", context))
    }
}

/// `sum(coeffs[v] * v) + constant`
#[derive(Debug, Clone, PartialEq, Eq)]
struct Linear {
    coeffs: BTreeMap<VarId, i64>,
    constant: i64,
}

impl Linear {
    fn constant(value: i64) -> Self {
        Self {
            coeffs: BTreeMap::new(),
            constant: value,
        }
    }

    fn var(id: VarId) -> Self {
        let mut coeffs = BTreeMap::new();
        coeffs.insert(id, 1);
        Self {
            coeffs,
            constant: 0,
        }
    }

    /// Affine view of `term`; `None` for div/mod, non-constant products, or overflow
    fn from_term(term: &Term) -> Option<Self> {
        match term {
            Term::Const(v) => Some(Self::constant(*v)),
            Term::Var(id) => Some(Self::var(*id)),
            Term::Arith { op, lhs, rhs } => {
                let l = Self::from_term(lhs)?;
                let r = Self::from_term(rhs)?;
                match op {
                    ArithOp::Add => l.plus(&r, 1),
                    ArithOp::Sub => l.plus(&r, -1),
                    ArithOp::Mul if l.is_constant() => r.scale(l.constant),
                    ArithOp::Mul if r.is_constant() => l.scale(r.constant),
                    _ => None,
                }
            }
        }
    }

    fn is_constant(&self) -> bool {
        self.coeffs.is_empty()
    }

    fn max_var(&self) -> Option<VarId> {
        self.coeffs.keys().next_back().copied()
    }

    fn coeff(&self, var: VarId) -> i64 {
        self.coeffs.get(&var).copied().unwrap_or(0)
    }

    /// `self + factor * other`
    fn plus(mut self, other: &Linear, factor: i64) -> Option<Self> {
        self.constant = self
            .constant
            .checked_add(other.constant.checked_mul(factor)?)?;
        for (var, c) in &other.coeffs {
            let entry = self.coeffs.entry(*var).or_insert(0);
            *entry = entry.checked_add(c.checked_mul(factor)?)?;
            if *entry == 0 {
                self.coeffs.remove(var);
            }
        }
        Some(self)
    }

    fn scale(mut self, factor: i64) -> Option<Self> {
        if factor == 0 {
            return Some(Self::constant(0));
        }
        self.constant = self.constant.checked_mul(factor)?;
        for c in self.coeffs.values_mut() {
            *c = c.checked_mul(factor)?;
        }
        Some(self)
    }

    /// gcd of the coefficients, `None` for a constant
    fn coeff_gcd(&self) -> Option<u64> {
        self.coeffs
            .values()
            .map(|c| c.unsigned_abs())
            .reduce(|a, b| gcd(a, b))
    }

    /// Every coefficient and the constant divided by `divisor`; `None` if
    /// the constant is not a multiple
    fn divide_exact(&self, divisor: i64) -> Option<Self> {
        if self.constant.checked_rem(divisor)? != 0 {
            return None;
        }
        Some(Self {
            coeffs: self.coeffs.iter().map(|(v, c)| (*v, c / divisor)).collect(),
            constant: self.constant / divisor,
        })
    }

    fn without(&self, var: VarId) -> Self {
        let mut rest = self.clone();
        rest.coeffs.remove(&var);
        rest
    }

    /// Replace `var` with `replacement`
    fn substitute(&self, var: VarId, replacement: &Linear) -> Option<Self> {
        match self.coeff(var) {
            0 => Some(self.clone()),
            c => self.without(var).plus(replacement, c),
        }
    }

    fn to_term(&self) -> Term {
        let mut term = Term::constant(self.constant);
        for (var, c) in &self.coeffs {
            let product = match c {
                1 => Term::var(*var),
                _ => Term::arith(ArithOp::Mul, Term::constant(*c), Term::var(*var)),
            };
            term = Term::arith(ArithOp::Add, term, product);
        }
        term
    }

    fn eval(&self, assignment: &[i64]) -> Result<i64, EvalFault> {
        let mut total = self.constant;
        for (var, c) in &self.coeffs {
            let value = assignment
                .get(var.index())
                .copied()
                .ok_or(EvalFault::Unassigned(*var))?;
            total = value
                .checked_mul(*c)
                .and_then(|p| total.checked_add(p))
                .ok_or(EvalFault::Overflow)?;
        }
        Ok(total)
    }
}

impl std::fmt::Display for Linear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_term())
    }
}

#[derive(Debug, Clone)]
enum Constraint {
    /// `lin <op> 0`
    Linear { lin: Linear, op: CmpOp },
    Opaque(Formula),
}

impl Constraint {
    fn from_formula(formula: &Formula) -> Self {
        if let Formula::Cmp { op, lhs, rhs } = formula {
            let diff = Linear::from_term(lhs)
                .zip(Linear::from_term(rhs))
                .and_then(|(l, r)| l.plus(&r, -1));
            if let Some(lin) = diff {
                return Constraint::Linear { lin, op: *op };
            }
        }
        Constraint::Opaque(formula.clone())
    }

    /// Divide a linear (dis)equality through by its coefficient gcd.
    /// `Ok(None)` means the constraint always holds.
    fn normalize(self) -> Result<Option<Self>, Stop> {
        let (lin, op) = match self {
            Constraint::Linear {
                lin,
                op: op @ (CmpOp::Eq | CmpOp::Ne),
            } => (lin, op),
            other => return Ok(Some(other)),
        };
        let divisor = match lin.coeff_gcd().map(i64::try_from) {
            Some(Ok(g)) if g > 1 => g,
            _ => return Ok(Some(Constraint::Linear { lin, op })),
        };
        match lin.divide_exact(divisor) {
            Some(lin) => Ok(Some(Constraint::Linear { lin, op })),
            None if matches!(op, CmpOp::Eq) => Err(Stop::Refuted),
            None => Ok(None),
        }
    }

    fn max_var(&self) -> Option<VarId> {
        match self {
            Constraint::Linear { lin, .. } => lin.max_var(),
            Constraint::Opaque(formula) => formula.max_var(),
        }
    }

    /// Truth under `assignment`; division by zero decides it false
    fn holds(&self, assignment: &[i64]) -> Result<bool, Stop> {
        let outcome = match self {
            Constraint::Linear { lin, op } => lin.eval(assignment).map(|v| op.holds(v, 0)),
            Constraint::Opaque(formula) => formula.eval(assignment),
        };
        match outcome {
            Ok(holds) => Ok(holds),
            Err(EvalFault::DivisionByZero) => Ok(false),
            Err(EvalFault::Overflow) => Err(Stop::overflow(self)),
            Err(EvalFault::Unassigned(var)) => Err(Stop::Fault(format!(
                "v{} read before assignment in {}",
                var.0, self
            ))),
        }
    }

    fn substitute(&self, var: VarId, pin: &Linear) -> Option<Self> {
        match self {
            Constraint::Linear { lin, op } => Some(Constraint::Linear {
                lin: lin.substitute(var, pin)?,
                op: *op,
            }),
            Constraint::Opaque(formula) => Some(Constraint::from_formula(
                &formula.substitute(var, &pin.to_term()),
            )),
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Constraint::Linear { lin, op } => {
                write!(f, "{}", Formula::cmp(*op, lin.to_term(), Term::constant(0)))
            }
            Constraint::Opaque(formula) => write!(f, "{}", formula),
        }
    }
}

/// Per-variable search data
#[derive(Debug, Default)]
struct Level {
    pin: Option<Linear>,
    /// Inclusive lower bounds
    lowers: Vec<Term>,
    /// Exclusive upper bounds
    uppers: Vec<Term>,
    checks: Vec<Constraint>,
}

struct Plan {
    levels: Vec<Level>,
}

impl Plan {
    fn build(num_vars: usize, assertions: &[Formula]) -> Result<Self, Stop> {
        let mut buckets: Vec<Vec<Constraint>> = vec![Vec::new(); num_vars];
        for assertion in assertions {
            for conjunct in assertion.conjuncts() {
                file(&mut buckets, Constraint::from_formula(conjunct))?;
            }
        }

        let mut levels: Vec<Level> = (0..num_vars).map(|_| Level::default()).collect();
        for index in (0..num_vars).rev() {
            let var = VarId(index as u32);
            let bucket = std::mem::take(&mut buckets[index]);

            let pin = bucket.iter().find_map(|c| match c {
                Constraint::Linear {
                    lin,
                    op: CmpOp::Eq,
                } => unit_solution(lin, var),
                _ => None,
            });

            if let Some(pin) = pin {
                for constraint in bucket {
                    match constraint.substitute(var, &pin) {
                        Some(moved) => file(&mut buckets, moved)?,
                        None => levels[index].checks.push(constraint),
                    }
                }
                levels[index].pin = Some(pin);
                continue;
            }

            for constraint in bucket {
                let level = &mut levels[index];
                match bound(&constraint, var) {
                    Some(Bound::Lower(b)) => level.lowers.push(b),
                    Some(Bound::Upper(b)) => level.uppers.push(b),
                    None => level.checks.push(constraint),
                }
            }
        }

        Ok(Self { levels })
    }

    /// First level that neither has a pin nor both bounds
    fn unbounded_level(&self) -> Option<usize> {
        self.levels.iter().position(|level| {
            level.pin.is_none() && (level.lowers.is_empty() || level.uppers.is_empty())
        })
    }

    /// Candidate range `[lower, upper)` for `level`, `None` when empty
    fn domain(&self, level: usize, assignment: &[i64]) -> Result<Option<(i64, i64)>, Stop> {
        let data = &self.levels[level];

        let mut lower = i64::MIN;
        let mut upper = i64::MAX;
        if let Some(pin) = &data.pin {
            lower = pin.eval(assignment).map_err(|_| Stop::overflow(pin))?;
            upper = lower.checked_add(1).ok_or_else(|| Stop::overflow(pin))?;
        }
        for b in &data.lowers {
            match bound_value(b, assignment)? {
                Some(value) => lower = lower.max(value),
                None => return Ok(None),
            }
        }
        for b in &data.uppers {
            match bound_value(b, assignment)? {
                Some(value) => upper = upper.min(value),
                None => return Ok(None),
            }
        }
        Ok((lower < upper).then_some((lower, upper)))
    }

    /// Whether the checks attached to `level` hold
    fn admits(&self, level: usize, assignment: &[i64]) -> Result<bool, Stop> {
        for check in &self.levels[level].checks {
            if !check.holds(assignment)? {
                return Ok(false);
            }
        }
        Ok(true)
    }
}

/// Place `constraint` at its highest variable, deciding closed ones now
fn file(buckets: &mut [Vec<Constraint>], constraint: Constraint) -> Result<(), Stop> {
    let Some(constraint) = constraint.normalize()? else {
        return Ok(());
    };
    match constraint.max_var() {
        Some(var) => {
            buckets[var.index()].push(constraint);
            Ok(())
        }
        None => match constraint.holds(&[])? {
            true => Ok(()),
            false => Err(Stop::Refuted),
        },
    }
}

fn gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        (a, b) = (b, a % b);
    }
    a
}

/// `var` solved from `lin = 0` when its coefficient is a unit
fn unit_solution(lin: &Linear, var: VarId) -> Option<Linear> {
    let rest = lin.without(var);
    match lin.coeff(var) {
        1 => rest.scale(-1),
        -1 => Some(rest),
        _ => None,
    }
}

enum Bound {
    Lower(Term),
    Upper(Term),
}

/// Interval bound on `var` implied by `constraint`, if it has that shape
fn bound(constraint: &Constraint, var: VarId) -> Option<Bound> {
    let (base, op) = match constraint {
        // c*v + rest <op> 0 with c = ±1 becomes v <op'> base
        Constraint::Linear { lin, op } => {
            let rest = lin.without(var);
            match lin.coeff(var) {
                1 => (rest.scale(-1)?.to_term(), *op),
                -1 => (rest.to_term(), flip(*op)),
                _ => return None,
            }
        }
        // v <op> t or t <op> v, t free of v (e.g. a bound with a division)
        Constraint::Opaque(Formula::Cmp { op, lhs, rhs }) => match (lhs, rhs) {
            (Term::Var(v), other) if *v == var && !other.mentions(var) => (other.clone(), *op),
            (other, Term::Var(v)) if *v == var && !other.mentions(var) => {
                (other.clone(), flip(*op))
            }
            _ => return None,
        },
        Constraint::Opaque(_) => return None,
    };
    let plus_one = |t: Term| Term::arith(ArithOp::Add, t, Term::constant(1));
    match op {
        CmpOp::Le => Some(Bound::Upper(plus_one(base))),
        CmpOp::Lt => Some(Bound::Upper(base)),
        CmpOp::Ge => Some(Bound::Lower(base)),
        CmpOp::Gt => Some(Bound::Lower(plus_one(base))),
        CmpOp::Eq | CmpOp::Ne => None,
    }
}

/// Concrete bound; `None` when the bound divides by zero (its conjunct is false)
fn bound_value(bound: &Term, assignment: &[i64]) -> Result<Option<i64>, Stop> {
    match bound.eval(assignment) {
        Ok(value) => Ok(Some(value)),
        Err(EvalFault::DivisionByZero) => Ok(None),
        Err(_) => Err(Stop::overflow(bound)),
    }
}

/// Mirror a comparison across negation of both sides
fn flip(op: CmpOp) -> CmpOp {
    match op {
        CmpOp::Lt => CmpOp::Gt,
        CmpOp::Le => CmpOp::Ge,
        CmpOp::Gt => CmpOp::Lt,
        CmpOp::Ge => CmpOp::Le,
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(v: i64) -> Term {
        Term::constant(v)
    }

    fn bounded(solver: &mut EnumerativeSolver, name: &str, lo: i64, hi: i64) -> Term {
        let v = Term::var(solver.declare_int(name));
        solver.assert(Formula::within(v.clone(), c(lo), c(hi)));
        v
    }

    #[test]
    fn test_sat_returns_model() {
        let mut solver = EnumerativeSolver::new(1_000);
        let x = bounded(&mut solver, "x", 0, 10);
        let y = bounded(&mut solver, "y", 0, 10);
        solver.assert(Formula::eq(
            Term::arith(ArithOp::Mul, x.clone(), x.clone()),
            Term::arith(ArithOp::Add, y.clone(), c(3)),
        ));
        solver.assert(Formula::ne(x, c(2)));

        match solver.check() {
            SolverResult::Sat(Some(model)) => {
                let (x, y) = (model["x"], model["y"]);
                assert_eq!(x * x, y + 3);
                assert_ne!(x, 2);
            }
            other => panic!("expected sat, got {:?}", other),
        }
    }

    #[test]
    fn test_pinned_equality_refutes_without_search() {
        let mut solver = EnumerativeSolver::new(10);
        let i0 = bounded(&mut solver, "i_0", 0, 1_000_000_000);
        let i1 = bounded(&mut solver, "i_1", 0, 1_000_000_000);
        solver.assert(Formula::ne(i0.clone(), i1.clone()));
        solver.assert(Formula::eq(
            Term::arith(ArithOp::Add, i0, c(1)),
            Term::arith(ArithOp::Add, i1, c(1)),
        ));

        assert_eq!(solver.check(), SolverResult::Unsat);
        assert_eq!(solver.total_explored(), 0);
    }

    #[test]
    fn test_strided_equalities_refute_without_search() {
        let mut solver = EnumerativeSolver::new(10);
        let i0 = bounded(&mut solver, "i_0", 0, 1_000_000);
        let i1 = bounded(&mut solver, "i_1", 0, 1_000_000);
        solver.assert(Formula::ne(i0.clone(), i1.clone()));
        let twice = |t: Term| Term::arith(ArithOp::Mul, c(2), t);

        // 2*i0 = 2*i1 reduces to the pin i1 := i0
        solver.push();
        solver.assert(Formula::eq(twice(i0.clone()), twice(i1.clone())));
        assert_eq!(solver.check(), SolverResult::Unsat);
        solver.pop();

        // 2*i0 + 1 = 2*i1 has no integer solution at all
        solver.push();
        solver.assert(Formula::eq(
            Term::arith(ArithOp::Add, twice(i0.clone()), c(1)),
            twice(i1.clone()),
        ));
        assert_eq!(solver.check(), SolverResult::Unsat);
        solver.pop();

        // 3*i0 = 3*i1 + 6 pins i1 := i0 - 2
        solver.assert(Formula::eq(
            Term::arith(ArithOp::Mul, i0, c(3)),
            Term::arith(ArithOp::Add, Term::arith(ArithOp::Mul, i1, c(3)), c(6)),
        ));
        match solver.check() {
            SolverResult::Sat(Some(model)) => assert_eq!(model["i_0"] - model["i_1"], 2),
            other => panic!("expected sat, got {:?}", other),
        }
        assert!(solver.total_explored() <= 10);
    }

    #[test]
    fn test_gcd_normalization() {
        let lin = Linear::from_term(&Term::arith(
            ArithOp::Sub,
            Term::arith(ArithOp::Mul, c(4), Term::var(VarId(0))),
            Term::arith(ArithOp::Mul, c(6), Term::var(VarId(1))),
        ))
        .unwrap();
        assert_eq!(lin.coeff_gcd(), Some(2));
        let odd = lin.clone().plus(&Linear::constant(3), 1).unwrap();

        let eq = Constraint::Linear { lin: lin.clone(), op: CmpOp::Eq };
        match eq.normalize() {
            Ok(Some(Constraint::Linear { lin, .. })) => {
                assert_eq!(lin.coeff(VarId(0)), 2);
                assert_eq!(lin.coeff(VarId(1)), -3);
            }
            _ => panic!("expected a reduced equality"),
        }
        let odd_eq = Constraint::Linear { lin: odd.clone(), op: CmpOp::Eq };
        assert!(matches!(odd_eq.normalize(), Err(Stop::Refuted)));
        let odd_ne = Constraint::Linear { lin: odd, op: CmpOp::Ne };
        assert!(matches!(odd_ne.normalize(), Ok(None)));
    }

    #[test]
    fn test_pinned_offset_finds_witness_in_huge_range() {
        let mut solver = EnumerativeSolver::new(100);
        let i0 = bounded(&mut solver, "i_0", 1, 1_000_000_000);
        let i1 = bounded(&mut solver, "i_1", 1, 1_000_000_000);
        solver.assert(Formula::ne(i0.clone(), i1.clone()));
        solver.assert(Formula::eq(Term::arith(ArithOp::Sub, i0, c(1)), i1));

        match solver.check() {
            SolverResult::Sat(Some(model)) => {
                assert_eq!(model["i_0"], 2);
                assert_eq!(model["i_1"], 1);
            }
            other => panic!("expected sat, got {:?}", other),
        }
    }

    #[test]
    fn test_budget_exhaustion_is_unknown() {
        let mut solver = EnumerativeSolver::new(50);
        let x = bounded(&mut solver, "x", 0, 1_000);
        let y = bounded(&mut solver, "y", 0, 1_000);
        solver.assert(Formula::eq(
            Term::arith(ArithOp::Mod, x, c(7)),
            Term::arith(ArithOp::Add, Term::arith(ArithOp::Mod, y, c(7)), c(9)),
        ));

        match solver.check() {
            SolverResult::Unknown(reason) => assert!(reason.contains("budget")),
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_unbounded_variable_is_unknown() {
        let mut solver = EnumerativeSolver::new(1_000);
        let x = Term::var(solver.declare_int("x"));
        solver.assert(Formula::cmp(CmpOp::Ge, x, c(0)));

        match solver.check() {
            SolverResult::Unknown(reason) => assert!(reason.contains("`x`")),
            other => panic!("expected unknown, got {:?}", other),
        }
    }

    #[test]
    fn test_non_affine_bound_still_bounds() {
        let mut solver = EnumerativeSolver::new(1_000);
        let x = bounded(&mut solver, "x", 1, 4);
        let y = Term::var(solver.declare_int("y"));
        solver.assert(Formula::within(
            y.clone(),
            c(0),
            Term::arith(ArithOp::Mul, x.clone(), x),
        ));
        solver.assert(Formula::cmp(CmpOp::Ge, y, c(5)));

        match solver.check() {
            SolverResult::Sat(Some(model)) => {
                assert_eq!(model["x"], 3);
                assert_eq!(model["y"], 5);
            }
            other => panic!("expected sat, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_range_is_unsat() {
        let mut solver = EnumerativeSolver::new(1_000);
        bounded(&mut solver, "x", 5, 5);
        assert_eq!(solver.check(), SolverResult::Unsat);
    }

    #[test]
    fn test_division_by_zero_falsifies_conjunct() {
        let mut solver = EnumerativeSolver::new(1_000);
        let x = bounded(&mut solver, "x", 0, 1);
        solver.assert(Formula::eq(Term::arith(ArithOp::Div, c(4), x), c(0)));
        assert_eq!(solver.check(), SolverResult::Unsat);
    }

    #[test]
    fn test_floored_semantics_in_search() {
        let mut solver = EnumerativeSolver::new(1_000);
        let x = bounded(&mut solver, "x", -5, 0);
        solver.assert(Formula::eq(Term::arith(ArithOp::Mod, x.clone(), c(3)), c(2)));
        solver.assert(Formula::eq(Term::arith(ArithOp::Div, x, c(3)), c(-1)));

        match solver.check() {
            SolverResult::Sat(Some(model)) => assert_eq!(model["x"], -1),
            other => panic!("expected sat, got {:?}", other),
        }
    }

    #[test]
    fn test_pop_discards_declarations_and_assertions() {
        let mut solver = EnumerativeSolver::new(1_000);
        bounded(&mut solver, "x", 0, 2);
        solver.push();
        let y = bounded(&mut solver, "y", 0, 2);
        solver.assert(Formula::eq(y, c(9)));
        assert_eq!(solver.check(), SolverResult::Unsat);
        solver.pop();

        assert_eq!(solver.scope_depth(), 0);
        match solver.check() {
            SolverResult::Sat(Some(model)) => assert_eq!(model.len(), 1),
            other => panic!("expected sat, got {:?}", other),
        }
    }

    #[test]
    fn test_linear_substitution() {
        let lin = Linear::from_term(&Term::arith(
            ArithOp::Sub,
            Term::arith(ArithOp::Mul, c(2), Term::var(VarId(1))),
            Term::var(VarId(0)),
        ))
        .unwrap();
        let pinned = lin
            .substitute(VarId(1), &Linear::var(VarId(0)))
            .unwrap();
        assert_eq!(pinned.coeff(VarId(0)), 1);
        assert_eq!(pinned.max_var(), Some(VarId(0)));
        assert!(Linear::from_term(&Term::arith(
            ArithOp::Div,
            Term::var(VarId(0)),
            c(2)
        ))
        .is_none());
    }
}

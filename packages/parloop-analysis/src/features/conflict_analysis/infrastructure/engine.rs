//! Conflict query engine
//!
//! ## Base model
//!
//! ```text
//! i_0, i_1 : Int
//! lower <= i_0 < upper
//! lower <= i_1 < upper
//! i_0 != i_1
//! ```
//!
//! An unsatisfiable base means the loop has fewer than two iterations, so
//! neither query can succeed.
//!
//! ## Queries
//!
//! Each pair runs inside its own [`SolverScope`]. Nested loop variables of
//! each side are declared per thread and bounded there, then
//! `index_0 = index_1` is asserted together with the definedness conditions
//! of both index terms. The base survives every query untouched.

use super::binding::{ThreadBinding, ThreadId};
use super::evaluator::{definedness, evaluate};
use crate::config::{AnalysisConfig, SolverKind};
use crate::errors::Result;
use crate::features::access_model::{Access, AccessModel, LoopSpec};
use crate::features::conflict_analysis::domain::{
    AccessSite, ConflictResult, ConflictVerdict, ConflictWitness, QueryKind,
};
use crate::features::smt::{
    ConstraintSolver, EnumerativeSolver, Formula, SolverResult, SolverScope, Term,
};
use tracing::{debug, info};

/// Runs both conflict queries for one access model
#[derive(Debug, Clone)]
pub struct ConflictAnalyzer {
    config: AnalysisConfig,
}

impl ConflictAnalyzer {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze with the configured backend
    pub fn analyze(&self, model: &AccessModel) -> Result<ConflictResult> {
        match self.config.solver {
            SolverKind::Enumerative => {
                let mut solver = EnumerativeSolver::new(self.config.max_assignments);
                let result = self.analyze_with(&mut solver, model);
                debug!(explored = solver.total_explored(), "enumerative search finished");
                result
            }
            SolverKind::Z3 => self.analyze_z3(model),
        }
    }

    #[cfg(feature = "z3")]
    fn analyze_z3(&self, model: &AccessModel) -> Result<ConflictResult> {
        let ctx = z3::Context::new(&z3::Config::new());
        let mut solver = crate::features::smt::Z3Backend::new(&ctx, self.config.timeout_ms);
        self.analyze_with(&mut solver, model)
    }

    #[cfg(not(feature = "z3"))]
    fn analyze_z3(&self, _model: &AccessModel) -> Result<ConflictResult> {
        Err(crate::config::ConfigError::BackendUnavailable("z3".to_string()).into())
    }

    /// Analyze on a caller-provided solver
    ///
    /// The solver must be fresh; it is left at the depth it was given.
    pub fn analyze_with<S>(&self, solver: &mut S, model: &AccessModel) -> Result<ConflictResult>
    where
        S: ConstraintSolver + ?Sized,
    {
        let outer = model.outer();
        info!(
            solver = solver.name(),
            variable = %outer.variable,
            lower = %outer.lower,
            upper = %outer.upper,
            accesses = model.accesses().len(),
            "analyzing loop"
        );

        let mut binding = ThreadBinding::with_constants(model.constants());
        let first = declare_loop_var(solver, &mut binding, outer, ThreadId::T0)?;
        let second = declare_loop_var(solver, &mut binding, outer, ThreadId::T1)?;
        solver.assert(Formula::ne(first, second));

        match solver.check() {
            SolverResult::Unsat => {
                info!("fewer than two iterations; no conflicts possible");
                return Ok(ConflictResult::none());
            }
            SolverResult::Unknown(reason) => {
                debug!(%reason, "base model undecided; querying pairs anyway")
            }
            SolverResult::Sat(_) => {}
        }

        let writes: Vec<&Access> = model.writes().collect();
        let reads: Vec<&Access> = model.reads().collect();

        let mut write_pairs = Vec::new();
        for (i, first) in writes.iter().enumerate() {
            for second in &writes[i..] {
                write_pairs.push((*first, *second));
            }
        }
        let read_pairs: Vec<(&Access, &Access)> = reads
            .iter()
            .flat_map(|read| writes.iter().map(move |write| (*read, *write)))
            .collect();

        let write_write =
            self.run_query(solver, model, &binding, QueryKind::WriteWrite, &write_pairs)?;
        let read_write =
            self.run_query(solver, model, &binding, QueryKind::ReadWrite, &read_pairs)?;

        info!(
            write_write = %write_write,
            read_write = %read_write,
            "analysis complete"
        );
        Ok(ConflictResult {
            write_write,
            read_write,
        })
    }

    /// OR over `pairs`: the first satisfiable pair wins; otherwise any
    /// unknown pair makes the verdict indeterminate
    fn run_query<S>(
        &self,
        solver: &mut S,
        model: &AccessModel,
        binding: &ThreadBinding,
        kind: QueryKind,
        pairs: &[(&Access, &Access)],
    ) -> Result<ConflictVerdict>
    where
        S: ConstraintSolver + ?Sized,
    {
        let mut undecided: Option<String> = None;
        let mut compared = 0usize;

        for (first, second) in pairs {
            if !self.config.alias_policy.compares(&first.array, &second.array) {
                continue;
            }
            compared += 1;

            let outcome = query_pair(solver, model, binding, first, second)?;
            debug!(
                query = %kind,
                first = %first,
                second = %second,
                result = outcome_label(&outcome),
                "pair checked"
            );
            match outcome {
                SolverResult::Sat(assignment) => {
                    return Ok(ConflictVerdict::Conflict(ConflictWitness {
                        first: AccessSite::from(*first),
                        second: AccessSite::from(*second),
                        assignment: assignment.unwrap_or_default(),
                    }))
                }
                SolverResult::Unknown(reason) => {
                    undecided.get_or_insert(reason);
                }
                SolverResult::Unsat => {}
            }
        }

        debug!(query = %kind, compared, "no satisfiable pair");
        Ok(match undecided {
            Some(reason) => ConflictVerdict::Indeterminate(reason),
            None => ConflictVerdict::NoConflict,
        })
    }
}

/// Declare `spec.variable` for `thread`, bound it, and record it in `binding`
fn declare_loop_var<S>(
    solver: &mut S,
    binding: &mut ThreadBinding,
    spec: &LoopSpec,
    thread: ThreadId,
) -> Result<Term>
where
    S: ConstraintSolver + ?Sized,
{
    let lower = evaluate(&spec.lower, binding, thread)?;
    let upper = evaluate(&spec.upper, binding, thread)?;
    let var = Term::var(solver.declare_int(&thread.qualify(&spec.variable)));

    for condition in definedness(&lower).into_iter().chain(definedness(&upper)) {
        solver.assert(condition);
    }
    solver.assert(Formula::within(var.clone(), lower, upper));
    binding.bind(&spec.variable, thread, var.clone());
    Ok(var)
}

/// One scoped `index_0 = index_1` query
fn query_pair<S>(
    solver: &mut S,
    model: &AccessModel,
    base: &ThreadBinding,
    first: &Access,
    second: &Access,
) -> Result<SolverResult>
where
    S: ConstraintSolver + ?Sized,
{
    let mut scope = SolverScope::enter(solver);
    let mut binding = base.clone();

    let left = bind_side(&mut *scope, model, &mut binding, ThreadId::T0, first)?;
    let right = bind_side(&mut *scope, model, &mut binding, ThreadId::T1, second)?;
    scope.assert(Formula::eq(left, right));
    Ok(scope.check())
}

/// Declare the nested loops enclosing `access` for `thread` and return its index term
fn bind_side<S>(
    solver: &mut S,
    model: &AccessModel,
    binding: &mut ThreadBinding,
    thread: ThreadId,
    access: &Access,
) -> Result<Term>
where
    S: ConstraintSolver + ?Sized,
{
    for spec in model.scope_chain(access.scope).into_iter().skip(1) {
        declare_loop_var(solver, binding, spec, thread)?;
    }
    let index = evaluate(&access.index, binding, thread)?;
    for condition in definedness(&index) {
        solver.assert(condition);
    }
    Ok(index)
}

fn outcome_label(outcome: &SolverResult) -> &'static str {
    match outcome {
        SolverResult::Sat(_) => "sat",
        SolverResult::Unsat => "unsat",
        SolverResult::Unknown(_) => "unknown",
    }
}

//! Symbolic evaluator
//!
//! Maps an [`Expr`] to a solver [`Term`] for one thread. Pure: the binding
//! is only read.

use super::binding::{ThreadBinding, ThreadId};
use crate::errors::{AnalysisError, Result};
use crate::features::access_model::{BinaryOperator, Expr};
use crate::features::smt::{ArithOp, Formula, Term};

impl From<BinaryOperator> for ArithOp {
    fn from(op: BinaryOperator) -> Self {
        match op {
            BinaryOperator::Add => ArithOp::Add,
            BinaryOperator::Sub => ArithOp::Sub,
            BinaryOperator::Mul => ArithOp::Mul,
            BinaryOperator::Div => ArithOp::Div,
            BinaryOperator::Mod => ArithOp::Mod,
        }
    }
}

/// Evaluate `expr` under `binding` as seen by `thread`
pub fn evaluate(expr: &Expr, binding: &ThreadBinding, thread: ThreadId) -> Result<Term> {
    match expr {
        Expr::Literal(value) => Ok(Term::constant(*value)),
        Expr::VariableRef(name) => binding
            .get(name, thread)
            .cloned()
            .ok_or_else(|| AnalysisError::unbound(name.clone(), None)),
        Expr::BinaryOp { op, left, right } => Ok(Term::arith(
            (*op).into(),
            evaluate(left, binding, thread)?,
            evaluate(right, binding, thread)?,
        )),
    }
}

/// `divisor != 0` for every division or modulo in `term`
///
/// Divisors that folded to a non-zero constant need no condition.
pub fn definedness(term: &Term) -> Vec<Formula> {
    term.divisors()
        .into_iter()
        .filter(|divisor| divisor.as_const().map_or(true, |v| v == 0))
        .map(|divisor| Formula::ne(divisor.clone(), Term::constant(0)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::access_model::ConstantEnv;
    use crate::features::smt::VarId;

    fn binding() -> ThreadBinding {
        let mut constants = ConstantEnv::new();
        constants.insert("n", 10);
        let mut binding = ThreadBinding::with_constants(&constants);
        binding.bind("i", ThreadId::T0, Term::var(VarId(0)));
        binding.bind("i", ThreadId::T1, Term::var(VarId(1)));
        binding
    }

    fn i_minus_1() -> Expr {
        Expr::binary(BinaryOperator::Sub, Expr::var("i"), Expr::lit(1))
    }

    #[test]
    fn test_thread_selects_variable() {
        let b = binding();
        assert_eq!(evaluate(&i_minus_1(), &b, ThreadId::T0).unwrap().to_string(), "(- v0 1)");
        assert_eq!(evaluate(&i_minus_1(), &b, ThreadId::T1).unwrap().to_string(), "(- v1 1)");
    }

    #[test]
    fn test_constants_fold_through_arithmetic() {
        let expr = Expr::binary(BinaryOperator::Div, Expr::var("n"), Expr::lit(-3));
        assert_eq!(evaluate(&expr, &binding(), ThreadId::T0).unwrap(), Term::constant(-4));
        let expr = Expr::binary(BinaryOperator::Mod, Expr::lit(-7), Expr::var("n"));
        assert_eq!(evaluate(&expr, &binding(), ThreadId::T1).unwrap(), Term::constant(3));
    }

    #[test]
    fn test_unbound_name_is_an_error() {
        let expr = Expr::binary(BinaryOperator::Add, Expr::var("i"), Expr::var("k"));
        let err = evaluate(&expr, &binding(), ThreadId::T0).unwrap_err();
        assert!(matches!(err, AnalysisError::UnboundVariable { ref name, .. } if name == "k"));
    }

    #[test]
    fn test_definedness_conditions() {
        let b = binding();
        let by_var = Expr::binary(BinaryOperator::Mod, Expr::lit(5), Expr::var("i"));
        let term = evaluate(&by_var, &b, ThreadId::T0).unwrap();
        let conditions = definedness(&term);
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].to_string(), "(distinct v0 0)");

        let by_const = Expr::binary(BinaryOperator::Div, Expr::var("i"), Expr::lit(2));
        assert!(definedness(&evaluate(&by_const, &b, ThreadId::T0).unwrap()).is_empty());

        let by_zero = Expr::binary(BinaryOperator::Div, Expr::var("i"), Expr::lit(0));
        let conditions = definedness(&evaluate(&by_zero, &b, ThreadId::T0).unwrap());
        assert_eq!(conditions[0].eval(&[]), Ok(false));
    }
}

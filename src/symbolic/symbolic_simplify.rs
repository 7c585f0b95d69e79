//! # Simplification and equivalence
//!
//! `simplify` rewrites an expression to the fixpoint of the shared simplification table
//! (see `symbolic_rules`). The result is a normal form for the patterns the rule tables look for:
//! numeric factors on the left, `x^(-n)` instead of `1/x^n`, `Neg` instead of `-1 * x`.
//!
//! Structural matching is order sensitive, so `x + y` and `y + x` simplify to different trees.
//! `equivalent` compares canonical keys instead: sums and products are flattened and their operand
//! keys sorted before comparison. It is a best-effort check, two trees that are equal as functions
//! but need distribution or factoring to look alike are reported as different.

use crate::symbolic::symbolic_context::SolverContext;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_rules::simplification_rules;
use itertools::Itertools;

/// Collects the signed terms of an additive chain. Negative terms get a leading `-`.
fn collect_terms(expr: &Expr, positive: bool, terms: &mut Vec<String>) {
    match expr {
        Expr::Add(lhs, rhs) => {
            collect_terms(lhs, positive, terms);
            collect_terms(rhs, positive, terms);
        }
        Expr::Sub(lhs, rhs) => {
            collect_terms(lhs, positive, terms);
            collect_terms(rhs, !positive, terms);
        }
        Expr::Neg(inner) => collect_terms(inner, !positive, terms),
        _ => {
            let key = expr.canonical_key();
            terms.push(if positive { key } else { format!("-{}", key) });
        }
    }
}

fn collect_factors(expr: &Expr, factors: &mut Vec<String>) {
    match expr {
        Expr::Mul(lhs, rhs) => {
            collect_factors(lhs, factors);
            collect_factors(rhs, factors);
        }
        _ => factors.push(expr.canonical_key()),
    }
}

impl Expr {
    /// Simplifies to a fixpoint of the simplification rules with a fresh context.
    pub fn simplify(&self) -> Expr {
        let mut ctx = SolverContext::new();
        self.simplify_with(&mut ctx)
    }

    pub fn simplify_with(&self, ctx: &mut SolverContext) -> Expr {
        self.rewrite_with(simplification_rules(), ctx)
    }

    /// Order-insensitive key of the tree: additive and multiplicative chains are flattened and
    /// their operands sorted.
    pub fn canonical_key(&self) -> String {
        match self {
            Expr::Add(..) | Expr::Sub(..) | Expr::Neg(..) => {
                let mut terms = Vec::new();
                collect_terms(self, true, &mut terms);
                if terms.len() == 1 {
                    terms.remove(0)
                } else {
                    format!("+[{}]", terms.into_iter().sorted().join(","))
                }
            }
            Expr::Mul(..) => {
                let mut factors = Vec::new();
                collect_factors(self, &mut factors);
                format!("*[{}]", factors.into_iter().sorted().join(","))
            }
            Expr::Var(name) => name.clone(),
            Expr::Const(val) => format!("{}", val),
            Expr::Div(lhs, rhs) => format!("/({},{})", lhs.canonical_key(), rhs.canonical_key()),
            Expr::Pow(base, exp) => format!("^({},{})", base.canonical_key(), exp.canonical_key()),
            Expr::Integral(expr, var) => format!("int_{}({})", var, expr.canonical_key()),
            Expr::Derivative(expr, var) => format!("d_{}({})", var, expr.canonical_key()),
            Expr::Pattern(_) | Expr::ConstPattern(_) | Expr::VarPattern(_) => self.to_string(),
            _ => match self.as_unary() {
                Some((kind, arg)) => format!("{}({})", kind, arg.canonical_key()),
                None => self.to_string(),
            },
        }
    }

    /// Both sides simplified, then compared up to reordering of sums and products.
    pub fn equivalent(&self, other: &Expr) -> bool {
        let lhs = self.simplify();
        let rhs = other.simplify();
        lhs == rhs || lhs.canonical_key() == rhs.canonical_key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_pattern::num;

    fn x() -> Expr {
        Expr::var("x")
    }
    fn y() -> Expr {
        Expr::var("y")
    }

    #[test]
    fn test_simplify_is_idempotent() {
        let samples = vec![
            x() * num(2.0) + num(0.0),
            num(1.0) / x().pow(num(3.0)),
            -(-(x() * y())),
            Expr::sec(x().boxed()) * Expr::sin(x().boxed()),
            (x() + y()) * (num(3.0) * x()) - num(0.0) * y(),
            x().exp().ln() + Expr::tg(x().boxed()).pow(num(2.0)) + num(1.0),
        ];
        for expr in samples {
            let once = expr.simplify();
            assert_eq!(once.simplify(), once, "{}", expr);
        }
    }

    #[test]
    fn test_reciprocal_power_normal_form() {
        let expr = num(1.0) / x().pow(num(3.0));
        assert_eq!(expr.simplify(), x().pow(num(-3.0)));
    }

    #[test]
    fn test_constant_factors_move_left_and_merge() {
        assert_eq!((x() * num(2.0)).simplify(), num(2.0) * x());
        let nested = num(2.0) * (num(3.0) * x());
        assert_eq!(nested.simplify(), num(6.0) * x());
    }

    #[test]
    fn test_sign_normalization() {
        assert_eq!((-(-x())).simplify(), x());
        assert_eq!((x() - (-y())).simplify(), x() + y());
        assert_eq!((-num(3.0)).simplify(), num(-3.0));
    }

    #[test]
    fn test_arithmetic_inside_function_arguments_is_folded() {
        let expr = Expr::sin((num(2.0) * num(3.0)).boxed());
        assert_eq!(expr.simplify(), Expr::sin(num(6.0).boxed()));
        let exponent = x().pow(num(1.0) + num(1.0));
        assert_eq!(exponent.simplify(), x().pow(num(2.0)));
    }

    #[test]
    fn test_cancellation() {
        assert_eq!((x() * (num(1.0) / x())).simplify(), num(1.0));
        assert_eq!((x() - x()).simplify(), num(0.0));
    }

    #[test]
    fn test_trigonometric_forms() {
        let sec = Expr::sec(x().boxed());
        assert_eq!(sec.simplify(), num(1.0) / Expr::cos(x().boxed()));
        let ratio = Expr::sin(x().boxed()) / Expr::cos(x().boxed());
        assert_eq!(ratio.simplify(), Expr::tg(x().boxed()));
        let identity = Expr::tg(x().boxed()).pow(num(2.0)) + num(1.0);
        assert_eq!(identity.simplify(), Expr::cos(x().boxed()).pow(num(-2.0)));
    }

    #[test]
    fn test_equivalence_ignores_operand_order() {
        assert!((x() + y()).equivalent(&(y() + x())));
        assert!((x() - y()).equivalent(&(-y() + x())));
        assert!((x() * y() * num(2.0)).equivalent(&(num(2.0) * y() * x())));
        assert!(!(x() - y()).equivalent(&(y() - x())));
    }

    #[test]
    fn test_canonical_key_flattens_chains() {
        let a = (x() + y()) - Expr::sin(x().boxed());
        let b = -Expr::sin(x().boxed()) + (y() + x());
        assert_eq!(a.canonical_key(), b.canonical_key());
        assert_eq!(a.canonical_key(), "+[-sin(x),x,y]");
    }
}

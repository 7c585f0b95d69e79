//! # Symbolic differentiation
//!
//! The derivative is computed by the same machinery as everything else in the crate: the
//! expression is wrapped in an `Expr::Derivative` placeholder and rewritten with
//! `differentiation_rules(var)`, which push the placeholder down to the leaves (chain rule built
//! into every function rule). After each pass the result is simplified; the loop ends when a pass
//! changes nothing.
//!
//! A `Derivative` node is left in the output only for subtrees no rule covers, e.g. an
//! integral over another variable whose integrand depends on `var`.
//!
//! ## Example
//! ```rust, ignore
//! let x = Expr::var("x");
//! let f = x.clone().pow(Expr::Const(3.0));
//! assert_eq!(f.diff("x"), Expr::Const(3.0) * x.pow(Expr::Const(2.0)));
//! ```

use crate::symbolic::symbolic_context::SolverContext;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_rules::differentiation_rules;
use log::{trace, warn};

impl Expr {
    /// DIFFERENTIATION

    /// Analytical derivative with respect to `var`, simplified.
    pub fn diff(&self, var: &str) -> Expr {
        let mut ctx = SolverContext::new();
        self.diff_with(var, &mut ctx)
    }

    pub fn diff_with(&self, var: &str, ctx: &mut SolverContext) -> Expr {
        let rules = differentiation_rules(var);
        let mut result = Expr::derivative(self.clone(), var);
        let mut iterations = 0;
        loop {
            let next = result.rewrite_with(&rules, ctx).simplify_with(ctx);
            if next == result {
                break;
            }
            result = next;
            iterations += 1;
            if iterations >= ctx.settings.max_rewrite_iterations {
                warn!("d/d{} stopped after {} passes at {}", var, iterations, result);
                break;
            }
        }
        trace!("d/d{} {} = {}", var, self, result);
        result
    }

    /// Derivative of order `n`; `n = 0` returns the expression unchanged.
    pub fn n_th_derivative1D(&self, var: &str, n: usize) -> Expr {
        let mut ctx = SolverContext::new();
        (0..n).fold(self.clone(), |acc, _| acc.diff_with(var, &mut ctx))
    }
}

#[cfg(test)]
mod tests {
    use crate::symbolic::symbolic_context::{SolverContext, SolverSettings};
    use crate::symbolic::symbolic_engine::Expr;
    use crate::symbolic::symbolic_pattern::num;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::var("x")
    }

    /// central difference of `f` at `x0`
    fn numeric_derivative(f: &Expr, x0: f64) -> f64 {
        let h = 1e-6;
        let fp = f.eval_expression(&["x"], &[x0 + h]).unwrap();
        let fm = f.eval_expression(&["x"], &[x0 - h]).unwrap();
        (fp - fm) / (2.0 * h)
    }

    fn assert_matches_numeric(f: &Expr, points: &[f64]) {
        let df = f.diff("x");
        assert!(!format!("{}", df).contains("d/d"), "unresolved derivative in {}", df);
        for &x0 in points {
            let analytic = df.eval_expression(&["x"], &[x0]).unwrap();
            assert_relative_eq!(
                analytic,
                numeric_derivative(f, x0),
                epsilon = 1e-5,
                max_relative = 1e-5
            );
        }
    }

    #[test]
    fn test_power_rule() {
        assert_eq!(x().pow(num(3.0)).diff("x"), num(3.0) * x().pow(num(2.0)));
        let quartic = x().pow(num(4.0)) / num(4.0);
        assert_eq!(quartic.diff("x"), x().pow(num(3.0)));
    }

    #[test]
    fn test_constants_and_other_variables() {
        assert_eq!(num(5.0).diff("x"), num(0.0));
        assert_eq!(Expr::var("y").diff("x"), num(0.0));
        assert_eq!(x().diff("x"), num(1.0));
        assert_eq!((Expr::var("y") * x()).diff("x"), Expr::var("y"));
    }

    #[test]
    fn test_chain_rule_against_finite_differences() {
        let samples = vec![
            Expr::sin((num(2.0) * x()).boxed()),
            x().pow(num(2.0)).exp(),
            (x().pow(num(2.0)) + num(1.0)).ln(),
            Expr::arctg((x() / num(3.0)).boxed()),
            Expr::cosh(x().pow(num(3.0)).boxed()),
            Expr::tg(x().boxed()),
        ];
        for f in samples {
            assert_matches_numeric(&f, &[0.3, 0.7, 1.1]);
        }
    }

    #[test]
    fn test_product_and_quotient_rules() {
        let product = x() * x().exp();
        assert_matches_numeric(&product, &[-1.0, 0.5, 2.0]);
        let quotient = Expr::sin(x().boxed()) / (x() + num(2.0));
        assert_matches_numeric(&quotient, &[0.1, 1.5]);
        let general = x().pow(x());
        assert_matches_numeric(&general, &[0.5, 1.5]);
    }

    #[test]
    fn test_derivative_of_integral_placeholder() {
        let pending = Expr::integral(x().pow(num(2.0)).exp(), "x");
        assert_eq!(pending.diff("x"), x().pow(num(2.0)).exp());
    }

    #[test]
    fn test_higher_order() {
        let cubic = x().pow(num(3.0));
        assert_eq!(cubic.n_th_derivative1D("x", 0), cubic);
        let third = cubic.n_th_derivative1D("x", 3);
        assert_eq!(third, num(6.0));
    }

    #[test]
    fn test_pass_ceiling_stops_differentiation() {
        let settings = SolverSettings::new().set_max_rewrite_iterations(1);
        let mut ctx = SolverContext::with_settings(settings);
        assert_eq!(x().diff_with("x", &mut ctx), num(1.0));
        // one chain-rule step per pass leaves d/dx[x^2] pending
        let f = Expr::sin(x().pow(num(2.0)).boxed());
        let partial = f.diff_with("x", &mut ctx);
        assert!(format!("{}", partial).contains("d/d"), "{}", partial);
        let mut ctx = SolverContext::new();
        assert_matches_numeric(&f, &[0.4, 1.2]);
        assert!(!format!("{}", f.diff_with("x", &mut ctx)).contains("d/d"));
    }
}

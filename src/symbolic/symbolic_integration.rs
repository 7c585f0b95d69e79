//! # Symbolic integration
//!
//! `integrate` tries a fixed sequence of strategies, the first one that produces a complete
//! antiderivative wins:
//!
//! 1. the integrand is simplified (`1/x^3` becomes `x^(-3)` so the rules can see it)
//! 2. direct rules: the integrand is wrapped in `Expr::Integral` and rewritten with
//!    `integration_rules(var)`. Integrals left behind by linearity are integrated recursively
//! 3. u-substitution: `f(u)·u'` up to a constant factor, `u'/u`, and `f(a·x + b)`
//! 4. integration by parts, choosing `u` before `dv` the LIATE way
//! 5. otherwise the simplified integrand is returned wrapped in `Expr::Integral`
//!
//! Failure is a value, not an error: the caller inspects the result with
//! `Expr::contains_integral`. Integration by parts re-enters `integrate_with` for the residual
//! integral, and nothing guarantees the residual is simpler, so every entry increments the context
//! depth and returns the unsolved placeholder once `SolverSettings::max_depth` is exceeded.
//!
//! ## Example
//! ```rust, ignore
//! let x = Expr::var("x");
//! let f = x.clone() * x.clone().exp();
//! // x*exp(x) - exp(x)
//! let antiderivative = f.integrate("x");
//! ```

use crate::symbolic::symbolic_context::SolverContext;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_error::SymbolicError;
use crate::symbolic::symbolic_rules::integration_rules;
use log::{debug, info};

/// Closed-form antiderivative of an outer function with respect to its own argument.
/// Returns the inner expression `u` and `F(u)`.
fn outer_antiderivative(f_u: &Expr) -> Option<(Expr, Expr)> {
    let (u, antiderivative) = match f_u {
        Expr::Pow(base, exp) => {
            let n = exp.as_const()?;
            let base = base.as_ref().clone();
            if n == -1.0 {
                (base.clone(), base.ln())
            } else {
                (
                    base.clone(),
                    base.pow(Expr::Const(n + 1.0)) / Expr::Const(n + 1.0),
                )
            }
        }
        Expr::sin(u) => (u.as_ref().clone(), -Expr::cos(u.clone())),
        Expr::cos(u) => (u.as_ref().clone(), Expr::sin(u.clone())),
        Expr::Exp(u) => (u.as_ref().clone(), Expr::Exp(u.clone())),
        Expr::sinh(u) => (u.as_ref().clone(), Expr::cosh(u.clone())),
        Expr::cosh(u) => (u.as_ref().clone(), Expr::sinh(u.clone())),
        _ => return None,
    };
    Some((u, antiderivative))
}

/// `(c, f)` with `expr = c·f`, peeling numeric factors and negations.
fn split_scaled(expr: &Expr) -> (f64, Expr) {
    match expr {
        Expr::Mul(lhs, rhs) => match (lhs.as_const(), rhs.as_const()) {
            (Some(k), None) => {
                let (inner, f) = split_scaled(rhs);
                (k * inner, f)
            }
            (None, Some(k)) => {
                let (inner, f) = split_scaled(lhs);
                (k * inner, f)
            }
            _ => (1.0, expr.clone()),
        },
        Expr::Neg(inner) => {
            let (k, f) = split_scaled(inner);
            (-k, f)
        }
        _ => (1.0, expr.clone()),
    }
}

/// Constant `k` with `num = k·den`, if one can be recognized.
///
/// First the quotient is simplified and accepted if it folds to a finite nonzero constant. The
/// fallback strips numeric factors and signs from both sides and compares the rest up to operand
/// order. Neither step is complete: a ratio that only becomes constant after expansion is missed.
fn constant_ratio(num: &Expr, den: &Expr, ctx: &mut SolverContext) -> Option<f64> {
    let accept = |k: f64| k.is_finite() && k != 0.0;
    let quotient = (num.clone() / den.clone()).simplify_with(ctx);
    if let Some(k) = quotient.as_const() {
        return if accept(k) { Some(k) } else { None };
    }
    let (k_num, f_num) = split_scaled(num);
    let (k_den, f_den) = split_scaled(den);
    if k_den != 0.0 && f_num.equivalent(&f_den) {
        let k = k_num / k_den;
        if accept(k) {
            return Some(k);
        }
    }
    None
}

/// `x`, `x^n` for a positive integer `n`, or a constant multiple of those.
fn is_power_of_var(expr: &Expr, var: &str) -> bool {
    match expr {
        Expr::Var(name) => name == var,
        Expr::Pow(base, exp) => {
            matches!(base.as_ref(), Expr::Var(name) if name == var)
                && exp.as_const().is_some_and(|n| n > 0.0 && n.fract() == 0.0)
        }
        Expr::Mul(lhs, rhs) => match (lhs.as_const(), rhs.as_const()) {
            (Some(_), None) => is_power_of_var(rhs, var),
            (None, Some(_)) => is_power_of_var(lhs, var),
            _ => false,
        },
        _ => false,
    }
}

fn is_transcendental_dv(expr: &Expr) -> bool {
    matches!(expr, Expr::Exp(_) | Expr::sin(_) | Expr::cos(_))
}

impl Expr {
    /// SYMBOLIC INTEGRATION

    /// Indefinite integral with respect to `var` (no integration constant), using a fresh context.
    ///
    /// Returns an antiderivative without `Integral` nodes, or `Integral(simplified integrand, var)`
    /// when no strategy succeeds.
    pub fn integrate(&self, var: &str) -> Expr {
        let mut ctx = SolverContext::new();
        info!("integrating {} d{}", self, var);
        let result = self.integrate_with(var, &mut ctx);
        info!("∫{} d{} = {} ({} steps)", self, var, result, ctx.steps());
        result
    }

    /// Same as `integrate`, sharing the caller's context. Depth is restored on return.
    pub fn integrate_with(&self, var: &str, ctx: &mut SolverContext) -> Expr {
        ctx.push_depth();
        let result = if ctx.depth_exceeded() {
            ctx.log_step(|| format!("depth ceiling, giving up on ∫{} d{}", self, var));
            Expr::integral(self.clone(), var)
        } else {
            self.integrate_strategies(var, ctx)
        };
        ctx.pop_depth();
        result
    }

    fn integrate_strategies(&self, var: &str, ctx: &mut SolverContext) -> Expr {
        let integrand = self.simplify_with(ctx);
        if let Some(result) = integrand.integrate_by_rules(var, ctx) {
            ctx.log_step(|| format!("direct rules: ∫{} d{} = {}", integrand, var, result));
            return result;
        }
        if let Some(result) = integrand.try_u_substitution(var, ctx) {
            let result = result.simplify_with(ctx);
            ctx.log_step(|| format!("u-substitution: ∫{} d{} = {}", integrand, var, result));
            return result;
        }
        if let Some(result) = integrand.try_integration_by_parts(var, ctx) {
            let result = result.simplify_with(ctx);
            ctx.log_step(|| format!("by parts: ∫{} d{} = {}", integrand, var, result));
            return result;
        }
        ctx.log_step(|| format!("no strategy for ∫{} d{}", integrand, var));
        Expr::integral(integrand, var)
    }

    /// Rewrites `Integral(self, var)` with the integration rules, then integrates what linearity
    /// left behind. `None` unless the outcome is free of `Integral` nodes.
    fn integrate_by_rules(&self, var: &str, ctx: &mut SolverContext) -> Option<Expr> {
        let wrapped = Expr::integral(self.clone(), var);
        let rewritten = wrapped.rewrite_with(&integration_rules(var), ctx);
        if rewritten == wrapped {
            return None;
        }
        let resolved = if rewritten.contains_integral() {
            debug!("resolving sub-integrals of {}", rewritten);
            rewritten.resolve_integrals(ctx)
        } else {
            rewritten
        };
        if resolved.contains_integral() {
            None
        } else {
            Some(resolved.simplify_with(ctx))
        }
    }

    /// Integrates every `Integral` node of the tree. A node whose integration makes no progress
    /// is kept as it is.
    fn resolve_integrals(&self, ctx: &mut SolverContext) -> Expr {
        match self {
            Expr::Integral(inner, var) => {
                let solved = inner.integrate_with(var, ctx);
                match &solved {
                    Expr::Integral(returned, _) if returned == inner => self.clone(),
                    _ => solved,
                }
            }
            _ => self.map_children(|child| child.resolve_integrals(ctx)),
        }
    }

    //___________________________________U-SUBSTITUTION____________________________________

    fn try_u_substitution(&self, var: &str, ctx: &mut SolverContext) -> Option<Expr> {
        let pairs: Vec<(Expr, Expr)> = match self {
            Expr::Mul(lhs, rhs) => vec![
                (lhs.as_ref().clone(), rhs.as_ref().clone()),
                (rhs.as_ref().clone(), lhs.as_ref().clone()),
            ],
            // num/den^n is num·den^(-n); n = 1 is the logarithmic case u'/u
            Expr::Div(num, den) => {
                let reciprocal = match den.as_ref() {
                    Expr::Pow(base, exp) => match exp.as_const() {
                        Some(n) => base.as_ref().clone().pow(Expr::Const(-n)),
                        None => den.as_ref().clone().pow(Expr::Const(-1.0)),
                    },
                    _ => den.as_ref().clone().pow(Expr::Const(-1.0)),
                };
                vec![(reciprocal, num.as_ref().clone())]
            }
            _ => Vec::new(),
        };
        for (f_u, rest) in &pairs {
            if let Some(result) = Self::substitute_chain(f_u, rest, var, ctx) {
                return Some(result);
            }
        }
        // u·u' integrates to u^2/2
        for (f_u, rest) in &pairs {
            if f_u.is_independent_of(var) || matches!(f_u, Expr::Var(_)) {
                continue;
            }
            let du = f_u.diff_with(var, ctx);
            if let Some(k) = constant_ratio(rest, &du, ctx) {
                ctx.log_step(|| format!("u = {}, integrand is {}·u·u'", f_u, k));
                return Some(
                    Expr::Const(k) * (f_u.clone().pow(Expr::Const(2.0)) / Expr::Const(2.0)),
                );
            }
        }
        self.linear_substitution(var, ctx)
    }

    /// `f(u)·rest` with `rest = k·u'`.
    fn substitute_chain(
        f_u: &Expr,
        rest: &Expr,
        var: &str,
        ctx: &mut SolverContext,
    ) -> Option<Expr> {
        let (u, antiderivative) = outer_antiderivative(f_u)?;
        if u.is_independent_of(var) {
            return None;
        }
        let du = u.diff_with(var, ctx);
        let k = constant_ratio(rest, &du, ctx)?;
        ctx.log_step(|| format!("u = {}, du = {}, factor {}", u, du, k));
        Some(Expr::Const(k) * antiderivative)
    }

    /// `f(u)` with `u' ` a nonzero constant.
    fn linear_substitution(&self, var: &str, ctx: &mut SolverContext) -> Option<Expr> {
        let (u, antiderivative) = outer_antiderivative(self)?;
        if u.is_independent_of(var) || matches!(&u, Expr::Var(name) if name == var) {
            return None;
        }
        let slope = u.diff_with(var, ctx).as_const()?;
        if slope == 0.0 || !slope.is_finite() {
            return None;
        }
        ctx.log_step(|| format!("linear substitution u = {}, du = {}", u, slope));
        Some(Expr::Const(1.0 / slope) * antiderivative)
    }

    //___________________________________INTEGRATION BY PARTS____________________________________

    /// `∫u dv = u·v - ∫v du` for a product, a bare logarithm counts as `ln(..)·1`.
    fn try_integration_by_parts(&self, var: &str, ctx: &mut SolverContext) -> Option<Expr> {
        let (a, b) = match self {
            Expr::Mul(lhs, rhs) => (lhs.as_ref().clone(), rhs.as_ref().clone()),
            Expr::Ln(_) => (self.clone(), Expr::Const(1.0)),
            _ => return None,
        };
        for (u, dv) in [(a.clone(), b.clone()), (b, a)] {
            let log_case = matches!(u, Expr::Ln(_))
                && (is_transcendental_dv(&dv)
                    || is_power_of_var(&dv, var)
                    || dv.is_independent_of(var));
            let power_case = is_power_of_var(&u, var) && is_transcendental_dv(&dv);
            if !(log_case || power_case) {
                continue;
            }
            let du = u.diff_with(var, ctx);
            let reducing = matches!(du, Expr::Const(_)) || log_case || is_power_of_var(&u, var);
            if !reducing {
                continue;
            }
            ctx.log_step(|| format!("by parts with u = {}, dv = {}", u, dv));
            let v = dv.integrate_with(var, ctx);
            if v.contains_integral() {
                continue;
            }
            let v_du = (v.clone() * du).simplify_with(ctx);
            let residual = v_du.integrate_with(var, ctx);
            if residual.contains_integral() {
                debug!("residual ∫{} d{} unsolved", v_du, var);
                continue;
            }
            return Some(u * v - residual);
        }
        None
    }

    /// `F(upper) - F(lower)` for the symbolic antiderivative `F`.
    pub fn definite_integrate(
        &self,
        var: &str,
        lower: f64,
        upper: f64,
    ) -> Result<f64, SymbolicError> {
        let antiderivative = self.integrate(var);
        if antiderivative.contains_integral() {
            return Err(SymbolicError::UnsupportedNode(antiderivative.to_string()));
        }
        let upper_val = antiderivative.eval_expression(&[var], &[upper])?;
        let lower_val = antiderivative.eval_expression(&[var], &[lower])?;
        Ok(upper_val - lower_val)
    }
}

////////////////////////////////////////////////////////////////////////////////////////////////////
// tests
////////////////////////////////////////////////////////////////////////////////////////////////////
#[cfg(test)]
mod integration_tests {

    use crate::symbolic::symbolic_context::{SolverContext, SolverSettings};
    use crate::symbolic::symbolic_engine::Expr;
    use crate::symbolic::symbolic_pattern::num;
    use approx::assert_relative_eq;

    fn x() -> Expr {
        Expr::var("x")
    }

    /// F is an antiderivative of f when F' matches f at the sample points
    fn assert_antiderivative(f: &Expr, points: &[f64]) {
        let antiderivative = f.integrate("x");
        assert!(
            !antiderivative.contains_integral(),
            "∫{} dx unsolved: {}",
            f,
            antiderivative
        );
        let h = 1e-6;
        for &x0 in points {
            let fp = antiderivative.eval_expression(&["x"], &[x0 + h]).unwrap();
            let fm = antiderivative.eval_expression(&["x"], &[x0 - h]).unwrap();
            let expected = f.eval_expression(&["x"], &[x0]).unwrap();
            assert_relative_eq!(
                (fp - fm) / (2.0 * h),
                expected,
                epsilon = 1e-5,
                max_relative = 1e-5
            );
        }
    }

    #[test]
    fn test_integrate_power() {
        let result = x().pow(num(3.0)).integrate("x");
        assert_eq!(result, x().pow(num(4.0)) / num(4.0));
        // and back
        assert_eq!(result.diff("x"), x().pow(num(3.0)));
    }

    #[test]
    fn test_integrate_reciprocal_power_after_simplification() {
        // 1/x^3 is seen as x^(-3)
        let result = (num(1.0) / x().pow(num(3.0))).integrate("x");
        assert_eq!(result, x().pow(num(-2.0)) / num(-2.0));
        assert_eq!((num(1.0) / x()).integrate("x"), x().ln());
    }

    #[test]
    fn test_integrate_constants_and_linearity() {
        assert_eq!(num(5.0).integrate("x"), num(5.0) * x());
        assert_eq!(Expr::var("y").integrate("x"), Expr::var("y") * x());
        assert_antiderivative(&(x().pow(num(2.0)) - x() + num(3.0)), &[0.5, 1.0, 2.0]);
        assert_antiderivative(&(num(3.0) * x().exp() - Expr::sin(x().boxed())), &[0.2, 1.3]);
        assert_antiderivative(&(x() / num(2.0)), &[1.0, 4.0]);
    }

    #[test]
    fn test_integrate_elementary_seeds() {
        assert_eq!(x().exp().integrate("x"), x().exp());
        assert_eq!(Expr::cos(x().boxed()).integrate("x"), Expr::sin(x().boxed()));
        assert_eq!(Expr::sin(x().boxed()).integrate("x"), -Expr::cos(x().boxed()));
        assert_eq!(Expr::cosh(x().boxed()).integrate("x"), Expr::sinh(x().boxed()));
        assert_antiderivative(&(num(3.0) * x()).exp(), &[0.1, 0.4]);
        assert_antiderivative(&num(2.0).pow(x()), &[0.0, 1.5]);
        assert_antiderivative(&Expr::sec(x().boxed()).pow(num(2.0)), &[0.2, 0.9]);
    }

    #[test]
    fn test_inverse_trigonometric_forms() {
        let arctg_form = num(1.0) / (num(4.0) + x().pow(num(2.0)));
        assert_eq!(
            arctg_form.integrate("x"),
            num(0.5) * Expr::arctg((x() / num(2.0)).boxed())
        );
        let arcsin_form = (num(9.0) - x().pow(num(2.0))).pow(num(-0.5));
        assert_antiderivative(&arcsin_form, &[-1.0, 0.0, 2.0]);
    }

    #[test]
    fn test_u_substitution_with_constant_factor() {
        let expr = x() * x().pow(num(2.0)).exp();
        assert_eq!(expr.integrate("x"), num(0.5) * x().pow(num(2.0)).exp());
        let sin_chain = x().pow(num(2.0)) * Expr::cos(x().pow(num(3.0)).boxed());
        assert_antiderivative(&sin_chain, &[0.3, 1.1]);
    }

    #[test]
    fn test_u_substitution_logarithmic() {
        let expr = (num(2.0) * x()) / (x().pow(num(2.0)) + num(1.0));
        assert_eq!(expr.integrate("x"), (x().pow(num(2.0)) + num(1.0)).ln());
        let scaled = x() / (x().pow(num(2.0)) + num(1.0));
        assert_antiderivative(&scaled, &[-2.0, 0.5, 3.0]);
        let squared = x() / (x().pow(num(2.0)) + num(1.0)).pow(num(2.0));
        assert_antiderivative(&squared, &[-1.0, 0.5]);
    }

    #[test]
    fn test_u_substitution_identity_power() {
        let expr = Expr::sin(x().boxed()) * Expr::cos(x().boxed());
        assert_eq!(
            expr.integrate("x"),
            Expr::sin(x().boxed()).pow(num(2.0)) / num(2.0)
        );
    }

    #[test]
    fn test_linear_substitution() {
        let expr = Expr::cos((num(2.0) * x()).boxed());
        assert_eq!(
            expr.integrate("x"),
            num(0.5) * Expr::sin((num(2.0) * x()).boxed())
        );
        assert_antiderivative(&(num(2.0) * x() + num(1.0)).pow(num(3.0)), &[0.0, 1.0]);
        assert_antiderivative(&(-x()).exp(), &[0.0, 1.0]);
    }

    #[test]
    fn test_integration_by_parts() {
        let expr = x() * x().exp();
        assert_eq!(expr.integrate("x"), x() * x().exp() - x().exp());
        let sine = x() * Expr::sin(x().boxed());
        assert_eq!(
            sine.integrate("x"),
            Expr::sin(x().boxed()) - x() * Expr::cos(x().boxed())
        );
        assert_antiderivative(&(x().pow(num(3.0)) * x().exp()), &[0.0, 0.5, 1.0]);
        assert_antiderivative(&(x() * (-x()).exp()), &[0.0, 1.0]);
    }

    #[test]
    fn test_integration_by_parts_logarithm() {
        assert_eq!(x().ln().integrate("x"), x().ln() * x() - x());
        assert_antiderivative(&(x().pow(num(2.0)) * x().ln()), &[0.5, 2.0]);
    }

    #[test]
    fn test_unsolved_placeholder_is_stable() {
        let expr = x().pow(num(2.0)).exp();
        let result = expr.integrate("x");
        assert_eq!(result, Expr::integral(expr.clone(), "x"));
        if let Expr::Integral(inner, var) = &result {
            assert_eq!(inner.integrate(var), result);
        }
    }

    #[test]
    fn test_unsolvable_term_keeps_whole_integral() {
        // x integrates fine, exp(x^2) does not, so the sum is returned unsplit
        let expr = x() + x().pow(num(2.0)).exp();
        let mut ctx = SolverContext::new();
        let result = expr.integrate_with("x", &mut ctx);
        assert_eq!(result, Expr::integral(expr.clone(), "x"));
        assert_eq!(ctx.depth(), 0);
        let again = expr.integrate_with("x", &mut ctx);
        assert_eq!(again, result);
        assert_eq!(ctx.depth(), 0);
    }

    #[test]
    fn test_depth_ceiling_terminates() {
        let expr = x().pow(num(40.0)) * x().exp();
        let result = expr.integrate("x");
        assert!(result.contains_integral());
        assert_eq!(result, Expr::integral(expr, "x"));
    }

    #[test]
    fn test_depth_is_restored_and_steps_recorded() {
        let mut ctx = SolverContext::new();
        let result = (x() * Expr::sin(x().boxed())).integrate_with("x", &mut ctx);
        assert!(!result.contains_integral());
        assert_eq!(ctx.depth(), 0);
        assert!(ctx.steps() > 0);
        assert!(ctx.trace().iter().any(|step| step.message.starts_with("by parts")));
    }

    #[test]
    fn test_lower_ceiling_gives_up_earlier() {
        let settings = SolverSettings::new().set_max_depth(1);
        let mut ctx = SolverContext::with_settings(settings);
        let expr = x() * x().exp();
        // by parts needs nested calls for v and the residual
        assert_eq!(
            expr.integrate_with("x", &mut ctx),
            Expr::integral(expr.clone(), "x")
        );
        let mut ctx = SolverContext::with_settings(SolverSettings::new().set_max_depth(1));
        assert_eq!(x().pow(num(2.0)).integrate_with("x", &mut ctx), x().pow(num(3.0)) / num(3.0));
    }

    #[test]
    fn test_definite_integration() {
        let value = x().definite_integrate("x", 0.0, 2.0).unwrap();
        assert_relative_eq!(value, 2.0, epsilon = 1e-12);
        let value = (x() * x().exp()).definite_integrate("x", 0.0, 1.0).unwrap();
        assert_relative_eq!(value, 1.0, epsilon = 1e-10);
        let value = Expr::sin(x().boxed())
            .definite_integrate("x", 0.0, std::f64::consts::PI)
            .unwrap();
        assert_relative_eq!(value, 2.0, epsilon = 1e-10);
        assert!(x().pow(num(2.0)).exp().definite_integrate("x", 0.0, 1.0).is_err());
    }

    #[test]
    fn test_other_variable_is_constant() {
        let expr = Expr::var("y") * x().pow(num(2.0));
        let result = expr.integrate("x");
        let value = result.eval_expression(&["x", "y"], &[3.0, 2.0]).unwrap();
        assert_relative_eq!(value, 18.0, epsilon = 1e-12);
    }
}

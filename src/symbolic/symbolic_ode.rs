//! # First-order ODE classifier and solver
//!
//! An equation `ode = 0` in the unknown function `y(x)` is written with `dy/dx` as
//! `Expr::Derivative(Var(y), x)`. `OdeSolver::normalize` isolates the derivative,
//! `M + N·y' = 0` gives `y' = f(x, y) = -M/N`, and `classify` picks one of the classes below by
//! looking at the shape of `f`. Each class except `General` has a solving strategy built on
//! `Expr::integrate_with`:
//!
//! | class | strategy | solution |
//! |---|---|---|
//! | `SeparableX` | `y = ∫f dx + C` | explicit |
//! | `SeparableY`, `SeparableProduct` | `∫dy/h(y) = ∫g(x) dx + C` | explicit `y = A·exp(∫g)` when the left side is `ln(y)`, implicit otherwise |
//! | `Linear` | integrating factor `μ = exp(-∫p)` for `y' = p·y + q` | explicit |
//! | `Homogeneous` | `y = v·x` reduces to a separable equation in `v` | implicit |
//!
//! `C` and `A` are plain symbols. When an integral the strategy depends on cannot be computed the
//! result is `OdeSolution::Unsolved` with the class, never a partial formula.
//!
//! ## Example
//! ```rust, ignore
//! let solver = OdeSolver::new("x", "y");
//! let (x, y) = (Expr::var("x"), Expr::var("y"));
//! // y' - x*y = 0
//! let ode = solver.derivative_marker() - x * y;
//! let solution = solver.solve(&ode)?; // y = A*exp(x^2/2)
//! ```

use crate::symbolic::symbolic_context::SolverContext;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_error::SymbolicError;
use log::info;
use std::fmt;
use strum_macros::{Display, EnumIter};

/// Shape of `f(x, y)` in `y' = f(x, y)`, checked in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum OdeClass {
    /// f depends on x only
    #[strum(to_string = "Separable-f(x)")]
    SeparableX,
    /// f depends on y only
    #[strum(to_string = "Separable-f(y)")]
    SeparableY,
    /// f = g(x)·h(y) or a quotient of such factors
    #[strum(to_string = "Separable-g(x)h(y)")]
    SeparableProduct,
    #[strum(to_string = "Homogeneous")]
    Homogeneous,
    /// f = p(x)·y + q(x)
    #[strum(to_string = "Linear")]
    Linear,
    #[strum(to_string = "General")]
    General,
}

#[derive(Debug, Clone, PartialEq)]
pub enum OdeSolution {
    /// y = expr
    Explicit(Expr),
    /// lhs = rhs
    Implicit { lhs: Expr, rhs: Expr },
    /// no strategy for the class, or an integral it needs stayed unsolved
    Unsolved(OdeClass),
}

impl fmt::Display for OdeSolution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            OdeSolution::Explicit(expr) => write!(f, "y = {}", expr),
            OdeSolution::Implicit { lhs, rhs } => write!(f, "{} = {}", lhs, rhs),
            OdeSolution::Unsolved(class) => write!(f, "unsolved ({})", class),
        }
    }
}

/// Signed additive terms, a subtracted term comes back wrapped in `Neg`.
fn additive_terms(expr: &Expr, positive: bool, terms: &mut Vec<Expr>) {
    match expr {
        Expr::Add(lhs, rhs) => {
            additive_terms(lhs, positive, terms);
            additive_terms(rhs, positive, terms);
        }
        Expr::Sub(lhs, rhs) => {
            additive_terms(lhs, positive, terms);
            additive_terms(rhs, !positive, terms);
        }
        Expr::Neg(inner) => additive_terms(inner, !positive, terms),
        _ => terms.push(if positive { expr.clone() } else { -expr.clone() }),
    }
}

fn terms_of(expr: &Expr) -> Vec<Expr> {
    let mut terms = Vec::new();
    additive_terms(expr, true, &mut terms);
    terms
}

fn sum(terms: Vec<Expr>) -> Expr {
    terms
        .into_iter()
        .reduce(|acc, term| acc + term)
        .unwrap_or(Expr::Const(0.0))
}

fn contains_subtree(expr: &Expr, target: &Expr) -> bool {
    expr == target || expr.children().into_iter().any(|c| contains_subtree(c, target))
}

/// `n` with `term = n·marker`, where the marker occurs once as a factor.
fn factor_of(term: &Expr, marker: &Expr) -> Option<Expr> {
    if term == marker {
        return Some(Expr::Const(1.0));
    }
    match term {
        Expr::Mul(lhs, rhs) => {
            if !contains_subtree(rhs, marker) {
                factor_of(lhs, marker).map(|n| n * rhs.as_ref().clone())
            } else if !contains_subtree(lhs, marker) {
                factor_of(rhs, marker).map(|n| lhs.as_ref().clone() * n)
            } else {
                None
            }
        }
        Expr::Div(lhs, rhs) if !contains_subtree(rhs, marker) => {
            factor_of(lhs, marker).map(|n| n / rhs.as_ref().clone())
        }
        Expr::Neg(inner) => factor_of(inner, marker).map(|n| -n),
        _ => None,
    }
}

/// coefficient `p` of a term `p(x)·y`
fn linear_coefficient(term: &Expr, y: &str) -> Option<Expr> {
    match term {
        Expr::Var(name) if name == y => Some(Expr::Const(1.0)),
        Expr::Neg(inner) => linear_coefficient(inner, y).map(|p| -p),
        Expr::Mul(lhs, rhs) => {
            if rhs.is_independent_of(y) {
                linear_coefficient(lhs, y).map(|p| p * rhs.as_ref().clone())
            } else if lhs.is_independent_of(y) {
                linear_coefficient(rhs, y).map(|p| lhs.as_ref().clone() * p)
            } else {
                None
            }
        }
        Expr::Div(lhs, rhs) if rhs.is_independent_of(y) => {
            linear_coefficient(lhs, y).map(|p| p / rhs.as_ref().clone())
        }
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OdeSolver {
    /// independent variable
    pub x: String,
    /// unknown function
    pub y: String,
}

impl OdeSolver {
    pub fn new(x: &str, y: &str) -> Self {
        OdeSolver {
            x: x.to_string(),
            y: y.to_string(),
        }
    }

    /// `dy/dx` as it must appear in the equation
    pub fn derivative_marker(&self) -> Expr {
        Expr::derivative(Expr::var(&self.y), &self.x)
    }

    /// Splits `ode = 0` into `M + N·y' = 0` and returns `(M, N, f)` with `f = -M/N`, all simplified.
    ///
    /// # Errors
    /// `NormalizationFailed` when `y'` is missing, is not a plain factor of its terms (`sin(y')`,
    /// `y'^2`) or has a zero coefficient.
    pub fn normalize(&self, ode: &Expr) -> Result<(Expr, Expr, Expr), SymbolicError> {
        let mut ctx = SolverContext::new();
        self.normalize_with(ode, &mut ctx)
    }

    pub fn normalize_with(
        &self,
        ode: &Expr,
        ctx: &mut SolverContext,
    ) -> Result<(Expr, Expr, Expr), SymbolicError> {
        let marker = self.derivative_marker();
        let mut m_terms = Vec::new();
        let mut n_terms = Vec::new();
        for term in terms_of(ode) {
            if contains_subtree(&term, &marker) {
                let n = factor_of(&term, &marker)
                    .ok_or_else(|| SymbolicError::NormalizationFailed(ode.to_string()))?;
                n_terms.push(n);
            } else {
                m_terms.push(term);
            }
        }
        if n_terms.is_empty() {
            return Err(SymbolicError::NormalizationFailed(ode.to_string()));
        }
        let n = sum(n_terms).simplify_with(ctx);
        if n.is_zero() {
            return Err(SymbolicError::NormalizationFailed(ode.to_string()));
        }
        let m = sum(m_terms).simplify_with(ctx);
        let f = (-m.clone() / n.clone()).simplify_with(ctx);
        ctx.log_step(|| format!("M = {}, N = {}, {}' = {}", m, n, self.y, f));
        Ok((m, n, f))
    }

    /// Class of `y' = f`.
    pub fn classify(&self, f: &Expr) -> OdeClass {
        if f.is_independent_of(&self.y) {
            OdeClass::SeparableX
        } else if f.is_independent_of(&self.x) {
            OdeClass::SeparableY
        } else if self.split_separable(f).is_some() {
            OdeClass::SeparableProduct
        } else if self.is_homogeneous(f) {
            OdeClass::Homogeneous
        } else if self.is_linear(f) {
            OdeClass::Linear
        } else {
            OdeClass::General
        }
    }

    /// `(g(x), 1/h(y))` for `f = g·h`
    fn split_separable(&self, f: &Expr) -> Option<(Expr, Expr)> {
        let only_x = |e: &Expr| e.is_independent_of(&self.y);
        let only_y = |e: &Expr| e.is_independent_of(&self.x);
        let one = || Expr::Const(1.0);
        match f {
            Expr::Mul(lhs, rhs) => {
                let (l, r) = (lhs.as_ref().clone(), rhs.as_ref().clone());
                if only_x(&l) && only_y(&r) {
                    Some((l, one() / r))
                } else if only_y(&l) && only_x(&r) {
                    Some((r, one() / l))
                } else {
                    None
                }
            }
            Expr::Div(lhs, rhs) => {
                let (l, r) = (lhs.as_ref().clone(), rhs.as_ref().clone());
                if only_x(&l) && only_y(&r) {
                    Some((l, r))
                } else if only_y(&l) && only_x(&r) {
                    Some((one() / r, one() / l))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// structural test for `f = F(y/x)`: a ratio of `x` and `y`, or a sum over a product or power
    fn is_homogeneous(&self, f: &Expr) -> bool {
        let (x, y) = (Expr::var(&self.x), Expr::var(&self.y));
        match f {
            Expr::Div(num, den) => {
                (num.as_ref() == &y && den.as_ref() == &x)
                    || (num.as_ref() == &x && den.as_ref() == &y)
                    || (matches!(num.as_ref(), Expr::Add(..) | Expr::Sub(..))
                        && matches!(den.as_ref(), Expr::Mul(..) | Expr::Pow(..)))
            }
            _ => false,
        }
    }

    fn is_linear(&self, f: &Expr) -> bool {
        terms_of(f).iter().all(|term| {
            term.is_independent_of(&self.y) || linear_coefficient(term, &self.y).is_some()
        })
    }

    /// Normalizes, classifies and solves `ode = 0` with a fresh context.
    pub fn solve(&self, ode: &Expr) -> Result<OdeSolution, SymbolicError> {
        let mut ctx = SolverContext::new();
        self.solve_with(ode, &mut ctx)
    }

    pub fn solve_with(
        &self,
        ode: &Expr,
        ctx: &mut SolverContext,
    ) -> Result<OdeSolution, SymbolicError> {
        info!("solving {} = 0 for {}({})", ode, self.y, self.x);
        let (_, _, f) = self.normalize_with(ode, ctx)?;
        let class = self.classify(&f);
        ctx.log_step(|| format!("{}' = {} classified as {}", self.y, f, class));
        let solution = match class {
            OdeClass::SeparableX => self.solve_direct(&f, ctx),
            OdeClass::SeparableY => {
                let one_over_h = Expr::Const(1.0) / f.clone();
                self.solve_separated(Expr::Const(1.0), one_over_h, class, ctx)
            }
            OdeClass::SeparableProduct => match self.split_separable(&f) {
                Some((g, one_over_h)) => self.solve_separated(g, one_over_h, class, ctx),
                None => OdeSolution::Unsolved(class),
            },
            OdeClass::Linear => self.solve_linear(&f, ctx),
            OdeClass::Homogeneous => self.solve_homogeneous(&f, ctx),
            OdeClass::General => OdeSolution::Unsolved(class),
        };
        info!("{}", solution);
        Ok(solution)
    }

    fn constant(name: &str) -> Expr {
        Expr::var(name)
    }

    /// y = ∫f dx + C
    fn solve_direct(&self, f: &Expr, ctx: &mut SolverContext) -> OdeSolution {
        ctx.log_step(|| "direct integration".to_string());
        let integral = f.integrate_with(&self.x, ctx);
        if integral.contains_integral() {
            return OdeSolution::Unsolved(OdeClass::SeparableX);
        }
        OdeSolution::Explicit((integral + Self::constant("C")).simplify_with(ctx))
    }

    /// ∫(1/h) dy = ∫g dx + C
    fn solve_separated(
        &self,
        g: Expr,
        one_over_h: Expr,
        class: OdeClass,
        ctx: &mut SolverContext,
    ) -> OdeSolution {
        ctx.log_step(|| format!("separation of variables, g = {}, 1/h = {}", g, one_over_h));
        let lhs = one_over_h.simplify_with(ctx).integrate_with(&self.y, ctx);
        let rhs = g.integrate_with(&self.x, ctx);
        if lhs.contains_integral() || rhs.contains_integral() {
            return OdeSolution::Unsolved(class);
        }
        let y = Expr::var(&self.y);
        let is_log_y = match &lhs {
            Expr::Ln(arg) => arg.as_ref() == &y || arg.as_ref() == &Expr::Abs(y.clone().boxed()),
            _ => false,
        };
        if is_log_y {
            ctx.log_step(|| "ln|y| on the left, solving for y".to_string());
            let solution = (Self::constant("A") * rhs.exp()).simplify_with(ctx);
            OdeSolution::Explicit(solution)
        } else {
            OdeSolution::Implicit {
                lhs,
                rhs: (rhs + Self::constant("C")).simplify_with(ctx),
            }
        }
    }

    /// y' = p·y + q  =>  y = (∫μ·q dx + C)/μ, μ = exp(-∫p dx)
    fn solve_linear(&self, f: &Expr, ctx: &mut SolverContext) -> OdeSolution {
        let mut p_terms = Vec::new();
        let mut q_terms = Vec::new();
        for term in terms_of(f) {
            if term.is_independent_of(&self.y) {
                q_terms.push(term);
            } else if let Some(p) = linear_coefficient(&term, &self.y) {
                p_terms.push(p);
            } else {
                return OdeSolution::Unsolved(OdeClass::Linear);
            }
        }
        let big_p = (-sum(p_terms)).simplify_with(ctx);
        let q = sum(q_terms).simplify_with(ctx);
        ctx.log_step(|| format!("integrating factor method, P = {}, Q = {}", big_p, q));
        let integral_p = big_p.integrate_with(&self.x, ctx);
        if integral_p.contains_integral() {
            return OdeSolution::Unsolved(OdeClass::Linear);
        }
        let mu = integral_p.exp().simplify_with(ctx);
        let mu_q = (mu.clone() * q).simplify_with(ctx);
        let integral_mu_q = mu_q.integrate_with(&self.x, ctx);
        if integral_mu_q.contains_integral() {
            return OdeSolution::Unsolved(OdeClass::Linear);
        }
        ctx.log_step(|| format!("μ = {}, ∫μQ = {}", mu, integral_mu_q));
        let solution =
            ((Expr::Const(1.0) / mu) * (integral_mu_q + Self::constant("C"))).simplify_with(ctx);
        OdeSolution::Explicit(solution)
    }

    /// With y = v·x and f homogeneous of degree zero, f(x, v·x) = F(v) = f(1, v) and
    /// x·v' = F(v) - v separates.
    fn solve_homogeneous(&self, f: &Expr, ctx: &mut SolverContext) -> OdeSolution {
        let v_name = "v";
        let v = Expr::var(v_name);
        let big_f = f
            .substitute_variable(&self.y, &v)
            .set_variable(&self.x, 1.0)
            .simplify_with(ctx);
        ctx.log_step(|| format!("homogeneous substitution y = v·{}, F(v) = {}", self.x, big_f));
        // 1/(F - v), with F = num/den written as den/(num - v·den)
        let (difference, integrand_num) = match &big_f {
            Expr::Div(num, den) => (
                (num.as_ref().clone() - v.clone() * den.as_ref().clone()).simplify_with(ctx),
                den.as_ref().clone(),
            ),
            _ => ((big_f.clone() - v.clone()).simplify_with(ctx), Expr::Const(1.0)),
        };
        if difference.is_zero() {
            // v' = 0
            return OdeSolution::Explicit(Self::constant("C") * Expr::var(&self.x));
        }
        let integrand = (integrand_num / difference).simplify_with(ctx);
        let lhs = integrand.integrate_with(v_name, ctx);
        let rhs = (Expr::Const(1.0) / Expr::var(&self.x)).integrate_with(&self.x, ctx);
        if lhs.contains_integral() || rhs.contains_integral() {
            return OdeSolution::Unsolved(OdeClass::Homogeneous);
        }
        let ratio = Expr::var(&self.y) / Expr::var(&self.x);
        OdeSolution::Implicit {
            lhs: lhs.substitute_variable(v_name, &ratio),
            rhs: (rhs + Self::constant("C")).simplify_with(ctx),
        }
    }
}

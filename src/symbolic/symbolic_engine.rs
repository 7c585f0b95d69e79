//! # Symbolic Engine Module
//!
//! Core expression tree of the crate. Everything else (pattern matching, rewriting,
//! differentiation, integration, ODE solving) is written against the `Expr` enum defined here.
//!
//! ## Main Structures
//!
//! ### `Expr` Enum
//! - **Variables**: `Var(String)` - symbolic variables like "x", "y"
//! - **Constants**: `Const(f64)` - numerical constants
//! - **Operations**: `Add`, `Sub`, `Mul`, `Div`, `Pow` - basic arithmetic
//! - **Functions**: `Neg`, `Exp`, `Ln`, `sin`, `cos`, ..., `Abs` - one child each
//! - **Placeholders**: `Integral`, `Derivative` - pending operations; an `Integral` left in a
//!   result is the "unsolved" sentinel of the integrator
//! - **Template variables**: `Pattern`, `ConstPattern`, `VarPattern` - only used inside
//!   rewrite rules, never in expressions handed in by a caller
//!
//! ### `UnaryFn` Enum
//! Names every one-child variant so that generic traversals (children, map_children, numeric
//! evaluation) do not have to repeat the same arm twenty times.
//!
//! ## Interesting Code Features
//!
//! 1. Equality is derived structural equality. It is syntactic: `x + y != y + x`. Mathematical
//!    equivalence lives in `symbolic_simplify` (`Expr::equivalent`).
//! 2. Operator overloading (`+ - * /` and unary `-`) builds trees, so rule tables read like math.
//! 3. Non-standard function names follow mathematical notation (tg, ctg, arctg) rather than
//!    programming conventions.

#![allow(non_camel_case_types)]

use crate::symbolic::symbolic_error::SymbolicError;
use std::f64::consts::PI;
use std::fmt;
use strum_macros::{Display, EnumIter};

/// Core symbolic expression enum representing mathematical expressions as a tree.
///
/// Every node owns its children; there is no sharing and no back reference, so trees are
/// finite and acyclic by construction. Expressions are never mutated in place by the engine,
/// each rewrite step builds a new tree.
///
/// # Examples
/// ```rust, ignore
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let x = Expr::Var("x".to_string());
/// let expr = Expr::Add(Box::new(x), Box::new(Expr::Const(2.0)));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    /// Symbolic variable with a name (e.g., "x", "y", "velocity")
    Var(String),
    /// Numerical constant value
    Const(f64),
    /// Addition operation: left + right
    Add(Box<Expr>, Box<Expr>),
    /// Subtraction operation: left - right
    Sub(Box<Expr>, Box<Expr>),
    /// Multiplication operation: left * right
    Mul(Box<Expr>, Box<Expr>),
    /// Division operation: left / right
    Div(Box<Expr>, Box<Expr>),
    /// Power operation: base ^ exponent
    Pow(Box<Expr>, Box<Expr>),
    /// Negation: -x
    Neg(Box<Expr>),
    /// Exponential function: e^x
    Exp(Box<Expr>),
    /// Natural logarithm: ln(x)
    Ln(Box<Expr>),
    /// Sine function: sin(x)
    sin(Box<Expr>),
    /// Cosine function: cos(x)
    cos(Box<Expr>),
    /// Tangent function: tan(x) - uses mathematical notation 'tg'
    tg(Box<Expr>),
    /// Secant function: 1/cos(x)
    sec(Box<Expr>),
    /// Cosecant function: 1/sin(x)
    csc(Box<Expr>),
    /// Cotangent function: cot(x) - uses mathematical notation 'ctg'
    ctg(Box<Expr>),
    /// Hyperbolic sine
    sinh(Box<Expr>),
    /// Hyperbolic cosine
    cosh(Box<Expr>),
    /// Hyperbolic tangent
    tanh(Box<Expr>),
    /// Hyperbolic secant
    sech(Box<Expr>),
    /// Hyperbolic cosecant
    csch(Box<Expr>),
    /// Hyperbolic cotangent
    coth(Box<Expr>),
    /// Arcsine function: arcsin(x)
    arcsin(Box<Expr>),
    /// Arccosine function: arccos(x)
    arccos(Box<Expr>),
    /// Arctangent function: arctan(x) - uses mathematical notation 'arctg'
    arctg(Box<Expr>),
    /// Arcsecant function
    arcsec(Box<Expr>),
    /// Arccosecant function
    arccsc(Box<Expr>),
    /// Arccotangent function: arccot(x) - uses mathematical notation 'arcctg'
    arcctg(Box<Expr>),
    /// Absolute value |x|
    Abs(Box<Expr>),
    /// Pending indefinite integral of the expression with respect to the named variable.
    /// Returned by the integrator when no strategy succeeds.
    Integral(Box<Expr>, String),
    /// Pending derivative of the expression with respect to the named variable.
    /// Also used as the dy/dx marker in ODEs: `Derivative(Var("y"), "x")`.
    Derivative(Box<Expr>, String),
    /// Template variable matching any subtree
    Pattern(String),
    /// Template variable matching only a numeric constant
    ConstPattern(String),
    /// Template variable matching only a symbol
    VarPattern(String),
}

/// One-child node kinds of `Expr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum UnaryFn {
    #[strum(to_string = "-")]
    Neg,
    #[strum(to_string = "exp")]
    Exp,
    #[strum(to_string = "ln")]
    Ln,
    #[strum(to_string = "sin")]
    Sin,
    #[strum(to_string = "cos")]
    Cos,
    #[strum(to_string = "tg")]
    Tg,
    #[strum(to_string = "sec")]
    Sec,
    #[strum(to_string = "csc")]
    Csc,
    #[strum(to_string = "ctg")]
    Ctg,
    #[strum(to_string = "sinh")]
    Sinh,
    #[strum(to_string = "cosh")]
    Cosh,
    #[strum(to_string = "tanh")]
    Tanh,
    #[strum(to_string = "sech")]
    Sech,
    #[strum(to_string = "csch")]
    Csch,
    #[strum(to_string = "coth")]
    Coth,
    #[strum(to_string = "arcsin")]
    ArcSin,
    #[strum(to_string = "arccos")]
    ArcCos,
    #[strum(to_string = "arctg")]
    ArcTg,
    #[strum(to_string = "arcsec")]
    ArcSec,
    #[strum(to_string = "arccsc")]
    ArcCsc,
    #[strum(to_string = "arcctg")]
    ArcCtg,
    #[strum(to_string = "abs")]
    Abs,
}

impl UnaryFn {
    /// Builds the node of this kind around `arg`.
    pub fn apply(self, arg: Expr) -> Expr {
        let arg = arg.boxed();
        match self {
            UnaryFn::Neg => Expr::Neg(arg),
            UnaryFn::Exp => Expr::Exp(arg),
            UnaryFn::Ln => Expr::Ln(arg),
            UnaryFn::Sin => Expr::sin(arg),
            UnaryFn::Cos => Expr::cos(arg),
            UnaryFn::Tg => Expr::tg(arg),
            UnaryFn::Sec => Expr::sec(arg),
            UnaryFn::Csc => Expr::csc(arg),
            UnaryFn::Ctg => Expr::ctg(arg),
            UnaryFn::Sinh => Expr::sinh(arg),
            UnaryFn::Cosh => Expr::cosh(arg),
            UnaryFn::Tanh => Expr::tanh(arg),
            UnaryFn::Sech => Expr::sech(arg),
            UnaryFn::Csch => Expr::csch(arg),
            UnaryFn::Coth => Expr::coth(arg),
            UnaryFn::ArcSin => Expr::arcsin(arg),
            UnaryFn::ArcCos => Expr::arccos(arg),
            UnaryFn::ArcTg => Expr::arctg(arg),
            UnaryFn::ArcSec => Expr::arcsec(arg),
            UnaryFn::ArcCsc => Expr::arccsc(arg),
            UnaryFn::ArcCtg => Expr::arcctg(arg),
            UnaryFn::Abs => Expr::Abs(arg),
        }
    }

    /// Numeric value of the function at `x`.
    pub fn eval(self, x: f64) -> f64 {
        match self {
            UnaryFn::Neg => -x,
            UnaryFn::Exp => x.exp(),
            UnaryFn::Ln => x.ln(),
            UnaryFn::Sin => x.sin(),
            UnaryFn::Cos => x.cos(),
            UnaryFn::Tg => x.tan(),
            UnaryFn::Sec => 1.0 / x.cos(),
            UnaryFn::Csc => 1.0 / x.sin(),
            UnaryFn::Ctg => 1.0 / x.tan(),
            UnaryFn::Sinh => x.sinh(),
            UnaryFn::Cosh => x.cosh(),
            UnaryFn::Tanh => x.tanh(),
            UnaryFn::Sech => 1.0 / x.cosh(),
            UnaryFn::Csch => 1.0 / x.sinh(),
            UnaryFn::Coth => 1.0 / x.tanh(),
            UnaryFn::ArcSin => x.asin(),
            UnaryFn::ArcCos => x.acos(),
            UnaryFn::ArcTg => x.atan(),
            UnaryFn::ArcSec => (1.0 / x).acos(),
            UnaryFn::ArcCsc => (1.0 / x).asin(),
            UnaryFn::ArcCtg => PI / 2.0 - x.atan(),
            UnaryFn::Abs => x.abs(),
        }
    }
}

/// Display implementation for pretty printing symbolic expressions.
///
/// Converts expressions to human-readable notation with parentheses around every binary node.
/// Rendering is presentation only; equality and matching never compare text.
impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(name) => write!(f, "{}", name),
            Expr::Const(val) => write!(f, "{}", val),
            Expr::Add(lhs, rhs) => write!(f, "({} + {})", lhs, rhs),
            Expr::Sub(lhs, rhs) => write!(f, "({} - {})", lhs, rhs),
            Expr::Mul(lhs, rhs) => write!(f, "({} * {})", lhs, rhs),
            Expr::Div(lhs, rhs) => write!(f, "({} / {})", lhs, rhs),
            Expr::Pow(base, exp) => write!(f, "({} ^ {})", base, exp),
            Expr::Neg(expr) => write!(f, "-{}", expr),
            Expr::Integral(expr, var) => write!(f, "∫{} d{}", expr, var),
            Expr::Derivative(expr, var) => write!(f, "d/d{}[{}]", var, expr),
            Expr::Pattern(name) => write!(f, "?{}", name),
            Expr::ConstPattern(name) => write!(f, "#{}", name),
            Expr::VarPattern(name) => write!(f, "${}", name),
            _ => match self.as_unary() {
                Some((kind, arg)) => write!(f, "{}({})", kind, arg),
                None => Ok(()),
            },
        }
    }
}

impl std::ops::Add for Expr {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Expr::Add(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Sub for Expr {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Expr::Sub(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Mul for Expr {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self::Output {
        Expr::Mul(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Div for Expr {
    type Output = Self;

    fn div(self, rhs: Self) -> Self::Output {
        Expr::Div(self.boxed(), rhs.boxed())
    }
}

impl std::ops::Neg for Expr {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Expr::Neg(self.boxed())
    }
}

impl Expr {
    /// BASIC FEATURES

    /// Creates multiple symbolic variables from a comma-separated string.
    ///
    /// # Examples
    /// ```rust, ignore
    /// let vars = Expr::Symbols("x, y, z");
    /// assert_eq!(vars.len(), 3);
    /// ```
    pub fn Symbols(symbols: &str) -> Vec<Expr> {
        symbols
            .split(',')
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| Expr::Var(s.to_string()))
            .collect()
    }

    /// Symbol with the given name.
    pub fn var(name: &str) -> Expr {
        Expr::Var(name.to_string())
    }

    /// Pending integral `∫self d var`.
    pub fn integral(expr: Expr, var: &str) -> Expr {
        Expr::Integral(expr.boxed(), var.to_string())
    }

    /// Pending derivative `d/d var [self]`.
    pub fn derivative(expr: Expr, var: &str) -> Expr {
        Expr::Derivative(expr.boxed(), var.to_string())
    }

    /// Convenience method to wrap expression in Box for recursive structures.
    pub fn boxed(self) -> Box<Self> {
        Box::new(self)
    }

    /// Creates exponential function e^(self).
    pub fn exp(self) -> Expr {
        Expr::Exp(self.boxed())
    }

    /// Creates natural logarithm ln(self).
    pub fn ln(self) -> Expr {
        Expr::Ln(self.boxed())
    }

    /// Creates power expression self^rhs.
    pub fn pow(self, rhs: Expr) -> Expr {
        Expr::Pow(self.boxed(), rhs.boxed())
    }

    /// Checks if expression is exactly zero (constant 0.0).
    pub fn is_zero(&self) -> bool {
        matches!(self, Expr::Const(val) if *val == 0.0)
    }

    /// Numeric value if the node is a constant.
    pub fn as_const(&self) -> Option<f64> {
        match self {
            Expr::Const(val) => Some(*val),
            _ => None,
        }
    }

    /// TRAVERSAL

    /// Splits a one-child node into its kind and argument; `None` for every other node.
    pub fn as_unary(&self) -> Option<(UnaryFn, &Expr)> {
        match self {
            Expr::Neg(e) => Some((UnaryFn::Neg, e)),
            Expr::Exp(e) => Some((UnaryFn::Exp, e)),
            Expr::Ln(e) => Some((UnaryFn::Ln, e)),
            Expr::sin(e) => Some((UnaryFn::Sin, e)),
            Expr::cos(e) => Some((UnaryFn::Cos, e)),
            Expr::tg(e) => Some((UnaryFn::Tg, e)),
            Expr::sec(e) => Some((UnaryFn::Sec, e)),
            Expr::csc(e) => Some((UnaryFn::Csc, e)),
            Expr::ctg(e) => Some((UnaryFn::Ctg, e)),
            Expr::sinh(e) => Some((UnaryFn::Sinh, e)),
            Expr::cosh(e) => Some((UnaryFn::Cosh, e)),
            Expr::tanh(e) => Some((UnaryFn::Tanh, e)),
            Expr::sech(e) => Some((UnaryFn::Sech, e)),
            Expr::csch(e) => Some((UnaryFn::Csch, e)),
            Expr::coth(e) => Some((UnaryFn::Coth, e)),
            Expr::arcsin(e) => Some((UnaryFn::ArcSin, e)),
            Expr::arccos(e) => Some((UnaryFn::ArcCos, e)),
            Expr::arctg(e) => Some((UnaryFn::ArcTg, e)),
            Expr::arcsec(e) => Some((UnaryFn::ArcSec, e)),
            Expr::arccsc(e) => Some((UnaryFn::ArcCsc, e)),
            Expr::arcctg(e) => Some((UnaryFn::ArcCtg, e)),
            Expr::Abs(e) => Some((UnaryFn::Abs, e)),
            Expr::Var(_)
            | Expr::Const(_)
            | Expr::Add(..)
            | Expr::Sub(..)
            | Expr::Mul(..)
            | Expr::Div(..)
            | Expr::Pow(..)
            | Expr::Integral(..)
            | Expr::Derivative(..)
            | Expr::Pattern(_)
            | Expr::ConstPattern(_)
            | Expr::VarPattern(_) => None,
        }
    }

    /// Direct children in traversal order (left before right).
    pub fn children(&self) -> Vec<&Expr> {
        match self {
            Expr::Var(_)
            | Expr::Const(_)
            | Expr::Pattern(_)
            | Expr::ConstPattern(_)
            | Expr::VarPattern(_) => Vec::new(),
            Expr::Add(lhs, rhs)
            | Expr::Sub(lhs, rhs)
            | Expr::Mul(lhs, rhs)
            | Expr::Div(lhs, rhs)
            | Expr::Pow(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
            Expr::Integral(expr, _) | Expr::Derivative(expr, _) => vec![expr.as_ref()],
            _ => match self.as_unary() {
                Some((_, arg)) => vec![arg],
                None => Vec::new(),
            },
        }
    }

    /// Rebuilds the node with `f` applied to every direct child, left to right.
    /// Leaves are cloned unchanged.
    pub fn map_children<F: FnMut(&Expr) -> Expr>(&self, mut f: F) -> Expr {
        match self {
            Expr::Var(_)
            | Expr::Const(_)
            | Expr::Pattern(_)
            | Expr::ConstPattern(_)
            | Expr::VarPattern(_) => self.clone(),
            Expr::Add(lhs, rhs) => {
                let lhs = f(lhs);
                Expr::Add(lhs.boxed(), f(rhs).boxed())
            }
            Expr::Sub(lhs, rhs) => {
                let lhs = f(lhs);
                Expr::Sub(lhs.boxed(), f(rhs).boxed())
            }
            Expr::Mul(lhs, rhs) => {
                let lhs = f(lhs);
                Expr::Mul(lhs.boxed(), f(rhs).boxed())
            }
            Expr::Div(lhs, rhs) => {
                let lhs = f(lhs);
                Expr::Div(lhs.boxed(), f(rhs).boxed())
            }
            Expr::Pow(base, exp) => {
                let base = f(base);
                Expr::Pow(base.boxed(), f(exp).boxed())
            }
            Expr::Integral(expr, var) => Expr::Integral(f(expr).boxed(), var.clone()),
            Expr::Derivative(expr, var) => Expr::Derivative(f(expr).boxed(), var.clone()),
            _ => match self.as_unary() {
                Some((kind, arg)) => kind.apply(f(arg)),
                None => self.clone(),
            },
        }
    }

    /// Replaces every occurrence of the symbol `var` with `expr`.
    pub fn substitute_variable(&self, var: &str, expr: &Expr) -> Expr {
        match self {
            Expr::Var(name) if name == var => expr.clone(),
            _ => self.map_children(|child| child.substitute_variable(var, expr)),
        }
    }

    /// Substitutes a variable with a constant value throughout the expression.
    pub fn set_variable(&self, var: &str, value: f64) -> Expr {
        self.substitute_variable(var, &Expr::Const(value))
    }

    /// check if the expression contains a variable
    ///
    /// The variable slot of `Integral`/`Derivative` counts as an occurrence.
    pub fn contains_variable(&self, var_name: &str) -> bool {
        match self {
            Expr::Var(name) => name == var_name,
            Expr::Integral(expr, var) | Expr::Derivative(expr, var) => {
                var == var_name || expr.contains_variable(var_name)
            }
            _ => self
                .children()
                .into_iter()
                .any(|child| child.contains_variable(var_name)),
        }
    }

    /// true iff `var` does not occur anywhere in the expression
    pub fn is_independent_of(&self, var: &str) -> bool {
        !self.contains_variable(var)
    }

    /// true if some node of the tree is a pending integral
    pub fn contains_integral(&self) -> bool {
        match self {
            Expr::Integral(..) => true,
            _ => self.children().into_iter().any(|c| c.contains_integral()),
        }
    }

    /// Names of all template variables in the tree, in traversal order (with repetitions).
    pub fn template_names(&self) -> Vec<String> {
        match self {
            Expr::Pattern(name) | Expr::ConstPattern(name) | Expr::VarPattern(name) => {
                vec![name.clone()]
            }
            _ => self
                .children()
                .into_iter()
                .flat_map(|child| child.template_names())
                .collect(),
        }
    }

    /// DIRECT EXPRESSION EVALUATION

    /// Evaluates a concrete expression numerically.
    ///
    /// # Arguments
    /// * `vars` - Variable names in order matching values array
    /// * `values` - Numerical values for each variable
    ///
    /// # Errors
    /// `UnboundVariable` for a symbol missing from `vars`, `UnsupportedNode` for placeholders and
    /// template variables.
    pub fn eval_expression(&self, vars: &[&str], values: &[f64]) -> Result<f64, SymbolicError> {
        match self {
            Expr::Var(name) => vars
                .iter()
                .position(|&x| x == name)
                .and_then(|index| values.get(index).copied())
                .ok_or_else(|| SymbolicError::UnboundVariable(name.clone())),
            Expr::Const(val) => Ok(*val),
            Expr::Add(lhs, rhs) => {
                Ok(lhs.eval_expression(vars, values)? + rhs.eval_expression(vars, values)?)
            }
            Expr::Sub(lhs, rhs) => {
                Ok(lhs.eval_expression(vars, values)? - rhs.eval_expression(vars, values)?)
            }
            Expr::Mul(lhs, rhs) => {
                Ok(lhs.eval_expression(vars, values)? * rhs.eval_expression(vars, values)?)
            }
            Expr::Div(lhs, rhs) => {
                Ok(lhs.eval_expression(vars, values)? / rhs.eval_expression(vars, values)?)
            }
            Expr::Pow(base, exp) => {
                let base_fn = base.eval_expression(vars, values)?;
                let exp_fn = exp.eval_expression(vars, values)?;
                Ok(base_fn.powf(exp_fn))
            }
            Expr::Integral(..)
            | Expr::Derivative(..)
            | Expr::Pattern(_)
            | Expr::ConstPattern(_)
            | Expr::VarPattern(_) => Err(SymbolicError::UnsupportedNode(self.to_string())),
            _ => match self.as_unary() {
                Some((kind, arg)) => Ok(kind.eval(arg.eval_expression(vars, values)?)),
                None => Err(SymbolicError::UnsupportedNode(self.to_string())),
            },
        }
    } // end of eval_expression
}

//___________________________________MACROS____________________________________

/// Macro to create symbolic variables from a comma-separated list
/// Usage: symbols!(x, y, z) -> creates variables x, y, z
#[macro_export]
macro_rules! symbols {
    ($($var:ident),+ $(,)?) => {
        ($(
            $crate::symbolic::symbolic_engine::Expr::Var(stringify!($var).to_string())
        ),+)
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use strum::IntoEnumIterator;

    #[test]
    fn test_structural_equality_is_syntactic() {
        let (x, y) = symbols!(x, y);
        assert_eq!(x.clone() + y.clone(), x.clone() + y.clone());
        assert_ne!(x.clone() + y.clone(), y + x);
    }

    #[test]
    fn test_display() {
        let x = Expr::var("x");
        let expr = x.clone().pow(Expr::Const(2.0)) + Expr::sin(x.clone().boxed());
        assert_eq!(expr.to_string(), "((x ^ 2) + sin(x))");
        assert_eq!((-x.clone()).to_string(), "-x");
        assert_eq!(Expr::integral(x.clone(), "x").to_string(), "∫x dx");
        assert_eq!(Expr::Abs(x.boxed()).to_string(), "abs(x)");
    }

    #[test]
    fn test_unary_roundtrip_covers_every_kind() {
        let x = Expr::var("x");
        for kind in UnaryFn::iter() {
            let node = kind.apply(x.clone());
            let (back, arg) = node.as_unary().unwrap();
            assert_eq!(back, kind);
            assert_eq!(arg, &x);
            assert_eq!(node.children(), vec![&x]);
        }
    }

    #[test]
    fn test_map_children_keeps_shape() {
        let x = Expr::var("x");
        let expr = Expr::Integral((x.clone() * Expr::Const(2.0)).boxed(), "x".to_string());
        let renamed = expr.map_children(|c| c.substitute_variable("x", &Expr::var("t")));
        assert_eq!(
            renamed,
            Expr::Integral((Expr::var("t") * Expr::Const(2.0)).boxed(), "x".to_string())
        );
    }

    #[test]
    fn test_contains_and_independent() {
        let (x, y) = symbols!(x, y);
        let expr = x.clone().exp() * y.clone();
        assert!(expr.contains_variable("x"));
        assert!(!expr.is_independent_of("y"));
        assert!(expr.is_independent_of("z"));
        assert!(!Expr::integral(y.clone(), "x").is_independent_of("x"));
        assert!(Expr::integral(y, "x").contains_integral());
        assert!(!expr.contains_integral());
    }

    #[test]
    fn test_template_names() {
        let pattern = Expr::Pattern("u".to_string()) * Expr::ConstPattern("c".to_string());
        assert_eq!(pattern.template_names(), vec!["u".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_eval_expression() {
        let (x, y) = symbols!(x, y);
        let expr = x.clone().pow(Expr::Const(2.0)) * Expr::sin(y.clone().boxed())
            - Expr::Abs((-x.clone()).boxed());
        let value = expr.eval_expression(&["x", "y"], &[3.0, 0.5]).unwrap();
        assert_relative_eq!(value, 9.0 * 0.5_f64.sin() - 3.0, epsilon = 1e-12);
        let arcctg = Expr::arcctg(x.clone().boxed());
        assert_relative_eq!(
            arcctg.eval_expression(&["x"], &[1.0]).unwrap(),
            PI / 4.0,
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_eval_expression_errors() {
        let x = Expr::var("x");
        assert_eq!(
            x.eval_expression(&["y"], &[1.0]),
            Err(SymbolicError::UnboundVariable("x".to_string()))
        );
        let pending = Expr::integral(x, "x");
        assert!(matches!(
            pending.eval_expression(&["x"], &[1.0]),
            Err(SymbolicError::UnsupportedNode(_))
        ));
    }
}

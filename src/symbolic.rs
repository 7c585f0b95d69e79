#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
///____________________________________________________________________________________________________________________________
/// # Symbolic engine
/// a module
/// 1) defines the expression tree `Expr` and the table of unary functions `UnaryFn`
/// 2) builds expressions with operators and helper constructors
/// 3) evaluates a concrete expression numerically
///# Example#
/// ```rust, ignore
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let x = Expr::var("x");
/// let f = x.clone().pow(Expr::Const(2.0)) + Expr::sin(x.boxed());
/// println!("f = {}", f);
/// let value = f.eval_expression(&["x"], &[1.0]).unwrap();
/// ```
pub mod symbolic_engine;
/// error type of the boundary operations (numeric evaluation, rule validation, settings, ODE normalization)
pub mod symbolic_error;
///____________________________________________________________________________________________________________________________
/// # Pattern matching
/// rules are written as expression trees with template variables: `Pattern` matches any subtree,
/// `ConstPattern` only a number, `VarPattern` only a symbol. A `Rule` pairs a pattern with a template
/// and a list of side conditions.
/// ```rust, ignore
/// use RustedCalculus::symbolic::symbolic_pattern::{Rule, p, num};
/// let rule = Rule::new("mul_one", num(1.0) * p("u"), p("u"));
/// ```
pub mod symbolic_pattern;
/// root-first rewriting to a fixpoint with constant folding after every fired rule
pub mod symbolic_rewrite;
/// ordered rule tables: simplification, integration, differentiation
pub mod symbolic_rules;
/// call-local state: recursion depth, step counter, step log and solver settings
pub mod symbolic_context;
/// simplification to a normal form and order-insensitive equivalence of expressions
pub mod symbolic_simplify;
///____________________________________________________________________________________________________________________________
/// # Differentiation
/// analytical derivatives computed by the differentiation rule table
/// ```rust, ignore
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let f = Expr::var("x").pow(Expr::Const(3.0));
/// println!("df/dx = {}", f.diff("x"));
/// ```
pub mod symbolic_engine_derivatives;
///____________________________________________________________________________________________________________________________
/// # Integration
/// indefinite integration by a cascade of strategies: direct rules, u-substitution,
/// integration by parts. An integrand no strategy solves comes back as an `Expr::Integral` node.
/// ```rust, ignore
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// let x = Expr::var("x");
/// let f = x.clone() * x.exp();
/// println!("integral = {}", f.integrate("x"));
/// ```
pub mod symbolic_integration;
///____________________________________________________________________________________________________________________________
/// # First order ODE
/// classification (separable, homogeneous, linear) and analytical solution of y' = f(x, y)
/// ```rust, ignore
/// use RustedCalculus::symbolic::symbolic_engine::Expr;
/// use RustedCalculus::symbolic::symbolic_ode::OdeSolver;
/// let (x, y) = (Expr::var("x"), Expr::var("y"));
/// let ode = Expr::derivative(y.clone(), "x") - x * y;
/// let solution = OdeSolver::new("x", "y").solve(&ode).unwrap();
/// println!("{}", solution);
/// ```
pub mod symbolic_ode;

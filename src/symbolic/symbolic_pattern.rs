//! # Pattern matching and template substitution
//!
//! A rewrite rule is a pair of trees, `pattern` and `template`, that may contain template
//! variables (`Expr::Pattern`, `Expr::ConstPattern`, `Expr::VarPattern`). Matching walks the
//! pattern and the concrete tree in lock step and collects `Bindings`; substitution instantiates
//! the template from them.
//!
//! Matching is purely structural. Operand order of `Add`/`Mul` is significant, so rule tables
//! carry explicit commuted variants where they need them.
//!
//! Some rules only make sense under a side condition ("k does not depend on x", "n != -1").
//! Those are expressed as `Condition` values attached to the rule, keeping the tables data.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_error::SymbolicError;
use std::collections::HashMap;

/// template variable name -> bound concrete subexpression
pub type Bindings = HashMap<String, Expr>;

/// Side condition checked on the bindings after a successful structural match.
/// A condition naming an unbound template variable does not hold.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// bound expression does not contain the variable
    FreeOf(&'static str, String),
    /// bound expression is not a numeric constant
    NotConst(&'static str),
    /// bound expression is not the constant zero
    NotZero(&'static str),
    /// bound expression is a constant different from the value
    ConstNot(&'static str, f64),
}

impl Condition {
    pub fn holds(&self, bindings: &Bindings) -> bool {
        match self {
            Condition::FreeOf(name, var) => bindings
                .get(*name)
                .is_some_and(|e| e.is_independent_of(var)),
            Condition::NotConst(name) => bindings
                .get(*name)
                .is_some_and(|e| !matches!(e, Expr::Const(_))),
            Condition::NotZero(name) => bindings.get(*name).is_some_and(|e| !e.is_zero()),
            Condition::ConstNot(name, value) => bindings
                .get(*name)
                .and_then(|e| e.as_const())
                .is_some_and(|c| c != *value),
        }
    }
}

/// Ordered rewrite rule: `pattern -> template`, fired only when every condition holds.
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub name: &'static str,
    pub pattern: Expr,
    pub template: Expr,
    pub conditions: Vec<Condition>,
}

impl Rule {
    pub fn new(name: &'static str, pattern: Expr, template: Expr) -> Self {
        Rule {
            name,
            pattern,
            template,
            conditions: Vec::new(),
        }
    }

    /// Adds a side condition.
    pub fn when(mut self, condition: Condition) -> Self {
        self.conditions.push(condition);
        self
    }

    /// Matches the rule against the root of `expr` and returns the instantiated template.
    pub fn apply(&self, expr: &Expr) -> Option<Expr> {
        let bindings = match_pattern(&self.pattern, expr)?;
        if self.conditions.iter().all(|c| c.holds(&bindings)) {
            Some(substitute(&self.template, &bindings))
        } else {
            None
        }
    }

    /// Every template variable used by the template or a condition must be bound by the pattern.
    pub fn validate(&self) -> Result<(), SymbolicError> {
        let bound = self.pattern.template_names();
        let condition_names = self.conditions.iter().map(|c| match c {
            Condition::FreeOf(name, _)
            | Condition::NotConst(name)
            | Condition::NotZero(name)
            | Condition::ConstNot(name, _) => name.to_string(),
        });
        for name in self.template.template_names().into_iter().chain(condition_names) {
            if !bound.contains(&name) {
                return Err(SymbolicError::UnboundTemplateVariable {
                    rule: self.name.to_string(),
                    name,
                });
            }
        }
        Ok(())
    }
}

/// Binds `name` to `expr`, or checks consistency with an earlier binding.
fn bind(name: &str, expr: &Expr, bindings: &mut Bindings) -> bool {
    match bindings.get(name) {
        Some(bound) => bound == expr,
        None => {
            bindings.insert(name.to_string(), expr.clone());
            true
        }
    }
}

fn match_into(pattern: &Expr, expr: &Expr, bindings: &mut Bindings) -> bool {
    match (pattern, expr) {
        (Expr::Pattern(name), _) => bind(name, expr, bindings),
        (Expr::ConstPattern(name), Expr::Const(_)) => bind(name, expr, bindings),
        (Expr::ConstPattern(_), _) => false,
        (Expr::VarPattern(name), Expr::Var(_)) => bind(name, expr, bindings),
        (Expr::VarPattern(_), _) => false,
        (Expr::Var(a), Expr::Var(b)) => a == b,
        (Expr::Const(a), Expr::Const(b)) => a == b,
        (Expr::Add(pl, pr), Expr::Add(el, er))
        | (Expr::Sub(pl, pr), Expr::Sub(el, er))
        | (Expr::Mul(pl, pr), Expr::Mul(el, er))
        | (Expr::Div(pl, pr), Expr::Div(el, er))
        | (Expr::Pow(pl, pr), Expr::Pow(el, er)) => {
            match_into(pl, el, bindings) && match_into(pr, er, bindings)
        }
        (Expr::Integral(p, pv), Expr::Integral(e, ev))
        | (Expr::Derivative(p, pv), Expr::Derivative(e, ev)) => {
            pv == ev && match_into(p, e, bindings)
        }
        _ => match (pattern.as_unary(), expr.as_unary()) {
            (Some((pk, p)), Some((ek, e))) => pk == ek && match_into(p, e, bindings),
            _ => false,
        },
    }
}

/// Matches `pattern` against the whole of `expr`.
///
/// Returns the bindings on success. A template variable used twice must match structurally
/// equal subtrees at both places.
pub fn match_pattern(pattern: &Expr, expr: &Expr) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    if match_into(pattern, expr, &mut bindings) {
        Some(bindings)
    } else {
        None
    }
}

/// Instantiates `template`: every bound template variable is replaced by its binding,
/// unbound ones are left in place.
pub fn substitute(template: &Expr, bindings: &Bindings) -> Expr {
    match template {
        Expr::Pattern(name) | Expr::ConstPattern(name) | Expr::VarPattern(name) => bindings
            .get(name)
            .cloned()
            .unwrap_or_else(|| template.clone()),
        _ => template.map_children(|child| substitute(child, bindings)),
    }
}

/// Match at the root and substitute in one step.
pub fn match_and_substitute(pattern: &Expr, template: &Expr, expr: &Expr) -> Option<Expr> {
    match_pattern(pattern, expr).map(|bindings| substitute(template, &bindings))
}

/// shorthand for `Expr::Pattern`
pub fn p(name: &str) -> Expr {
    Expr::Pattern(name.to_string())
}

/// shorthand for `Expr::ConstPattern`
pub fn c(name: &str) -> Expr {
    Expr::ConstPattern(name.to_string())
}

/// shorthand for `Expr::Const`
pub fn num(value: f64) -> Expr {
    Expr::Const(value)
}

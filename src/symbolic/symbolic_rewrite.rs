//! # Rewrite kernel
//!
//! Three primitives every solver in the crate is built from:
//! - `rewrite_once`: one rule application, root first, then children left to right
//! - `evaluate_constants`: numeric folding of binary nodes whose operands are both constants
//! - `rewrite`: `rewrite_once` + folding, repeated until the tree stops changing
//!
//! Rule sets are not proven confluent or terminating. The fixpoint loop stops at
//! `SolverSettings::max_rewrite_iterations` and reports it with `warn!`; when the rules converge
//! before that the ceiling has no effect on the result.

use crate::symbolic::symbolic_context::SolverContext;
use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_pattern::Rule;
use log::{trace, warn};

/// constant-folded result of a binary node, `None` keeps the node symbolic
fn fold_binary(expr: &Expr, a: f64, b: f64) -> Option<f64> {
    let value = match expr {
        Expr::Add(..) => a + b,
        Expr::Sub(..) => a - b,
        Expr::Mul(..) => a * b,
        Expr::Div(..) => {
            if b == 0.0 {
                return None;
            }
            a / b
        }
        Expr::Pow(..) => {
            if a == 0.0 && b == 0.0 {
                1.0
            } else if a == 0.0 && b < 0.0 {
                f64::INFINITY
            } else {
                a.powf(b)
            }
        }
        _ => return None,
    };
    if value.is_nan() {
        None
    } else if value == 0.0 {
        // drop the sign of -0.0
        Some(0.0)
    } else {
        Some(value)
    }
}

impl Expr {
    /// Tries every rule at the root in order; the first match wins. Otherwise rewrites the first
    /// child (left to right) that can be rewritten. Returns `None` when nothing fired.
    pub fn rewrite_once(&self, rules: &[Rule], ctx: &mut SolverContext) -> Option<Expr> {
        for rule in rules {
            if let Some(rewritten) = rule.apply(self) {
                ctx.count_step();
                trace!("{}: {} => {}", rule.name, self, rewritten);
                return Some(rewritten);
            }
        }
        let children = self.children();
        for (index, child) in children.iter().enumerate() {
            if let Some(new_child) = child.rewrite_once(rules, ctx) {
                let mut new_child = Some(new_child);
                let mut position = 0;
                return Some(self.map_children(|old| {
                    let replaced = if position == index {
                        new_child.take().unwrap_or_else(|| old.clone())
                    } else {
                        old.clone()
                    };
                    position += 1;
                    replaced
                }));
            }
        }
        None
    }

    /// Folds `Add/Sub/Mul/Div/Pow` nodes whose children fold to constants.
    ///
    /// Conventions: `0^0 = 1`, `0^negative = +inf`. Division by zero and results that would be
    /// NaN stay symbolic. Functions (`sin`, `exp`, ...) are never evaluated, only their argument
    /// is folded.
    pub fn evaluate_constants(&self) -> Expr {
        match self {
            Expr::Add(..) | Expr::Sub(..) | Expr::Mul(..) | Expr::Div(..) | Expr::Pow(..) => {
                let folded = self.map_children(|child| child.evaluate_constants());
                let operands = {
                    let children = folded.children();
                    (children[0].as_const(), children[1].as_const())
                };
                match operands {
                    (Some(a), Some(b)) => match fold_binary(&folded, a, b) {
                        Some(value) => Expr::Const(value),
                        None => folded,
                    },
                    _ => folded,
                }
            }
            _ => self.map_children(|child| child.evaluate_constants()),
        }
    }

    /// Rewrites to a fixpoint with a fresh context.
    pub fn rewrite(&self, rules: &[Rule]) -> Expr {
        let mut ctx = SolverContext::new();
        self.rewrite_with(rules, &mut ctx)
    }

    /// Repeats `rewrite_once` followed by constant folding until the tree stops changing.
    /// Folding runs on every pass, so a tree no rule matches still comes back folded.
    pub fn rewrite_with(&self, rules: &[Rule], ctx: &mut SolverContext) -> Expr {
        let mut current = self.evaluate_constants();
        let mut iterations = 0;
        loop {
            let next = match current.rewrite_once(rules, ctx) {
                Some(rewritten) => rewritten.evaluate_constants(),
                None => current.evaluate_constants(),
            };
            if next == current {
                break;
            }
            current = next;
            iterations += 1;
            if iterations >= ctx.settings.max_rewrite_iterations {
                warn!(
                    "rewriting stopped after {} iterations at {}",
                    iterations, current
                );
                break;
            }
        }
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbolic::symbolic_context::SolverSettings;
    use crate::symbolic::symbolic_pattern::{c, num, p};

    fn x() -> Expr {
        Expr::var("x")
    }

    #[test]
    fn test_folding_binary_operations() {
        let cases = [(2.0, 3.0), (-1.5, 4.0), (7.0, -0.25), (0.5, 0.5)];
        for (a, b) in cases {
            assert_eq!((num(a) + num(b)).evaluate_constants(), num(a + b));
            assert_eq!((num(a) - num(b)).evaluate_constants(), num(a - b));
            assert_eq!((num(a) * num(b)).evaluate_constants(), num(a * b));
            assert_eq!((num(a) / num(b)).evaluate_constants(), num(a / b));
        }
        assert_eq!(num(2.0).pow(num(10.0)).evaluate_constants(), num(1024.0));
    }

    #[test]
    fn test_folding_power_conventions() {
        assert_eq!(num(0.0).pow(num(0.0)).evaluate_constants(), num(1.0));
        assert_eq!(num(0.0).pow(num(-2.0)).evaluate_constants(), num(f64::INFINITY));
        // (-8)^(1/3) is NaN in floating point
        let root = num(-8.0).pow(num(1.0 / 3.0));
        assert_eq!(root.evaluate_constants(), root);
    }

    #[test]
    fn test_folding_keeps_division_by_zero() {
        let expr = num(1.0) / (num(2.0) - num(2.0));
        assert_eq!(expr.evaluate_constants(), num(1.0) / num(0.0));
    }

    #[test]
    fn test_folding_is_nested_but_does_not_evaluate_functions() {
        let expr = Expr::sin((num(0.0) * num(5.0)).boxed()) + (num(1.0) + num(2.0)) * x();
        assert_eq!(
            expr.evaluate_constants(),
            Expr::sin(num(0.0).boxed()) + num(3.0) * x()
        );
        assert_eq!((num(-1.0) * num(0.0)).evaluate_constants(), num(0.0));
    }

    #[test]
    fn test_rewrite_once_prefers_root_then_leftmost_child() {
        let rules = vec![Rule::new("add_zero", p("u") + num(0.0), p("u"))];
        let mut ctx = SolverContext::new();
        let inner = (x() + num(0.0)) * (x() + num(0.0));
        let once = inner.rewrite_once(&rules, &mut ctx).unwrap();
        assert_eq!(once, x() * (x() + num(0.0)));
        let root = (x() + num(0.0)) + num(0.0);
        assert_eq!(root.rewrite_once(&rules, &mut ctx).unwrap(), x() + num(0.0));
        assert!(x().rewrite_once(&rules, &mut ctx).is_none());
        assert_eq!(ctx.steps(), 2);
    }

    #[test]
    fn test_rule_order_breaks_ties() {
        let rules = vec![
            Rule::new("first", p("u") * p("w"), num(1.0)),
            Rule::new("second", p("u") * p("w"), num(2.0)),
        ];
        assert_eq!((x() * x()).rewrite(&rules), num(1.0));
    }

    #[test]
    fn test_rewrite_reaches_fixpoint_with_folding() {
        let rules = vec![
            Rule::new("mul_one", p("u") * num(1.0), p("u")),
            Rule::new("double", c("a") * p("u"), p("u") + p("u")),
        ];
        // the constant factor doubles the product, folding turns (3 - 2) into 1
        let expr = num(2.0) * (x() * (num(3.0) - num(2.0)));
        assert_eq!(expr.rewrite(&rules), x() + x());
    }

    #[test]
    fn test_rewrite_folds_when_no_rule_matches() {
        assert_eq!((num(2.0) + num(3.0)).rewrite(&[]), num(5.0));
        let nested = Expr::sin((num(2.0) * num(3.0)).boxed()) + x();
        assert_eq!(nested.rewrite(&[]), Expr::sin(num(6.0).boxed()) + x());
        let mut ctx = SolverContext::new();
        let unchanged = x().rewrite_with(&[], &mut ctx);
        assert_eq!(unchanged, x());
        assert_eq!(ctx.steps(), 0);
    }

    #[test]
    fn test_rewrite_ceiling_stops_oscillation() {
        let rules = vec![Rule::new("swap", p("a") + p("b"), p("b") + p("a"))];
        let settings = SolverSettings::new().set_max_rewrite_iterations(7);
        let mut ctx = SolverContext::with_settings(settings);
        let result = (x() + num(1.0)).rewrite_with(&rules, &mut ctx);
        assert_eq!(result, num(1.0) + x());
        assert_eq!(ctx.steps(), 7);
    }
}

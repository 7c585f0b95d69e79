//! # Rule tables
//!
//! Ordered `(pattern, template)` lists consumed by the rewrite kernel. The tables are data only;
//! order decides which rule fires first at a node.
//!
//! - `simplification_rules()` - algebraic normal form. Built once and shared.
//! - `integration_rules(var)` - linearity and elementary antiderivatives, acting on
//!   `Expr::Integral` nodes of `var`. Nothing here searches; search is the integrator's job.
//! - `differentiation_rules(var)` - one rule per node kind, acting on `Expr::Derivative` nodes.
//!
//! Normal form of the simplifier: negation is written `Neg(x)` rather than `-1 * x`, numeric
//! factors stand to the left of a product and merge, `1/x^n` becomes `x^(-n)`, reciprocal trig
//! functions are expanded to `sin`/`cos`. Pairs of rules that could undo each other are avoided;
//! every rule either removes nodes, folds constants, or moves a constant or a sign outward.

use crate::symbolic::symbolic_engine::Expr;
use crate::symbolic::symbolic_pattern::{Condition, Rule, c, num, p};
use std::sync::LazyLock;

static SIMPLIFICATION_RULES: LazyLock<Vec<Rule>> = LazyLock::new(build_simplification_rules);

fn sin(u: Expr) -> Expr {
    Expr::sin(u.boxed())
}
fn cos(u: Expr) -> Expr {
    Expr::cos(u.boxed())
}
fn tg(u: Expr) -> Expr {
    Expr::tg(u.boxed())
}
fn sinh(u: Expr) -> Expr {
    Expr::sinh(u.boxed())
}
fn cosh(u: Expr) -> Expr {
    Expr::cosh(u.boxed())
}

/// Table used by `Expr::simplify`.
pub fn simplification_rules() -> &'static [Rule] {
    &SIMPLIFICATION_RULES
}

fn build_simplification_rules() -> Vec<Rule> {
    let (u, w, s, t) = (p("u"), p("w"), p("s"), p("t"));
    let (a, b) = (c("a"), c("b"));
    vec![
        // identities
        Rule::new("add_zero_right", u.clone() + num(0.0), u.clone()),
        Rule::new("add_zero_left", num(0.0) + u.clone(), u.clone()),
        Rule::new("sub_zero", u.clone() - num(0.0), u.clone()),
        Rule::new("sub_from_zero", num(0.0) - u.clone(), -u.clone()),
        Rule::new("sub_self", u.clone() - u.clone(), num(0.0)),
        Rule::new("mul_zero_right", u.clone() * num(0.0), num(0.0)),
        Rule::new("mul_zero_left", num(0.0) * u.clone(), num(0.0)),
        Rule::new("mul_one_right", u.clone() * num(1.0), u.clone()),
        Rule::new("mul_one_left", num(1.0) * u.clone(), u.clone()),
        Rule::new("div_one", u.clone() / num(1.0), u.clone()),
        Rule::new("zero_div", num(0.0) / u.clone(), num(0.0)).when(Condition::NotZero("u")),
        Rule::new("div_self", u.clone() / u.clone(), num(1.0)).when(Condition::NotZero("u")),
        Rule::new("pow_one", u.clone().pow(num(1.0)), u.clone()),
        Rule::new("pow_zero", u.clone().pow(num(0.0)), num(1.0)),
        Rule::new("one_pow", num(1.0).pow(u.clone()), num(1.0)),
        // signs
        Rule::new("neg_const", -a.clone(), num(-1.0) * a.clone()),
        Rule::new("neg_neg", -(-u.clone()), u.clone()),
        Rule::new("mul_minus_one_left", num(-1.0) * u.clone(), -u.clone()),
        Rule::new("mul_minus_one_right", u.clone() * num(-1.0), -u.clone()),
        Rule::new("neg_scaled", -(a.clone() * u.clone()), (num(-1.0) * a.clone()) * u.clone()),
        Rule::new("const_mul_neg", a.clone() * -u.clone(), (num(-1.0) * a.clone()) * u.clone()),
        Rule::new("mul_neg_left", -u.clone() * w.clone(), -(u.clone() * w.clone())),
        Rule::new("mul_neg_right", u.clone() * -w.clone(), -(u.clone() * w.clone())),
        Rule::new("div_neg_num", -u.clone() / w.clone(), -(u.clone() / w.clone())),
        Rule::new("add_neg", u.clone() + -w.clone(), u.clone() - w.clone()),
        Rule::new("neg_add", -u.clone() + w.clone(), w.clone() - u.clone()),
        Rule::new("sub_neg", u.clone() - -w.clone(), u.clone() + w.clone()),
        Rule::new("neg_sub", -u.clone() - w.clone(), -(u.clone() + w.clone())),
        // numeric factors to the left
        Rule::new("mul_const_right", u.clone() * a.clone(), a.clone() * u.clone())
            .when(Condition::NotConst("u")),
        Rule::new(
            "mul_const_merge",
            a.clone() * (b.clone() * u.clone()),
            (a.clone() * b.clone()) * u.clone(),
        ),
        Rule::new(
            "mul_lift_right",
            u.clone() * (a.clone() * w.clone()),
            a.clone() * (u.clone() * w.clone()),
        )
        .when(Condition::NotConst("u")),
        Rule::new(
            "mul_lift_left",
            (a.clone() * u.clone()) * w.clone(),
            a.clone() * (u.clone() * w.clone()),
        ),
        Rule::new(
            "div_const_num",
            (a.clone() * u.clone()) / b.clone(),
            (a.clone() / b.clone()) * u.clone(),
        )
        .when(Condition::NotZero("b")),
        // cancellation
        Rule::new("div_cancel_num", (a.clone() * u.clone()) / u.clone(), a.clone())
            .when(Condition::NotZero("u")),
        Rule::new("div_cancel_den", u.clone() / (a.clone() * u.clone()), num(1.0) / a.clone())
            .when(Condition::NotZero("u")),
        Rule::new(
            "div_cancel_both",
            (a.clone() * u.clone()) / (b.clone() * u.clone()),
            a.clone() / b.clone(),
        )
        .when(Condition::NotZero("u")),
        Rule::new("mul_reciprocal_right", u.clone() * (num(1.0) / u.clone()), num(1.0)),
        Rule::new("mul_reciprocal_left", (num(1.0) / u.clone()) * u.clone(), num(1.0)),
        Rule::new("add_sub_cancel_left", (u.clone() + w.clone()) - u.clone(), w.clone()),
        Rule::new("add_sub_cancel_right", (u.clone() + w.clone()) - w.clone(), u.clone()),
        // products of fractions
        Rule::new(
            "mul_div_div",
            (u.clone() / w.clone()) * (s.clone() / t.clone()),
            (u.clone() * s.clone()) / (w.clone() * t.clone()),
        ),
        Rule::new(
            "mul_div_right",
            u.clone() * (w.clone() / s.clone()),
            (u.clone() * w.clone()) / s.clone(),
        ),
        Rule::new(
            "mul_div_left",
            (u.clone() / w.clone()) * s.clone(),
            (u.clone() * s.clone()) / w.clone(),
        ),
        Rule::new(
            "div_by_div",
            u.clone() / (w.clone() / s.clone()),
            (u.clone() * s.clone()) / w.clone(),
        ),
        Rule::new(
            "div_div",
            (u.clone() / w.clone()) / s.clone(),
            u.clone() / (w.clone() * s.clone()),
        ),
        // powers of a common base
        Rule::new("mul_same", u.clone() * u.clone(), u.clone().pow(num(2.0))),
        Rule::new(
            "mul_pow_base",
            u.clone().pow(a.clone()) * u.clone(),
            u.clone().pow(a.clone() + num(1.0)),
        ),
        Rule::new(
            "mul_base_pow",
            u.clone() * u.clone().pow(a.clone()),
            u.clone().pow(a.clone() + num(1.0)),
        ),
        Rule::new(
            "mul_pow_pow",
            u.clone().pow(a.clone()) * u.clone().pow(b.clone()),
            u.clone().pow(a.clone() + b.clone()),
        ),
        Rule::new(
            "div_pow_base",
            u.clone().pow(a.clone()) / u.clone(),
            u.clone().pow(a.clone() - num(1.0)),
        )
        .when(Condition::NotZero("u")),
        Rule::new(
            "div_base_pow",
            u.clone() / u.clone().pow(a.clone()),
            u.clone().pow(num(1.0) - a.clone()),
        )
        .when(Condition::NotZero("u")),
        Rule::new(
            "div_pow_pow",
            u.clone().pow(a.clone()) / u.clone().pow(b.clone()),
            u.clone().pow(a.clone() - b.clone()),
        ),
        Rule::new(
            "div_pow_scaled",
            u.clone().pow(a.clone()) / (b.clone() * u.clone()),
            (num(1.0) / b.clone()) * u.clone().pow(a.clone() - num(1.0)),
        )
        .when(Condition::NotZero("u")),
        Rule::new(
            "pow_pow",
            u.clone().pow(w.clone()).pow(s.clone()),
            u.clone().pow(w.clone() * s.clone()),
        ),
        Rule::new(
            "recip_pow",
            num(1.0) / u.clone().pow(w.clone()),
            u.clone().pow(num(-1.0) * w.clone()),
        ),
        Rule::new(
            "pow_recip",
            (num(1.0) / u.clone()).pow(w.clone()),
            u.clone().pow(num(-1.0) * w.clone()),
        ),
        // like terms
        Rule::new("add_same", u.clone() + u.clone(), num(2.0) * u.clone()),
        Rule::new(
            "add_scaled_same_left",
            (a.clone() * u.clone()) + u.clone(),
            (a.clone() + num(1.0)) * u.clone(),
        ),
        Rule::new(
            "add_scaled_same_right",
            u.clone() + (a.clone() * u.clone()),
            (a.clone() + num(1.0)) * u.clone(),
        ),
        Rule::new(
            "add_scaled_both",
            (a.clone() * u.clone()) + (b.clone() * u.clone()),
            (a.clone() + b.clone()) * u.clone(),
        ),
        Rule::new(
            "sub_scaled_same_left",
            (a.clone() * u.clone()) - u.clone(),
            (a.clone() - num(1.0)) * u.clone(),
        ),
        Rule::new(
            "sub_scaled_same_right",
            u.clone() - (a.clone() * u.clone()),
            (num(1.0) - a.clone()) * u.clone(),
        ),
        Rule::new(
            "sub_scaled_both",
            (a.clone() * u.clone()) - (b.clone() * u.clone()),
            (a.clone() - b.clone()) * u.clone(),
        ),
        // exponential and logarithm
        Rule::new("exp_ln", u.clone().ln().exp(), u.clone()),
        Rule::new("ln_exp", u.clone().exp().ln(), u.clone()),
        Rule::new("ln_one", num(1.0).ln(), num(0.0)),
        Rule::new("exp_zero", num(0.0).exp(), num(1.0)),
        // values at zero
        Rule::new("sin_zero", sin(num(0.0)), num(0.0)),
        Rule::new("cos_zero", cos(num(0.0)), num(1.0)),
        Rule::new("tg_zero", tg(num(0.0)), num(0.0)),
        Rule::new("sinh_zero", sinh(num(0.0)), num(0.0)),
        Rule::new("cosh_zero", cosh(num(0.0)), num(1.0)),
        Rule::new("arcsin_zero", Expr::arcsin(num(0.0).boxed()), num(0.0)),
        Rule::new("arctg_zero", Expr::arctg(num(0.0).boxed()), num(0.0)),
        // trigonometry
        Rule::new("sec_recip", Expr::sec(u.clone().boxed()), num(1.0) / cos(u.clone())),
        Rule::new("csc_recip", Expr::csc(u.clone().boxed()), num(1.0) / sin(u.clone())),
        Rule::new("ctg_ratio", Expr::ctg(u.clone().boxed()), cos(u.clone()) / sin(u.clone())),
        Rule::new("tg_ratio", sin(u.clone()) / cos(u.clone()), tg(u.clone())),
        Rule::new(
            "tg_sq_plus_one",
            tg(u.clone()).pow(num(2.0)) + num(1.0),
            num(1.0) / cos(u.clone()).pow(num(2.0)),
        ),
        Rule::new(
            "one_plus_tg_sq",
            num(1.0) + tg(u.clone()).pow(num(2.0)),
            num(1.0) / cos(u.clone()).pow(num(2.0)),
        ),
        Rule::new(
            "pythagorean",
            sin(u.clone()).pow(num(2.0)) + cos(u.clone()).pow(num(2.0)),
            num(1.0),
        ),
        Rule::new(
            "pythagorean_rev",
            cos(u.clone()).pow(num(2.0)) + sin(u.clone()).pow(num(2.0)),
            num(1.0),
        ),
    ]
}

/// Linearity and elementary antiderivatives with respect to `var`.
pub fn integration_rules(var: &str) -> Vec<Rule> {
    let x = Expr::var(var);
    let int = |e: Expr| Expr::integral(e, var);
    let free = |name: &'static str| Condition::FreeOf(name, var.to_string());
    let (u, w, k) = (p("u"), p("w"), p("k"));
    let (a, n) = (c("a"), c("n"));
    // 1/sqrt(a), folded by the kernel once `a` is bound
    let inv_root = || num(1.0) / a.clone().pow(num(0.5));
    let scaled = || x.clone() / a.clone().pow(num(0.5));
    vec![
        Rule::new("int_zero", int(num(0.0)), num(0.0)),
        Rule::new("int_const", int(k.clone()), k.clone() * x.clone()).when(free("k")),
        // linearity
        Rule::new("int_sum", int(u.clone() + w.clone()), int(u.clone()) + int(w.clone())),
        Rule::new("int_diff", int(u.clone() - w.clone()), int(u.clone()) - int(w.clone())),
        Rule::new("int_neg", int(-u.clone()), -int(u.clone())),
        Rule::new(
            "int_scaled_left",
            int(k.clone() * u.clone()),
            k.clone() * int(u.clone()),
        )
        .when(free("k")),
        Rule::new(
            "int_scaled_right",
            int(u.clone() * k.clone()),
            k.clone() * int(u.clone()),
        )
        .when(free("k")),
        Rule::new("int_reciprocal", int(num(1.0) / x.clone()), x.clone().ln()),
        Rule::new("int_scaled_reciprocal", int(k.clone() / x.clone()), k.clone() * x.clone().ln())
            .when(free("k")),
        Rule::new(
            "int_div_const",
            int(u.clone() / k.clone()),
            int(u.clone()) / k.clone(),
        )
        .when(free("k")),
        // powers
        Rule::new("int_var", int(x.clone()), x.clone().pow(num(2.0)) / num(2.0)),
        Rule::new("int_pow_minus_one", int(x.clone().pow(num(-1.0))), x.clone().ln()),
        Rule::new(
            "int_power",
            int(x.clone().pow(n.clone())),
            x.clone().pow(n.clone() + num(1.0)) / (n.clone() + num(1.0)),
        )
        .when(Condition::ConstNot("n", -1.0)),
        Rule::new(
            "int_const_base",
            int(a.clone().pow(x.clone())),
            a.clone().pow(x.clone()) / a.clone().ln(),
        )
        .when(Condition::ConstNot("a", 1.0)),
        // exponential and trigonometric seeds
        Rule::new("int_exp", int(x.clone().exp()), x.clone().exp()),
        Rule::new(
            "int_exp_linear",
            int((a.clone() * x.clone()).exp()),
            (a.clone() * x.clone()).exp() / a.clone(),
        )
        .when(Condition::NotZero("a")),
        Rule::new("int_sin", int(sin(x.clone())), -cos(x.clone())),
        Rule::new("int_cos", int(cos(x.clone())), sin(x.clone())),
        Rule::new("int_sinh", int(sinh(x.clone())), cosh(x.clone())),
        Rule::new("int_cosh", int(cosh(x.clone())), sinh(x.clone())),
        Rule::new("int_sec_sq", int(cos(x.clone()).pow(num(-2.0))), tg(x.clone())),
        Rule::new("int_sec_sq_raw", int(Expr::sec(x.clone().boxed()).pow(num(2.0))), tg(x.clone())),
        // inverse trigonometric forms
        Rule::new(
            "int_arctg_form",
            int(num(1.0) / (a.clone() + x.clone().pow(num(2.0)))),
            inv_root() * Expr::arctg(scaled().boxed()),
        )
        .when(Condition::NotZero("a")),
        Rule::new(
            "int_arctg_form_rev",
            int(num(1.0) / (x.clone().pow(num(2.0)) + a.clone())),
            inv_root() * Expr::arctg(scaled().boxed()),
        )
        .when(Condition::NotZero("a")),
        Rule::new(
            "int_arcsin_form",
            int((a.clone() - x.clone().pow(num(2.0))).pow(num(-0.5))),
            Expr::arcsin(scaled().boxed()),
        )
        .when(Condition::NotZero("a")),
        Rule::new(
            "int_arcsin_form_raw",
            int(num(1.0) / (a.clone() - x.clone().pow(num(2.0))).pow(num(0.5))),
            Expr::arcsin(scaled().boxed()),
        )
        .when(Condition::NotZero("a")),
    ]
}

/// One rule per node kind for `Derivative` nodes of `var`.
pub fn differentiation_rules(var: &str) -> Vec<Rule> {
    let x = Expr::var(var);
    let d = |e: Expr| Expr::derivative(e, var);
    let (u, w) = (p("u"), p("w"));
    let (a, n) = (c("a"), c("n"));
    let du = || d(u.clone());
    let one_minus_sq = || num(1.0) - u.clone().pow(num(2.0));
    let one_plus_sq = || num(1.0) + u.clone().pow(num(2.0));
    let sq_minus_one = || u.clone().pow(num(2.0)) - num(1.0);
    let abs_u = || Expr::Abs(u.clone().boxed());
    vec![
        Rule::new("d_free", du(), num(0.0)).when(Condition::FreeOf("u", var.to_string())),
        Rule::new("d_var", d(x.clone()), num(1.0)),
        // linearity
        Rule::new("d_sum", d(u.clone() + w.clone()), du() + d(w.clone())),
        Rule::new("d_diff", d(u.clone() - w.clone()), du() - d(w.clone())),
        Rule::new("d_neg", d(-u.clone()), -du()),
        Rule::new("d_scaled", d(a.clone() * u.clone()), a.clone() * du()),
        Rule::new("d_div_const", d(u.clone() / a.clone()), du() / a.clone()),
        // products and quotients
        Rule::new(
            "d_product",
            d(u.clone() * w.clone()),
            du() * w.clone() + u.clone() * d(w.clone()),
        ),
        Rule::new(
            "d_quotient",
            d(u.clone() / w.clone()),
            (du() * w.clone() - u.clone() * d(w.clone())) / w.clone().pow(num(2.0)),
        ),
        // powers
        Rule::new(
            "d_power",
            d(u.clone().pow(n.clone())),
            n.clone() * (u.clone().pow(n.clone() - num(1.0)) * du()),
        ),
        Rule::new(
            "d_const_base",
            d(a.clone().pow(w.clone())),
            a.clone().pow(w.clone()) * (a.clone().ln() * d(w.clone())),
        ),
        Rule::new(
            "d_general_power",
            d(u.clone().pow(w.clone())),
            u.clone().pow(w.clone())
                * (d(w.clone()) * u.clone().ln() + w.clone() * (du() / u.clone())),
        ),
        // elementary functions
        Rule::new("d_exp", d(u.clone().exp()), u.clone().exp() * du()),
        Rule::new("d_ln", d(u.clone().ln()), du() / u.clone()),
        Rule::new("d_sin", d(sin(u.clone())), cos(u.clone()) * du()),
        Rule::new("d_cos", d(cos(u.clone())), -(sin(u.clone()) * du())),
        Rule::new("d_tg", d(tg(u.clone())), du() / cos(u.clone()).pow(num(2.0))),
        Rule::new(
            "d_sec",
            d(Expr::sec(u.clone().boxed())),
            Expr::sec(u.clone().boxed()) * (tg(u.clone()) * du()),
        ),
        Rule::new(
            "d_csc",
            d(Expr::csc(u.clone().boxed())),
            -(Expr::csc(u.clone().boxed()) * (Expr::ctg(u.clone().boxed()) * du())),
        ),
        Rule::new("d_ctg", d(Expr::ctg(u.clone().boxed())), -(du() / sin(u.clone()).pow(num(2.0)))),
        Rule::new("d_sinh", d(sinh(u.clone())), cosh(u.clone()) * du()),
        Rule::new("d_cosh", d(cosh(u.clone())), sinh(u.clone()) * du()),
        Rule::new(
            "d_tanh",
            d(Expr::tanh(u.clone().boxed())),
            du() / cosh(u.clone()).pow(num(2.0)),
        ),
        Rule::new(
            "d_sech",
            d(Expr::sech(u.clone().boxed())),
            -(Expr::sech(u.clone().boxed()) * (Expr::tanh(u.clone().boxed()) * du())),
        ),
        Rule::new(
            "d_csch",
            d(Expr::csch(u.clone().boxed())),
            -(Expr::csch(u.clone().boxed()) * (Expr::coth(u.clone().boxed()) * du())),
        ),
        Rule::new(
            "d_coth",
            d(Expr::coth(u.clone().boxed())),
            -(du() / sinh(u.clone()).pow(num(2.0))),
        ),
        Rule::new(
            "d_arcsin",
            d(Expr::arcsin(u.clone().boxed())),
            du() / one_minus_sq().pow(num(0.5)),
        ),
        Rule::new(
            "d_arccos",
            d(Expr::arccos(u.clone().boxed())),
            -(du() / one_minus_sq().pow(num(0.5))),
        ),
        Rule::new("d_arctg", d(Expr::arctg(u.clone().boxed())), du() / one_plus_sq()),
        Rule::new("d_arcctg", d(Expr::arcctg(u.clone().boxed())), -(du() / one_plus_sq())),
        Rule::new(
            "d_arcsec",
            d(Expr::arcsec(u.clone().boxed())),
            du() / (abs_u() * sq_minus_one().pow(num(0.5))),
        ),
        Rule::new(
            "d_arccsc",
            d(Expr::arccsc(u.clone().boxed())),
            -(du() / (abs_u() * sq_minus_one().pow(num(0.5)))),
        ),
        Rule::new("d_abs", d(abs_u()), (u.clone() * du()) / abs_u()),
        Rule::new("d_integral", d(Expr::integral(u.clone(), var)), u.clone()),
    ]
}

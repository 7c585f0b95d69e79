use RustedCalculus::symbolic::symbolic_engine::Expr;
use RustedCalculus::symbolic::symbolic_ode::OdeSolver;
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn integrands() -> Vec<(&'static str, Expr)> {
    let x = Expr::var("x");
    vec![
        ("polynomial", x.clone().pow(Expr::Const(3.0)) + Expr::Const(2.0) * x.clone()),
        ("u-substitution", x.clone() * x.clone().pow(Expr::Const(2.0)).exp()),
        ("by parts", x.clone().pow(Expr::Const(3.0)) * x.clone().exp()),
        ("log by parts", x.clone().pow(Expr::Const(2.0)) * x.clone().ln()),
        ("unsolved", x.clone().pow(Expr::Const(2.0)).exp()),
    ]
}

fn bench_integration(c: &mut Criterion) {
    let mut group = c.benchmark_group("integration");
    for (name, f) in integrands() {
        group.bench_function(name, |b| b.iter(|| black_box(&f).integrate("x")));
    }
    group.finish();
}

fn bench_simplify_and_diff(c: &mut Criterion) {
    let x = Expr::var("x");
    let f = Expr::sin(x.clone().pow(Expr::Const(2.0)).boxed()) / (x.clone() + Expr::Const(1.0));
    c.bench_function("diff quotient", |b| b.iter(|| black_box(&f).diff("x")));
    let g = (x.clone() * Expr::Const(2.0)) * (Expr::Const(1.0) / x.pow(Expr::Const(3.0)));
    c.bench_function("simplify", |b| b.iter(|| black_box(&g).simplify()));
}

fn bench_ode(c: &mut Criterion) {
    let (x, y) = (Expr::var("x"), Expr::var("y"));
    let ode = Expr::derivative(y.clone(), "x") - x * y;
    let solver = OdeSolver::new("x", "y");
    c.bench_function("separable ode", |b| b.iter(|| solver.solve(black_box(&ode))));
}

criterion_group!(benches, bench_integration, bench_simplify_and_diff, bench_ode);
criterion_main!(benches);

#![allow(non_snake_case)]
use RustedCalculus::Utils::logger::init_logger;
use RustedCalculus::symbolic::symbolic_context::{SolverContext, SolverSettings};
use RustedCalculus::symbolic::symbolic_engine::Expr;
use RustedCalculus::symbolic::symbolic_ode::OdeSolver;
use RustedCalculus::symbols;

fn main() {
    let example = 2;
    if let Err(err) = init_logger(SolverSettings::default().loglevel, false) {
        eprintln!("{}", err);
    }
    match example {
        0 => {
            // DIFFERENTIATION
            let (x, y) = symbols!(x, y);
            let f = x.clone().pow(Expr::Const(2.0)).exp() * Expr::sin(y.clone().boxed());
            let df_dx = f.diff("x");
            let df_dy = f.diff("y");
            println!("f = {}", f);
            println!("df_dx = {}, df_dy = {}", df_dx, df_dy);
            // derivatives of higher order
            let g = x.clone().pow(Expr::Const(5.0)) + Expr::cos(x.boxed());
            for n in 1..4 {
                println!("d^{} g/dx^{} = {}", n, n, g.n_th_derivative1D("x", n));
            }
            match df_dx.eval_expression(&["x", "y"], &[0.5, 1.0]) {
                Ok(value) => println!("df_dx(0.5, 1.0) = {}", value),
                Err(err) => println!("evaluation failed: {}", err),
            }
        }
        1 => {
            // SIMPLIFICATION
            let x = Expr::var("x");
            let samples = vec![
                Expr::Const(1.0) / x.clone().pow(Expr::Const(3.0)),
                x.clone() * Expr::Const(2.0) * Expr::Const(3.0),
                Expr::sin(x.clone().boxed()) / Expr::cos(x.clone().boxed()),
                Expr::tg(x.clone().boxed()).pow(Expr::Const(2.0)) + Expr::Const(1.0),
                x.clone().exp().ln(),
            ];
            for expr in samples {
                println!("{}  ->  {}", expr, expr.simplify());
            }
        }
        2 => {
            // INDEFINITE INTEGRATION
            let x = Expr::var("x");
            let integrands = vec![
                x.clone().pow(Expr::Const(3.0)),
                Expr::Const(1.0) / x.clone(),
                x.clone() * x.clone().pow(Expr::Const(2.0)).exp(),
                Expr::cos(x.clone().boxed()) * Expr::sin(x.clone().boxed()),
                x.clone() * x.clone().exp(),
                x.clone().pow(Expr::Const(2.0)) * x.clone().ln(),
                Expr::Const(1.0) / (Expr::Const(4.0) + x.clone().pow(Expr::Const(2.0))),
                // has no elementary antiderivative, comes back unsolved
                x.clone().pow(Expr::Const(2.0)).exp(),
            ];
            for f in integrands {
                let mut ctx = SolverContext::new();
                let F = f.integrate_with("x", &mut ctx);
                println!("integral of {} dx = {}   ({} steps)", f, F, ctx.steps());
            }
        }
        3 => {
            // DEPTH CEILING AND TRACE
            let x = Expr::var("x");
            let f = x.clone().pow(Expr::Const(3.0)) * x.exp();
            let settings = SolverSettings::new().set_max_depth(3);
            let mut ctx = SolverContext::with_settings(settings);
            let F = f.integrate_with("x", &mut ctx);
            println!("integral of {} dx with max_depth 3 = {}", f, F);
            for step in ctx.trace() {
                println!("{:>4} [depth {}] {}", step.step, step.depth, step.message);
            }
            let mut ctx = SolverContext::new();
            let F = f.integrate_with("x", &mut ctx);
            println!("integral of {} dx with default depth = {}", f, F);
        }
        4 => {
            // DEFINITE INTEGRAL
            let x = Expr::var("x");
            let f = x.clone() * Expr::sin(x.boxed());
            match f.definite_integrate("x", 0.0, std::f64::consts::PI) {
                Ok(value) => println!("integral of {} from 0 to pi = {}", f, value),
                Err(err) => println!("failed: {}", err),
            }
        }
        5 => {
            // FIRST ORDER ODE
            let (x, y) = symbols!(x, y);
            let dy = Expr::derivative(y.clone(), "x");
            let odes = vec![
                dy.clone() - x.clone().pow(Expr::Const(2.0)),
                dy.clone() - x.clone() * y.clone(),
                dy.clone() - x.clone() / y.clone().pow(Expr::Const(2.0)),
                dy.clone() + y.clone() - x.clone(),
                x.clone() * y.clone() * dy.clone()
                    - (x.clone().pow(Expr::Const(2.0)) + y.clone().pow(Expr::Const(2.0))),
            ];
            let solver = OdeSolver::new("x", "y");
            for ode in odes {
                let mut ctx = SolverContext::new();
                match solver.solve_with(&ode, &mut ctx) {
                    Ok(solution) => {
                        println!("{} = 0:   {}   ({} steps)", ode, solution, ctx.steps())
                    }
                    Err(err) => println!("{} = 0: {}", ode, err),
                }
            }
        }
        6 => {
            // SETTINGS FROM A DOCUMENT
            let document = "solver\nmax_depth: 10\nrecord_trace: true\nloglevel: debug\n";
            match SolverSettings::from_document(document) {
                Ok(settings) => println!("{:?}", settings),
                Err(err) => println!("{}", err),
            }
        }
        _ => {
            println!("example {} is not defined", example);
        }
    }
}

//! Sequential quadratic programming over the lifted problem.
//!
//! All constraints are linear, so each subproblem linearizes exactly and a
//! step from an infeasible point lands on the feasible set. From a feasible
//! point steps are damped by an Armijo backtracking search on the objective.

use super::qp::{QpProblem, QpStatus, QpWorkspace, solve_qp};
use crate::SolverSettings;
use crate::objective::ObjectiveFunction;
use crate::problem::LiftedProblem;
use ndarray::{Array1, Array2, s};
use tracing::{debug, trace};

/// Constraint violation treated as feasible.
const FEASIBILITY_TOLERANCE: f64 = 1e-7;
/// Steps shorter than this end the iteration.
const STEP_TOLERANCE: f64 = 1e-10;
/// A failed line search is accepted as convergence below this step length.
const LINESEARCH_STEP_TOLERANCE: f64 = 1e-6;
const ARMIJO_C: f64 = 1e-4;
const MAX_BACKTRACKS: usize = 30;
/// Residual at which a QP that hit its iteration cap is still usable.
const QP_ACCEPTABLE_RESIDUAL: f64 = 1e-6;

pub(crate) const MSG_SUCCESS: &str = "Optimization terminated successfully";
pub(crate) const MSG_INCOMPATIBLE: &str = "Inequality constraints incompatible";
pub(crate) const MSG_LINESEARCH: &str = "Positive directional derivative for linesearch";
pub(crate) const MSG_ITERATION_LIMIT: &str = "Iteration limit reached";
pub(crate) const MSG_QP_BUDGET: &str = "QP iteration budget exhausted";

/// Outcome of an SQP run.
///
/// `converged == false` carries the failure in `message`; `x` is then the
/// last iterate and should not be used as a solution.
#[derive(Debug, Clone)]
pub(crate) struct SqpReport {
    pub(crate) x: Array1<f64>,
    pub(crate) iterations: usize,
    pub(crate) converged: bool,
    pub(crate) message: String,
}

impl SqpReport {
    fn success(x: Array1<f64>, iterations: usize) -> Self {
        Self {
            x,
            iterations,
            converged: true,
            message: MSG_SUCCESS.to_string(),
        }
    }

    fn failure(x: Array1<f64>, iterations: usize, message: impl Into<String>) -> Self {
        Self {
            x,
            iterations,
            converged: false,
            message: message.into(),
        }
    }
}

fn inf_norm(v: &Array1<f64>) -> f64 {
    v.iter().fold(0.0, |acc, x| acc.max(x.abs()))
}

/// Damped BFGS update of `b` with step `s` and gradient change `y`.
///
/// The damping keeps `b` positive definite when `sᵀy` is small or negative.
fn damped_bfgs_update(b: &mut Array2<f64>, s: &Array1<f64>, y: &Array1<f64>) {
    let bs = b.dot(s);
    let s_bs = s.dot(&bs);
    if s_bs <= f64::EPSILON {
        return;
    }
    let s_y = s.dot(y);
    let r = if s_y >= 0.2 * s_bs {
        y.clone()
    } else {
        let theta = 0.8 * s_bs / (s_bs - s_y);
        y * theta + &bs * (1.0 - theta)
    };
    let s_r = s.dot(&r);
    if s_r <= f64::EPSILON {
        return;
    }

    let n = s.len();
    for i in 0..n {
        for j in 0..n {
            b[[i, j]] += r[i] * r[j] / s_r - bs[i] * bs[j] / s_bs;
        }
    }
}

struct Iterate {
    x: Array1<f64>,
    w: Array1<f64>,
    value: f64,
    gradient: Array1<f64>,
}

impl Iterate {
    fn at(problem: &LiftedProblem, objective: &dyn ObjectiveFunction, x: Array1<f64>) -> Self {
        let w = problem.weights(&x);
        let value = objective.value(&w);
        let gradient = objective.gradient(&w);
        Self {
            x,
            w,
            value,
            gradient,
        }
    }
}

/// Minimize `objective` over the weight block of `problem`.
pub(crate) fn minimize(
    problem: &LiftedProblem,
    objective: &dyn ObjectiveFunction,
    settings: &SolverSettings,
) -> SqpReport {
    let x0 = problem.initial_point();
    if problem.has_crossed_bounds(FEASIBILITY_TOLERANCE) {
        return SqpReport::failure(x0, 0, MSG_INCOMPATIBLE);
    }

    let n = problem.n_assets;
    let n_vars = problem.n_vars();
    let m = problem.a.nrows();

    let mut stacked = Array2::<f64>::zeros((m + n_vars, n_vars));
    stacked.slice_mut(s![..m, ..]).assign(&problem.a);
    stacked
        .slice_mut(s![m.., ..])
        .assign(&Array2::<f64>::eye(n_vars));

    let exact_hessian = objective.hessian();
    let mut bfgs = Array2::<f64>::eye(n);
    let mut p = Array2::<f64>::zeros((n_vars, n_vars));

    let mut current = Iterate::at(problem, objective, x0);
    let mut workspace = QpWorkspace::with_budget(settings.qp.iteration_budget);

    for iteration in 1..=settings.max_iterations {
        p.slice_mut(s![..n, ..n])
            .assign(exact_hessian.as_ref().unwrap_or(&bfgs));
        let mut q = Array1::<f64>::zeros(n_vars);
        q.slice_mut(s![..n]).assign(&current.gradient);

        let ax = problem.a.dot(&current.x);
        let mut l = Array1::<f64>::zeros(m + n_vars);
        let mut u = Array1::<f64>::zeros(m + n_vars);
        l.slice_mut(s![..m]).assign(&(&problem.row_lower - &ax));
        u.slice_mut(s![..m]).assign(&(&problem.row_upper - &ax));
        l.slice_mut(s![m..]).assign(&(&problem.lower - &current.x));
        u.slice_mut(s![m..]).assign(&(&problem.upper - &current.x));

        let subproblem = QpProblem {
            p: &p,
            q: &q,
            c: &stacked,
            l: &l,
            u: &u,
        };
        let qp = match solve_qp(&subproblem, &settings.qp, &mut workspace) {
            Ok(qp) => qp,
            Err(err) => {
                return SqpReport::failure(
                    current.x,
                    iteration,
                    format!("QP subproblem could not be solved: {err}"),
                );
            }
        };
        trace!(iteration, qp_iterations = qp.iterations, "solved QP subproblem");

        match qp.status {
            QpStatus::Solved => {}
            QpStatus::PrimalInfeasible => {
                return SqpReport::failure(current.x, iteration, MSG_INCOMPATIBLE);
            }
            QpStatus::MaxIterations if qp.primal_residual <= QP_ACCEPTABLE_RESIDUAL => {
                debug!(
                    iteration,
                    residual = qp.primal_residual,
                    "QP subproblem stopped unpolished; using approximate step"
                );
            }
            QpStatus::MaxIterations if workspace.exhausted() => {
                return SqpReport::failure(current.x, iteration, MSG_QP_BUDGET);
            }
            QpStatus::MaxIterations => {
                return SqpReport::failure(
                    current.x,
                    iteration,
                    "QP subproblem did not converge",
                );
            }
        }

        let d = qp.x;
        let step_norm = inf_norm(&d);
        let violation = problem.violation(&current.x);
        let directional = q.dot(&d);

        if step_norm < STEP_TOLERANCE
            || (violation <= FEASIBILITY_TOLERANCE && directional >= -settings.ftol)
        {
            return SqpReport::success(current.x, iteration);
        }

        let step = if violation > FEASIBILITY_TOLERANCE {
            1.0
        } else {
            let mut step = 1.0;
            let mut accepted = false;
            for _ in 0..MAX_BACKTRACKS {
                let trial = problem.weights(&(&current.x + &(&d * step)));
                if objective.value(&trial) <= current.value + ARMIJO_C * step * directional {
                    accepted = true;
                    break;
                }
                step *= 0.5;
            }
            if !accepted {
                if step_norm < LINESEARCH_STEP_TOLERANCE {
                    return SqpReport::success(current.x, iteration);
                }
                return SqpReport::failure(current.x, iteration, MSG_LINESEARCH);
            }
            step
        };

        let next = Iterate::at(problem, objective, &current.x + &(&d * step));

        if exact_hessian.is_none() {
            let s = &next.w - &current.w;
            let y = &next.gradient - &current.gradient;
            damped_bfgs_update(&mut bfgs, &s, &y);
        }

        let change = (next.value - current.value).abs();
        let next_violation = problem.violation(&next.x);
        current = next;
        if change < settings.ftol && next_violation <= FEASIBILITY_TOLERANCE {
            return SqpReport::success(current.x, iteration);
        }
    }

    SqpReport::failure(current.x, settings.max_iterations, MSG_ITERATION_LIMIT)
}

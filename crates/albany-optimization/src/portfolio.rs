//! Optimization entry points.
//!
//! Every entry point validates its request, runs the feasibility pre-check and
//! only then calls the solver. Infeasibility from either step is returned as
//! [`SolverResult::Infeasible`]; only invalid input is an `Err`.

use crate::explain::explain_solution;
use crate::objective::{NegativeSharpeObjective, ObjectiveFunction, PortfolioVarianceObjective};
use crate::problem::LiftedProblem;
use crate::solver::{SqpReport, minimize};
use crate::{
    Feasibility, OptimizationError, OptimizationRequest, PortfolioSolution, Result, SolverMeta,
    SolverResult, check_feasibility,
};
use albany_math::{effective_n, herfindahl, portfolio_variance};
use ndarray::Array1;
use tracing::debug;

/// Default number of points on the efficient frontier.
pub const DEFAULT_FRONTIER_POINTS: usize = 20;

/// Zero out negligible weights and renormalize to a unit sum.
///
/// Long-only clips everything below `tolerance` (including small negatives
/// left by the solver); long-short zeroes values within `±tolerance`.
pub fn clean_weights(weights: &Array1<f64>, long_only: bool, tolerance: f64) -> Array1<f64> {
    let mut cleaned = if long_only {
        weights.mapv(|w| if w < tolerance { 0.0 } else { w })
    } else {
        weights.mapv(|w| if w.abs() < tolerance { 0.0 } else { w })
    };
    let total = cleaned.sum();
    if total.abs() > tolerance {
        cleaned /= total;
    }
    cleaned
}

fn failure_reason(report: &SqpReport, target_return: Option<f64>) -> String {
    match target_return {
        Some(target) => format!(
            "No feasible solution at target return {:.2}% given the active constraints: {}",
            target * 100.0,
            report.message
        ),
        None => format!("Solver did not converge: {}", report.message),
    }
}

fn solve(
    request: &OptimizationRequest<'_>,
    objective: &dyn ObjectiveFunction,
    target_return: Option<f64>,
    risk_free_rate: Option<f64>,
) -> Result<SolverResult> {
    let problem = LiftedProblem::build(request, target_return)?;
    let report = minimize(&problem, objective, &request.settings);
    debug!(
        iterations = report.iterations,
        converged = report.converged,
        message = %report.message,
        "solver finished"
    );

    if !report.converged {
        return Ok(SolverResult::infeasible(failure_reason(&report, target_return)));
    }

    let tolerance = request.settings.weight_tolerance;
    let weights = clean_weights(
        &problem.weights(&report.x),
        request.constraints.long_only,
        tolerance,
    );

    let expected_return = weights.dot(request.mu);
    let variance = portfolio_variance(&weights, request.sigma);
    let stdev = variance.max(0.0).sqrt();
    let sharpe = risk_free_rate
        .filter(|_| stdev > tolerance)
        .map(|rf| (expected_return - rf) / stdev);
    let hhi = herfindahl(&weights);
    let effective_n = if hhi > tolerance {
        effective_n(hhi)
    } else {
        f64::INFINITY
    };

    let mut solution = PortfolioSolution {
        weights,
        expected_return,
        variance,
        stdev,
        sharpe,
        hhi,
        effective_n,
        explanation: String::new(),
        solver_meta: SolverMeta {
            iterations: report.iterations,
            message: report.message,
            converged: report.converged,
            warnings: problem.warnings,
        },
    };
    solution.explanation =
        explain_solution(&solution, request.constraints, request.assets, tolerance);

    Ok(SolverResult::Feasible(Box::new(solution)))
}

fn precheck(
    request: &OptimizationRequest<'_>,
    target_return: Option<f64>,
    risk_free_rate: Option<f64>,
) -> Option<SolverResult> {
    match check_feasibility(request.mu, target_return, risk_free_rate, request.constraints) {
        Feasibility::Feasible => None,
        Feasibility::Infeasible(reason) => {
            debug!(%reason, "pre-solve feasibility check failed");
            Some(SolverResult::infeasible(reason))
        }
    }
}

fn require_finite(name: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(OptimizationError::InvalidParameter(format!(
            "{name} must be finite, got {value}"
        )))
    }
}

/// Minimum-variance portfolio under the request's constraints.
///
/// # Errors
/// Returns an error when the request fails validation.
pub fn optimize_mvp(request: &OptimizationRequest<'_>) -> Result<SolverResult> {
    request.validate()?;
    if let Some(infeasible) = precheck(request, None, None) {
        return Ok(infeasible);
    }
    solve(
        request,
        &PortfolioVarianceObjective::new(request.sigma),
        None,
        None,
    )
}

/// Minimum-variance portfolio with expected return exactly `target_return`.
///
/// # Errors
/// Returns an error when the request fails validation or the target is not
/// finite.
pub fn optimize_frontier_point(
    request: &OptimizationRequest<'_>,
    target_return: f64,
) -> Result<SolverResult> {
    request.validate()?;
    require_finite("target_return", target_return)?;
    if let Some(infeasible) = precheck(request, Some(target_return), None) {
        return Ok(infeasible);
    }
    solve(
        request,
        &PortfolioVarianceObjective::new(request.sigma),
        Some(target_return),
        None,
    )
}

/// Maximum-Sharpe (tangency) portfolio for `risk_free_rate`.
///
/// # Errors
/// Returns an error when the request fails validation or the rate is not
/// finite.
pub fn optimize_tangency(
    request: &OptimizationRequest<'_>,
    risk_free_rate: f64,
) -> Result<SolverResult> {
    request.validate()?;
    require_finite("risk_free_rate", risk_free_rate)?;
    if let Some(infeasible) = precheck(request, None, Some(risk_free_rate)) {
        return Ok(infeasible);
    }
    solve(
        request,
        &NegativeSharpeObjective::new(request.mu, request.sigma, risk_free_rate),
        None,
        Some(risk_free_rate),
    )
}

/// Efficient frontier from the minimum-variance return up to the largest `μᵢ`.
///
/// The first point is solved as an MVP. An infeasible MVP is returned on its
/// own, as is a feasible one when the return range is degenerate. Otherwise
/// `n_points` evenly spaced targets are solved as frontier points; infeasible
/// points are kept in the list.
///
/// # Errors
/// Returns an error when the request fails validation.
pub fn compute_efficient_frontier(
    request: &OptimizationRequest<'_>,
    n_points: usize,
) -> Result<Vec<SolverResult>> {
    let mvp = optimize_mvp(request)?;
    let lower = match mvp.solution() {
        Some(solution) => solution.expected_return,
        None => return Ok(vec![mvp]),
    };
    let upper = request.mu.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    if upper <= lower + request.settings.weight_tolerance {
        debug!(lower, upper, "degenerate return range; frontier is the MVP alone");
        return Ok(vec![mvp]);
    }

    debug!(n_points, lower, upper, "tracing efficient frontier");
    Array1::linspace(lower, upper, n_points)
        .iter()
        .map(|&target| optimize_frontier_point(request, target))
        .collect()
}

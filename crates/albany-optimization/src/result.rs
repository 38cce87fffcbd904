//! Solver outputs.

use crate::Result;
use derive_more::Display;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Diagnostics from the numerical solver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverMeta {
    /// SQP iterations used
    pub iterations: usize,
    /// Termination message
    pub message: String,
    /// Whether the solver reported convergence
    pub converged: bool,
    /// Constraints that were skipped and why
    pub warnings: Vec<String>,
}

/// A solved portfolio with its summary statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSolution {
    /// Weights in column order, summing to 1
    pub weights: Array1<f64>,
    /// `wᵀμ`
    pub expected_return: f64,
    /// `wᵀΣw`
    pub variance: f64,
    /// `sqrt(max(variance, 0))`
    pub stdev: f64,
    /// `(wᵀμ - rf) / stdev`, only when a risk-free rate was given and the
    /// volatility is nonzero
    pub sharpe: Option<f64>,
    /// Herfindahl index `Σw²`
    pub hhi: f64,
    /// `1 / hhi`
    pub effective_n: f64,
    /// Plain-language summary with concrete numbers
    pub explanation: String,
    /// Solver diagnostics
    pub solver_meta: SolverMeta,
}

/// Outcome of one optimization.
///
/// Infeasibility is a normal outcome, not an error: the reason says which
/// constraint or precondition could not be met.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SolverResult {
    /// A solution satisfying every applied constraint
    Feasible(Box<PortfolioSolution>),
    /// No solution; `reason` explains why
    Infeasible {
        /// Why no solution exists or none was found
        reason: String,
    },
}

impl SolverResult {
    pub(crate) fn infeasible(reason: impl Into<String>) -> Self {
        Self::Infeasible {
            reason: reason.into(),
        }
    }

    /// Whether a solution was found.
    pub const fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible(_))
    }

    /// The solution, if any.
    pub fn solution(&self) -> Option<&PortfolioSolution> {
        match self {
            Self::Feasible(solution) => Some(solution.as_ref()),
            Self::Infeasible { .. } => None,
        }
    }

    /// Why the problem is infeasible, if it is.
    pub fn infeasibility_reason(&self) -> Option<&str> {
        match self {
            Self::Feasible(_) => None,
            Self::Infeasible { reason } => Some(reason.as_str()),
        }
    }

    /// The explanation of a solution, or `"Optimization infeasible: {reason}"`.
    pub fn explanation(&self) -> String {
        match self {
            Self::Feasible(solution) => solution.explanation.clone(),
            Self::Infeasible { reason } => format!("Optimization infeasible: {reason}"),
        }
    }

    /// Status of this outcome.
    pub const fn status(&self) -> OptimizationStatus {
        match self {
            Self::Feasible(_) => OptimizationStatus::Success,
            Self::Infeasible { .. } => OptimizationStatus::Infeasible,
        }
    }
}

/// Run status as persisted by callers.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OptimizationStatus {
    /// Feasible solution found
    #[display("SUCCESS")]
    Success,
    /// Constraints cannot be met
    #[display("INFEASIBLE")]
    Infeasible,
    /// Invalid input or an internal failure
    #[display("ERROR")]
    Error,
}

impl OptimizationStatus {
    /// Status of a call that may have failed before producing a result.
    pub const fn of(result: &Result<SolverResult>) -> Self {
        match result {
            Ok(outcome) => outcome.status(),
            Err(_) => Self::Error,
        }
    }
}

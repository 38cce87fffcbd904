//! Cheap checks run before the solver.
//!
//! The checks are necessary conditions only: passing them does not guarantee
//! the solver finds a solution, but failing them guarantees it cannot.

use crate::{OptimizationConstraints, WEIGHT_TOLERANCE};
use ndarray::Array1;
use serde::{Deserialize, Serialize};

/// Verdict of [`check_feasibility`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum Feasibility {
    /// No precondition is violated
    Feasible,
    /// A precondition is violated, with the reason
    Infeasible(String),
}

impl Feasibility {
    /// Whether every check passed.
    pub const fn is_feasible(&self) -> bool {
        matches!(self, Self::Feasible)
    }
}

fn max_return(mu: &Array1<f64>) -> f64 {
    mu.iter().copied().fold(f64::NEG_INFINITY, f64::max)
}

/// Check the preconditions of an optimization.
///
/// In order:
/// 1. with a risk-free rate, some asset must return more than it;
/// 2. under long-only, a target return may not exceed the largest `μᵢ`;
/// 3. the per-asset minimum weights may not sum past 1.
pub fn check_feasibility(
    mu: &Array1<f64>,
    target_return: Option<f64>,
    risk_free_rate: Option<f64>,
    constraints: &OptimizationConstraints,
) -> Feasibility {
    let max_mu = max_return(mu);

    if let Some(rf) = risk_free_rate {
        if max_mu <= rf {
            return Feasibility::Infeasible(
                "No asset has expected return exceeding the risk-free rate; \
                 tangency portfolio undefined."
                    .to_string(),
            );
        }
    }

    if let Some(target) = target_return {
        if constraints.long_only && target > max_mu + WEIGHT_TOLERANCE {
            return Feasibility::Infeasible(format!(
                "Target return of {:.2}% exceeds the maximum achievable return of {:.2}% \
                 under long-only constraints.",
                target * 100.0,
                max_mu * 100.0
            ));
        }
    }

    let total_min: f64 = constraints
        .asset_bounds
        .iter()
        .map(|bound| bound.min_weight)
        .sum();
    if total_min > 1.0 + WEIGHT_TOLERANCE {
        return Feasibility::Infeasible(format!(
            "Sum of minimum asset bounds ({total_min:.4}) exceeds 1.0; \
             full investment constraint cannot be satisfied."
        ));
    }

    Feasibility::Feasible
}

//! Solver tuning parameters.
//!
//! Defaults reproduce the documented behaviour; callers rarely need to
//! change them.

use crate::{OptimizationError, Result, WEIGHT_TOLERANCE};
use serde::{Deserialize, Serialize};

/// Settings for the outer SQP loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverSettings {
    /// Maximum SQP iterations (default: 1000)
    pub max_iterations: usize,
    /// Function-value convergence tolerance (default: 1e-10)
    pub ftol: f64,
    /// Weights with smaller magnitude are zeroed after solving (default: 1e-8)
    pub weight_tolerance: f64,
    /// Settings for each QP subproblem
    pub qp: QpSettings,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            max_iterations: 1000,
            ftol: 1e-10,
            weight_tolerance: WEIGHT_TOLERANCE,
            qp: QpSettings::default(),
        }
    }
}

impl SolverSettings {
    /// Check parameter ranges.
    ///
    /// # Errors
    /// Returns [`OptimizationError::InvalidParameter`] for zero iteration
    /// limits or non-positive tolerances.
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(OptimizationError::InvalidParameter(
                "max_iterations must be positive".to_string(),
            ));
        }
        if !(self.ftol > 0.0 && self.weight_tolerance > 0.0) {
            return Err(OptimizationError::InvalidParameter(
                "ftol and weight_tolerance must be positive".to_string(),
            ));
        }
        self.qp.validate()
    }
}

/// Settings for the ADMM QP solver.
///
/// ADMM locates the active set; every subproblem is then polished by direct
/// KKT solves on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct QpSettings {
    /// Initial ADMM step size ρ
    pub rho: f64,
    /// Proximal regularization σ on the primal variables
    pub sigma: f64,
    /// Over-relaxation parameter α in (0, 2)
    pub alpha: f64,
    /// Absolute residual tolerance
    pub eps_abs: f64,
    /// Relative residual tolerance
    pub eps_rel: f64,
    /// Maximum ADMM iterations per subproblem
    pub max_iterations: usize,
    /// Maximum ADMM iterations summed over all subproblems of one solve
    pub iteration_budget: usize,
}

impl Default for QpSettings {
    fn default() -> Self {
        Self {
            rho: 0.1,
            sigma: 1e-6,
            alpha: 1.6,
            eps_abs: 1e-7,
            eps_rel: 1e-7,
            max_iterations: 4_000,
            iteration_budget: 100_000,
        }
    }
}

impl QpSettings {
    /// Check parameter ranges.
    ///
    /// # Errors
    /// Returns [`OptimizationError::InvalidParameter`] for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        if !(self.rho > 0.0 && self.sigma > 0.0) {
            return Err(OptimizationError::InvalidParameter(
                "rho and sigma must be positive".to_string(),
            ));
        }
        if !(self.alpha > 0.0 && self.alpha < 2.0) {
            return Err(OptimizationError::InvalidParameter(format!(
                "alpha must lie in (0, 2), got {}",
                self.alpha
            )));
        }
        if !(self.eps_abs >= 0.0 && self.eps_rel >= 0.0) {
            return Err(OptimizationError::InvalidParameter(
                "QP tolerances must be non-negative".to_string(),
            ));
        }
        if self.max_iterations == 0 || self.iteration_budget < self.max_iterations {
            return Err(OptimizationError::InvalidParameter(format!(
                "QP iteration budget ({}) must cover at least one subproblem ({})",
                self.iteration_budget, self.max_iterations
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        let settings = SolverSettings::default();
        assert_eq!(settings.max_iterations, 1000);
        assert_eq!(settings.ftol, 1e-10);
        assert_eq!(settings.weight_tolerance, 1e-8);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_alpha() {
        let settings = SolverSettings {
            qp: QpSettings {
                alpha: 2.0,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_rejects_budget_below_one_subproblem() {
        let settings = QpSettings {
            max_iterations: 5_000,
            iteration_budget: 1_000,
            ..Default::default()
        };
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("iteration budget (1000)"));
    }
}

//! Smooth objectives over the weight vector.

use albany_math::portfolio_variance;
use ndarray::{Array1, Array2};

/// Variance below which the Sharpe denominator is floored.
const VARIANCE_FLOOR: f64 = 1e-12;

/// Objective minimized by the SQP driver.
pub(crate) trait ObjectiveFunction {
    /// Objective value at `w`.
    fn value(&self, w: &Array1<f64>) -> f64;

    /// Gradient at `w`.
    fn gradient(&self, w: &Array1<f64>) -> Array1<f64>;

    /// Constant exact Hessian, when the objective is quadratic.
    ///
    /// Objectives without one are driven with a quasi-Newton approximation.
    fn hessian(&self) -> Option<Array2<f64>> {
        None
    }
}

/// `wᵀ Σ w`
#[derive(Debug)]
pub(crate) struct PortfolioVarianceObjective<'a> {
    sigma: &'a Array2<f64>,
}

impl<'a> PortfolioVarianceObjective<'a> {
    pub(crate) const fn new(sigma: &'a Array2<f64>) -> Self {
        Self { sigma }
    }
}

impl ObjectiveFunction for PortfolioVarianceObjective<'_> {
    fn value(&self, w: &Array1<f64>) -> f64 {
        portfolio_variance(w, self.sigma)
    }

    fn gradient(&self, w: &Array1<f64>) -> Array1<f64> {
        self.sigma.dot(w) * 2.0
    }

    fn hessian(&self) -> Option<Array2<f64>> {
        // Symmetrized so an input with rounding asymmetry still gives a
        // symmetric QP.
        Some(self.sigma + &self.sigma.t())
    }
}

/// `-(wᵀμ - rf) / sqrt(max(wᵀΣw, floor))`
#[derive(Debug)]
pub(crate) struct NegativeSharpeObjective<'a> {
    mu: &'a Array1<f64>,
    sigma: &'a Array2<f64>,
    risk_free_rate: f64,
}

impl<'a> NegativeSharpeObjective<'a> {
    pub(crate) const fn new(mu: &'a Array1<f64>, sigma: &'a Array2<f64>, risk_free_rate: f64) -> Self {
        Self {
            mu,
            sigma,
            risk_free_rate,
        }
    }
}

impl ObjectiveFunction for NegativeSharpeObjective<'_> {
    fn value(&self, w: &Array1<f64>) -> f64 {
        let excess = w.dot(self.mu) - self.risk_free_rate;
        let stdev = portfolio_variance(w, self.sigma).max(VARIANCE_FLOOR).sqrt();
        -excess / stdev
    }

    fn gradient(&self, w: &Array1<f64>) -> Array1<f64> {
        let sigma_w = self.sigma.dot(w);
        let variance = w.dot(&sigma_w);
        let excess = w.dot(self.mu) - self.risk_free_rate;

        if variance <= VARIANCE_FLOOR {
            let stdev = VARIANCE_FLOOR.sqrt();
            return self.mu / -stdev;
        }
        let stdev = variance.sqrt();
        // d/dw [-(excess / s)] = -μ/s + excess · Σw / s³
        sigma_w * (excess / (stdev * stdev * stdev)) - self.mu / stdev
    }
}

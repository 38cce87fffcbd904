//! Translation of a request into a linearly constrained problem.
//!
//! The variable vector is `x = [w; t; s]` where `t` (present with a leverage
//! cap) bounds `|w|` and `s` (present with a usable turnover cap) bounds
//! `|w - w_prev|`:
//!
//! ```text
//! t_i - w_i ≥ 0,  t_i + w_i ≥ 0,  Σ t_i ≤ L
//! s_i - w_i ≥ -p_i,  s_i + w_i ≥ p_i,  Σ s_i ≤ T
//! ```
//!
//! At any feasible point `Σ|w_i| ≤ Σ t_i ≤ L`, and any `w` with `Σ|w_i| ≤ L`
//! is feasible with `t = |w|`, so the lifting is exact. The concentration cap
//! tightens the box on `w` directly.

use crate::OptimizationRequest;
use crate::Result;
use ndarray::{Array1, Array2, s};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Linear constraints `row_lower ≤ A x ≤ row_upper` plus box bounds on `x`.
#[derive(Debug, Clone)]
pub(crate) struct LiftedProblem {
    pub(crate) n_assets: usize,
    pub(crate) lower: Array1<f64>,
    pub(crate) upper: Array1<f64>,
    pub(crate) a: Array2<f64>,
    pub(crate) row_lower: Array1<f64>,
    pub(crate) row_upper: Array1<f64>,
    pub(crate) warnings: Vec<String>,
    prev_weights: Option<Array1<f64>>,
    leverage_offset: Option<usize>,
    turnover_offset: Option<usize>,
}

struct RowBuilder {
    n_vars: usize,
    rows: Vec<Array1<f64>>,
    lower: Vec<f64>,
    upper: Vec<f64>,
}

impl RowBuilder {
    const fn new(n_vars: usize) -> Self {
        Self {
            n_vars,
            rows: Vec::new(),
            lower: Vec::new(),
            upper: Vec::new(),
        }
    }

    fn push(&mut self, coefficients: &[(usize, f64)], lower: f64, upper: f64) {
        let mut row = Array1::zeros(self.n_vars);
        for &(column, value) in coefficients {
            row[column] += value;
        }
        self.rows.push(row);
        self.lower.push(lower);
        self.upper.push(upper);
    }

    fn push_dense(&mut self, row: Array1<f64>, lower: f64, upper: f64) {
        self.rows.push(row);
        self.lower.push(lower);
        self.upper.push(upper);
    }

    fn finish(self) -> (Array2<f64>, Array1<f64>, Array1<f64>) {
        let mut a = Array2::zeros((self.rows.len(), self.n_vars));
        for (i, row) in self.rows.into_iter().enumerate() {
            a.row_mut(i).assign(&row);
        }
        (a, Array1::from(self.lower), Array1::from(self.upper))
    }
}

impl LiftedProblem {
    /// Build the lifted problem; `target_return` adds `wᵀμ = R`.
    ///
    /// Soft degradations (bounds without ids, turnover without previous
    /// weights) are logged and recorded in `warnings`.
    pub(crate) fn build(request: &OptimizationRequest<'_>, target_return: Option<f64>) -> Result<Self> {
        let n = request.n_assets();
        let constraints = request.constraints;
        let mut warnings = Vec::new();

        let (base_lower, base_upper) = constraints.base_bounds();
        let mut w_lower = Array1::from_elem(n, base_lower);
        let mut w_upper = Array1::from_elem(n, base_upper);

        if !constraints.asset_bounds.is_empty() {
            match request.asset_ids {
                Some(ids) => {
                    let bounds: HashMap<_, _> = constraints
                        .asset_bounds
                        .iter()
                        .map(|bound| (bound.asset_id, bound))
                        .collect();
                    for (column, id) in ids.iter().enumerate() {
                        if let Some(bound) = bounds.get(id) {
                            w_lower[column] = bound.min_weight;
                            w_upper[column] = bound.max_weight;
                        }
                    }
                    let unmatched = bounds.keys().filter(|id| !ids.contains(*id)).count();
                    if unmatched > 0 {
                        debug!(unmatched, "asset bounds reference assets outside the universe");
                    }
                }
                None => {
                    let message =
                        "asset_bounds are set but asset_ids is None; per-asset bounds ignored."
                            .to_string();
                    warn!("{message}");
                    warnings.push(message);
                }
            }
        }

        if let Some(cap) = constraints.concentration_cap {
            w_lower.mapv_inplace(|v| v.max(-cap));
            w_upper.mapv_inplace(|v| v.min(cap));
        }

        // With non-negative weights the return is a convex combination of μ, so a
        // target at max μ is reachable only by the assets tied at the maximum.
        // Pinning the rest to zero replaces the degenerate target row.
        let tolerance = request.settings.weight_tolerance;
        let max_mu = request.mu.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let target_return = match target_return {
            Some(target)
                if (target - max_mu).abs() <= tolerance && w_lower.iter().all(|&lo| lo >= 0.0) =>
            {
                let mut pinned = 0;
                for (upper, &mu) in w_upper.iter_mut().zip(request.mu.iter()) {
                    if mu < max_mu - tolerance {
                        *upper = 0.0;
                        pinned += 1;
                    }
                }
                debug!(target, pinned, "target at the maximum return; pinned lower-return assets to zero");
                None
            }
            other => other,
        };

        let prev_weights = match (constraints.turnover_cap, request.prev_weights) {
            (Some(_), Some(prev)) => Some(prev.clone()),
            (Some(_), None) => {
                let message =
                    "turnover_cap is set but prev_weights is None; turnover constraint ignored."
                        .to_string();
                warn!("{message}");
                warnings.push(message);
                None
            }
            (None, _) => None,
        };

        let leverage_offset = constraints.leverage_cap.map(|_| n);
        let turnover_offset = prev_weights
            .as_ref()
            .map(|_| n + leverage_offset.map_or(0, |_| n));
        let n_vars = n + leverage_offset.map_or(0, |_| n) + turnover_offset.map_or(0, |_| n);

        let mut lower = Array1::from_elem(n_vars, 0.0);
        let mut upper = Array1::from_elem(n_vars, f64::INFINITY);
        lower.slice_mut(s![..n]).assign(&w_lower);
        upper.slice_mut(s![..n]).assign(&w_upper);

        let mut rows = RowBuilder::new(n_vars);

        // Full investment
        let budget: Vec<(usize, f64)> = (0..n).map(|i| (i, 1.0)).collect();
        rows.push(&budget, 1.0, 1.0);

        if let Some(target) = target_return {
            let mut row = Array1::zeros(n_vars);
            row.slice_mut(s![..n]).assign(request.mu);
            rows.push_dense(row, target, target);
        }

        if let (Some(cap), Some(offset)) = (constraints.leverage_cap, leverage_offset) {
            for i in 0..n {
                rows.push(&[(offset + i, 1.0), (i, -1.0)], 0.0, f64::INFINITY);
                rows.push(&[(offset + i, 1.0), (i, 1.0)], 0.0, f64::INFINITY);
            }
            let total: Vec<(usize, f64)> = (0..n).map(|i| (offset + i, 1.0)).collect();
            rows.push(&total, f64::NEG_INFINITY, cap);
        }

        if let (Some(cap), Some(offset), Some(prev)) =
            (constraints.turnover_cap, turnover_offset, prev_weights.as_ref())
        {
            for i in 0..n {
                rows.push(&[(offset + i, 1.0), (i, -1.0)], -prev[i], f64::INFINITY);
                rows.push(&[(offset + i, 1.0), (i, 1.0)], prev[i], f64::INFINITY);
            }
            let total: Vec<(usize, f64)> = (0..n).map(|i| (offset + i, 1.0)).collect();
            rows.push(&total, f64::NEG_INFINITY, cap);
        }

        let (a, row_lower, row_upper) = rows.finish();

        Ok(Self {
            n_assets: n,
            lower,
            upper,
            a,
            row_lower,
            row_upper,
            warnings,
            prev_weights,
            leverage_offset,
            turnover_offset,
        })
    }

    pub(crate) fn n_vars(&self) -> usize {
        self.lower.len()
    }

    /// Whether some variable has an empty box.
    pub(crate) fn has_crossed_bounds(&self, tolerance: f64) -> bool {
        self.lower
            .iter()
            .zip(self.upper.iter())
            .any(|(lo, hi)| *lo > *hi + tolerance)
    }

    /// Equal weights, with auxiliaries at their tightest feasible values.
    pub(crate) fn initial_point(&self) -> Array1<f64> {
        let n = self.n_assets;
        let mut x = Array1::zeros(self.n_vars());
        let w = 1.0 / n as f64;
        x.slice_mut(s![..n]).fill(w);
        if let Some(offset) = self.leverage_offset {
            x.slice_mut(s![offset..offset + n]).fill(w.abs());
        }
        if let (Some(offset), Some(prev)) = (self.turnover_offset, self.prev_weights.as_ref()) {
            for i in 0..n {
                x[offset + i] = (w - prev[i]).abs();
            }
        }
        x
    }

    /// Weight block of a variable vector.
    pub(crate) fn weights(&self, x: &Array1<f64>) -> Array1<f64> {
        x.slice(s![..self.n_assets]).to_owned()
    }

    /// Largest violation of rows and bounds at `x`.
    pub(crate) fn violation(&self, x: &Array1<f64>) -> f64 {
        let ax = self.a.dot(x);
        let rows = ax
            .iter()
            .zip(self.row_lower.iter().zip(self.row_upper.iter()))
            .map(|(v, (lo, hi))| (lo - v).max(v - hi).max(0.0));
        let bounds = x
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .map(|(v, (lo, hi))| (lo - v).max(v - hi).max(0.0));
        rows.chain(bounds).fold(0.0, f64::max)
    }
}

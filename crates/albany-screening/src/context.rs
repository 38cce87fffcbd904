//! Reference-portfolio quantities shared by every candidate.

use crate::Result;
use albany_math::{correlation_from_covariance, effective_n, herfindahl, portfolio_volatility, volatilities};
use albany_primitives::{AssetId, AssetIndex};
use ndarray::{Array1, Array2};
use std::collections::HashMap;

/// Derived once per screening run.
#[derive(Debug, Clone)]
pub(crate) struct ReferenceContext {
    /// Reference weights aligned to covariance columns
    pub(crate) weights: Array1<f64>,
    /// Columns the reference actually holds
    pub(crate) held: Vec<usize>,
    pub(crate) correlation: Array2<f64>,
    pub(crate) volatility: f64,
    pub(crate) hhi: f64,
    pub(crate) effective_n: f64,
}

impl ReferenceContext {
    pub(crate) fn build(
        reference_weights: &HashMap<AssetId, f64>,
        covariance: &Array2<f64>,
        index: &AssetIndex,
    ) -> Result<Self> {
        let weights = index.dense_weights(reference_weights);
        let held = weights
            .iter()
            .enumerate()
            .filter(|(_, w)| **w != 0.0)
            .map(|(column, _)| column)
            .collect();
        let correlation = correlation_from_covariance(covariance, &volatilities(covariance))?;
        let volatility = portfolio_volatility(&weights, covariance);
        let hhi = herfindahl(&weights);

        Ok(Self {
            held,
            correlation,
            volatility,
            hhi,
            effective_n: effective_n(hhi),
            weights,
        })
    }
}

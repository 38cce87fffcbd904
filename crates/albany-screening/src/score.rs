//! Candidate scoring and ranking.

use crate::context::ReferenceContext;
use crate::explain::{ReferenceStats, explain_score};
use crate::normalize::normalize_scores;
use crate::signals::{
    average_correlation, hhi_reduction, marginal_volatility_reduction, sector_gap_score,
};
use crate::{Result, ScreeningConfig, ScreeningError};
use albany_primitives::{Asset, AssetId, AssetIndex};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info};

/// Ranked diversification score of one candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScreeningScore {
    /// Candidate asset
    pub asset_id: AssetId,
    /// Raw average correlation with the held reference assets
    pub avg_pairwise_corr: f64,
    /// Raw σ_R − σ_pro
    pub marginal_vol_reduction: f64,
    /// 1.0, 0.5 or 0.0
    pub sector_gap_score: f64,
    /// Raw HHI_R − HHI_pro
    pub hhi_reduction: f64,
    /// Weighted sum of the normalized signals
    pub composite_score: f64,
    /// 1-based position after sorting
    pub rank: usize,
    /// Human-readable summary
    pub explanation: String,
}

/// Inputs to a screening run. Everything is borrowed from the caller.
#[derive(Debug, Clone, Copy)]
pub struct ScreeningRequest<'a> {
    /// Current holdings by asset id
    pub reference_weights: &'a HashMap<AssetId, f64>,
    /// Metadata for the reference holdings
    pub reference_assets: &'a [Asset],
    /// Assets to score
    pub candidate_ids: &'a [AssetId],
    /// Metadata for the candidates
    pub candidate_assets: &'a [Asset],
    /// Covariance over every indexed asset
    pub covariance: &'a Array2<f64>,
    /// Column order of `covariance`
    pub asset_index: &'a AssetIndex,
    /// Screening parameters
    pub config: ScreeningConfig,
}

impl<'a> ScreeningRequest<'a> {
    /// Create a request with the default [`ScreeningConfig`].
    pub fn new(
        reference_weights: &'a HashMap<AssetId, f64>,
        reference_assets: &'a [Asset],
        candidate_ids: &'a [AssetId],
        candidate_assets: &'a [Asset],
        covariance: &'a Array2<f64>,
        asset_index: &'a AssetIndex,
    ) -> Self {
        Self {
            reference_weights,
            reference_assets,
            candidate_ids,
            candidate_assets,
            covariance,
            asset_index,
            config: ScreeningConfig::default(),
        }
    }

    /// Replace the screening parameters.
    pub const fn with_config(mut self, config: ScreeningConfig) -> Self {
        self.config = config;
        self
    }

    /// Check the covariance matches the index and the config is in range.
    ///
    /// # Errors
    /// Returns [`ScreeningError::DimensionMismatch`] or
    /// [`ScreeningError::InvalidConfig`].
    pub fn validate(&self) -> Result<()> {
        let (rows, cols) = self.covariance.dim();
        if rows != cols {
            return Err(ScreeningError::DimensionMismatch {
                expected: rows,
                actual: cols,
            });
        }
        if rows != self.asset_index.len() {
            return Err(ScreeningError::DimensionMismatch {
                expected: self.asset_index.len(),
                actual: rows,
            });
        }
        self.config.validate()
    }
}

#[derive(Debug)]
struct RawSignals {
    asset_id: AssetId,
    correlation: f64,
    marginal_vol: f64,
    sector_gap: f64,
    hhi: f64,
}

/// Score, rank and explain every candidate present in the asset index.
///
/// Candidates missing from the index are dropped. The result is sorted by
/// composite score, highest first; equal scores keep their input order.
///
/// # Errors
/// Returns an error when the request fails validation or a candidate has no
/// entry in `candidate_assets`.
pub fn score_candidates(request: &ScreeningRequest<'_>) -> Result<Vec<ScreeningScore>> {
    request.validate()?;
    let index = request.asset_index;

    let candidates: Vec<(AssetId, usize)> = request
        .candidate_ids
        .iter()
        .filter_map(|id| {
            let column = index.position(id);
            if column.is_none() {
                debug!(asset_id = %id, "Candidate not in asset index; skipped");
            }
            column.map(|column| (*id, column))
        })
        .collect();
    if candidates.is_empty() {
        return Ok(Vec::new());
    }

    let context = ReferenceContext::build(request.reference_weights, request.covariance, index)?;
    let metadata: HashMap<AssetId, &Asset> =
        request.candidate_assets.iter().map(|asset| (asset.id, asset)).collect();
    let delta = request.config.nominal_add_weight;

    let raw = candidates
        .iter()
        .map(|&(asset_id, column)| {
            let asset = metadata
                .get(&asset_id)
                .ok_or(ScreeningError::MissingAsset(asset_id))?;
            Ok(RawSignals {
                asset_id,
                correlation: average_correlation(&context.correlation, column, &context.held),
                marginal_vol: marginal_volatility_reduction(
                    &context.weights,
                    request.covariance,
                    column,
                    delta,
                ),
                sector_gap: sector_gap_score(
                    asset,
                    request.reference_assets,
                    request.reference_weights,
                    request.config.sector_gap_threshold,
                ),
                hhi: hhi_reduction(&context.weights, column, delta),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let correlation = normalize_scores(&raw.iter().map(|r| r.correlation).collect::<Vec<_>>(), true);
    let marginal_vol =
        normalize_scores(&raw.iter().map(|r| r.marginal_vol).collect::<Vec<_>>(), false);
    let hhi = normalize_scores(&raw.iter().map(|r| r.hhi).collect::<Vec<_>>(), false);

    let lambda = request.config.score_weights;
    let mut composites: Vec<(usize, f64)> = raw
        .iter()
        .enumerate()
        .map(|(i, signals)| {
            let composite = lambda.correlation * correlation[i]
                + lambda.marginal_vol * marginal_vol[i]
                + lambda.sector_gap * signals.sector_gap
                + lambda.hhi * hhi[i];
            (i, composite)
        })
        .collect();
    composites.sort_by(|a, b| b.1.total_cmp(&a.1));

    let stats = ReferenceStats {
        volatility: context.volatility,
        hhi: context.hhi,
        effective_n: context.effective_n,
        nominal_add_weight: delta,
    };
    let scores: Vec<ScreeningScore> = composites
        .into_iter()
        .enumerate()
        .map(|(position, (i, composite))| {
            let signals = &raw[i];
            let mut score = ScreeningScore {
                asset_id: signals.asset_id,
                avg_pairwise_corr: signals.correlation,
                marginal_vol_reduction: signals.marginal_vol,
                sector_gap_score: signals.sector_gap,
                hhi_reduction: signals.hhi,
                composite_score: composite,
                rank: position + 1,
                explanation: String::new(),
            };
            score.explanation = explain_score(&score, &stats);
            score
        })
        .collect();

    info!(
        candidates = scores.len(),
        reference_volatility = context.volatility,
        "Screened candidates"
    );
    Ok(scores)
}

//! The four raw diversification signals.
//!
//! All signals take dense, column-aligned inputs except the sector gap, which
//! works on asset metadata.

use albany_math::{herfindahl, portfolio_volatility};
use albany_primitives::{Asset, AssetClass, AssetId, GicsSector};
use ndarray::{Array1, Array2};
use std::collections::{HashMap, HashSet};

/// Gap score when the candidate's asset class is not represented.
pub const GAP_CLASS_MISSING: f64 = 1.0;
/// Gap score when the class is represented but the candidate's sector is not.
pub const GAP_SECTOR_MISSING: f64 = 0.5;
/// Gap score when both class and sector are already held.
pub const GAP_NONE: f64 = 0.0;

/// Mean correlation between `candidate` and the `reference` columns.
///
/// An empty reference gives 0.0.
pub fn average_correlation(correlation: &Array2<f64>, candidate: usize, reference: &[usize]) -> f64 {
    if reference.is_empty() {
        return 0.0;
    }
    let total: f64 = reference.iter().map(|&r| correlation[[candidate, r]]).sum();
    total / reference.len() as f64
}

/// `(1 - δ) w_R` with `δ` added to the candidate's column.
pub fn pro_forma_weights(reference: &Array1<f64>, candidate: usize, delta: f64) -> Array1<f64> {
    let mut weights = reference * (1.0 - delta);
    weights[candidate] += delta;
    weights
}

/// `σ_R - σ_pro` for the pro-forma portfolio; positive when adding the
/// candidate lowers volatility.
pub fn marginal_volatility_reduction(
    reference: &Array1<f64>,
    covariance: &Array2<f64>,
    candidate: usize,
    delta: f64,
) -> f64 {
    let sigma_reference = portfolio_volatility(reference, covariance);
    let pro_forma = pro_forma_weights(reference, candidate, delta);
    sigma_reference - portfolio_volatility(&pro_forma, covariance)
}

/// `HHI_R - HHI_pro` for the pro-forma portfolio; positive when adding the
/// candidate lowers concentration.
pub fn hhi_reduction(reference: &Array1<f64>, candidate: usize, delta: f64) -> f64 {
    herfindahl(reference) - herfindahl(&pro_forma_weights(reference, candidate, delta))
}

/// Whether the candidate fills a gap in the reference's asset classes or
/// sectors.
///
/// An asset class is represented when the reference assets of that class
/// carry a combined weight of at least `threshold`. Returns
/// [`GAP_CLASS_MISSING`] when the candidate's class is not represented,
/// [`GAP_SECTOR_MISSING`] when its sector is absent from every reference
/// asset, and [`GAP_NONE`] otherwise. A candidate without a sector never
/// scores [`GAP_SECTOR_MISSING`].
pub fn sector_gap_score(
    candidate: &Asset,
    reference_assets: &[Asset],
    reference_weights: &HashMap<AssetId, f64>,
    threshold: f64,
) -> f64 {
    let mut class_weights: HashMap<AssetClass, f64> = HashMap::new();
    for asset in reference_assets {
        *class_weights.entry(asset.asset_class).or_insert(0.0) +=
            reference_weights.get(&asset.id).copied().unwrap_or(0.0);
    }
    let represented = class_weights
        .get(&candidate.asset_class)
        .is_some_and(|weight| *weight >= threshold);
    if !represented {
        return GAP_CLASS_MISSING;
    }

    let sectors: HashSet<GicsSector> = reference_assets.iter().filter_map(|a| a.sector).collect();
    match candidate.sector {
        Some(sector) if !sectors.contains(&sector) => GAP_SECTOR_MISSING,
        _ => GAP_NONE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    #[test]
    fn test_average_correlation() {
        let correlation = array![[1.0, 0.2, 0.6], [0.2, 1.0, -0.4], [0.6, -0.4, 1.0]];
        assert_abs_diff_eq!(average_correlation(&correlation, 2, &[0, 1]), 0.1, epsilon = 1e-12);
        assert_eq!(average_correlation(&correlation, 2, &[]), 0.0);
    }

    #[test]
    fn test_pro_forma_and_hhi() {
        let reference = array![0.5, 0.5, 0.0];
        let pro_forma = pro_forma_weights(&reference, 2, 0.1);
        assert_abs_diff_eq!(pro_forma[0], 0.45, epsilon = 1e-12);
        assert_abs_diff_eq!(pro_forma[2], 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(pro_forma.sum(), 1.0, epsilon = 1e-12);

        // 0.5 - (2 · 0.45² + 0.1²)
        assert_abs_diff_eq!(hhi_reduction(&reference, 2, 0.1), 0.085, epsilon = 1e-12);
    }

    #[test]
    fn test_uncorrelated_candidate_reduces_volatility() {
        let reference = array![1.0, 0.0];
        let covariance = array![[0.04, 0.0], [0.0, 0.04]];
        // σ_pro = sqrt(0.9² · 0.04 + 0.1² · 0.04)
        let expected = 0.2 - (0.82_f64 * 0.04).sqrt();
        let reduction = marginal_volatility_reduction(&reference, &covariance, 1, 0.1);
        assert_abs_diff_eq!(reduction, expected, epsilon = 1e-12);
        assert!(reduction > 0.0);
    }

    #[test]
    fn test_sector_gap_branches() {
        let tech = Asset::new("AAPL", AssetClass::Equity).with_sector(GicsSector::InformationTechnology);
        let bond = Asset::new("AGG", AssetClass::FixedIncome);
        let weights: HashMap<AssetId, f64> = [(tech.id, 0.99), (bond.id, 0.01)].into_iter().collect();
        let reference = vec![tech.clone(), bond];

        let energy = Asset::new("XOM", AssetClass::Equity).with_sector(GicsSector::Energy);
        let software = Asset::new("MSFT", AssetClass::Equity).with_sector(GicsSector::InformationTechnology);
        let treasury = Asset::new("IEF", AssetClass::FixedIncome);
        let gold = Asset::new("GLD", AssetClass::Commodity);
        let unclassified = Asset::new("BRK", AssetClass::Equity);

        assert_eq!(sector_gap_score(&energy, &reference, &weights, 0.02), GAP_SECTOR_MISSING);
        assert_eq!(sector_gap_score(&software, &reference, &weights, 0.02), GAP_NONE);
        // Fixed income holds 1%, below the 2% threshold
        assert_eq!(sector_gap_score(&treasury, &reference, &weights, 0.02), GAP_CLASS_MISSING);
        assert_eq!(sector_gap_score(&gold, &reference, &weights, 0.02), GAP_CLASS_MISSING);
        assert_eq!(sector_gap_score(&unclassified, &reference, &weights, 0.02), GAP_NONE);
    }
}

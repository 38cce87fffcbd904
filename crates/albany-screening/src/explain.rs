//! Plain-language explanations of screening scores.

use crate::ScreeningScore;
use crate::signals::{GAP_CLASS_MISSING, GAP_SECTOR_MISSING};

/// Reference-portfolio figures quoted in every explanation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReferenceStats {
    /// Reference portfolio volatility σ_R
    pub volatility: f64,
    /// Reference HHI
    pub hhi: f64,
    /// Reference effective number of assets
    pub effective_n: f64,
    /// Nominal trial weight δ
    pub nominal_add_weight: f64,
}

/// Sentence describing a sector-gap score.
pub fn sector_gap_clause(gap_score: f64) -> &'static str {
    if gap_score == GAP_CLASS_MISSING {
        "Asset class is not currently represented in the reference portfolio (gap score: 1.00)."
    } else if gap_score == GAP_SECTOR_MISSING {
        "Asset class is represented but this GICS sector is absent from the reference \
         portfolio (gap score: 0.50)."
    } else {
        "Asset class and GICS sector are already represented in the reference portfolio \
         (gap score: 0.00)."
    }
}

/// Explain a score: rank, correlation, volatility and concentration effects.
pub fn explain_score(score: &ScreeningScore, reference: &ReferenceStats) -> String {
    let pro_forma_volatility = reference.volatility - score.marginal_vol_reduction;
    let pro_forma_hhi = reference.hhi - score.hhi_reduction;
    let pro_forma_effective_n = if pro_forma_hhi > 0.0 {
        1.0 / pro_forma_hhi
    } else {
        f64::INFINITY
    };
    let direction = if score.marginal_vol_reduction >= 0.0 {
        "reduce"
    } else {
        "increase"
    };

    [
        format!(
            "Rank {}, composite score {:.3}.",
            score.rank, score.composite_score
        ),
        format!(
            "Average pairwise correlation with reference portfolio: {:.3}.",
            score.avg_pairwise_corr
        ),
        format!(
            "Adding at a {:.1}% nominal weight would {direction} portfolio volatility from \
             {:.2}% to {:.2}% annualised.",
            reference.nominal_add_weight * 100.0,
            reference.volatility * 100.0,
            pro_forma_volatility * 100.0
        ),
        sector_gap_clause(score.sector_gap_score).to_string(),
        format!(
            "HHI changes from {:.4} to {:.4} (effective N: {:.1} → {:.1}).",
            reference.hhi, pro_forma_hhi, reference.effective_n, pro_forma_effective_n
        ),
    ]
    .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_explanation_quotes_numbers() {
        let score = ScreeningScore {
            asset_id: Uuid::nil(),
            avg_pairwise_corr: 0.125,
            marginal_vol_reduction: 0.01,
            sector_gap_score: 0.5,
            hhi_reduction: 0.085,
            composite_score: 0.6789,
            rank: 2,
            explanation: String::new(),
        };
        let reference = ReferenceStats {
            volatility: 0.15,
            hhi: 0.5,
            effective_n: 2.0,
            nominal_add_weight: 0.05,
        };

        assert_eq!(
            explain_score(&score, &reference),
            "Rank 2, composite score 0.679. \
             Average pairwise correlation with reference portfolio: 0.125. \
             Adding at a 5.0% nominal weight would reduce portfolio volatility from 15.00% to 14.00% annualised. \
             Asset class is represented but this GICS sector is absent from the reference portfolio (gap score: 0.50). \
             HHI changes from 0.5000 to 0.4150 (effective N: 2.0 → 2.4)."
        );
    }

    #[test]
    fn test_increase_wording() {
        let score = ScreeningScore {
            asset_id: Uuid::nil(),
            avg_pairwise_corr: 0.9,
            marginal_vol_reduction: -0.02,
            sector_gap_score: 0.0,
            hhi_reduction: 0.0,
            composite_score: 0.0,
            rank: 1,
            explanation: String::new(),
        };
        let reference = ReferenceStats {
            volatility: 0.10,
            hhi: 1.0,
            effective_n: 1.0,
            nominal_add_weight: 0.05,
        };
        let text = explain_score(&score, &reference);
        assert!(text.contains("would increase portfolio volatility from 10.00% to 12.00%"));
        assert!(text.contains("(gap score: 0.00)"));
    }
}

//! Screening parameters.

use crate::{Result, ScreeningError};
use serde::{Deserialize, Serialize};

/// Allowed deviation of the signal weights' sum from 1.
const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// Weights λ₁…λ₄ of the composite score; must sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Average pairwise correlation (default: 0.40)
    pub correlation: f64,
    /// Marginal volatility reduction (default: 0.30)
    pub marginal_vol: f64,
    /// Sector and asset-class gap (default: 0.15)
    pub sector_gap: f64,
    /// HHI reduction (default: 0.15)
    pub hhi: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            correlation: 0.40,
            marginal_vol: 0.30,
            sector_gap: 0.15,
            hhi: 0.15,
        }
    }
}

impl ScoreWeights {
    /// Sum of the four weights.
    pub fn total(&self) -> f64 {
        self.correlation + self.marginal_vol + self.sector_gap + self.hhi
    }

    /// Check each weight lies in `[0, 1]` and the weights sum to 1.
    ///
    /// # Errors
    /// Returns [`ScreeningError::InvalidConfig`] naming the offending values.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("correlation", self.correlation),
            ("marginal_vol", self.marginal_vol),
            ("sector_gap", self.sector_gap),
            ("hhi", self.hhi),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ScreeningError::InvalidConfig(format!(
                    "{name} weight must lie in [0, 1], got {value}"
                )));
            }
        }

        let total = self.total();
        if (total - 1.0).abs() > WEIGHT_SUM_TOLERANCE {
            return Err(ScreeningError::InvalidConfig(format!(
                "Score weights must sum to 1.0, got {total:.8} (correlation={}, \
                 marginal_vol={}, sector_gap={}, hhi={})",
                self.correlation, self.marginal_vol, self.sector_gap, self.hhi
            )));
        }
        Ok(())
    }
}

/// Parameters of a screening run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreeningConfig {
    /// Trial weight δ given to a candidate in the pro-forma portfolio
    /// (default: 0.05)
    pub nominal_add_weight: f64,
    /// Combined reference weight θ at which an asset class counts as
    /// represented (default: 0.02)
    pub sector_gap_threshold: f64,
    /// Composite score weights
    pub score_weights: ScoreWeights,
}

impl Default for ScreeningConfig {
    fn default() -> Self {
        Self {
            nominal_add_weight: 0.05,
            sector_gap_threshold: 0.02,
            score_weights: ScoreWeights::default(),
        }
    }
}

impl ScreeningConfig {
    /// Check δ and θ lie strictly inside `(0, 1)` and the score weights are
    /// valid.
    ///
    /// # Errors
    /// Returns [`ScreeningError::InvalidConfig`] for out-of-range values.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("nominal_add_weight", self.nominal_add_weight),
            ("sector_gap_threshold", self.sector_gap_threshold),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ScreeningError::InvalidConfig(format!(
                    "{name} must lie in (0, 1), got {value}"
                )));
            }
        }
        self.score_weights.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_defaults() {
        let config = ScreeningConfig::default();
        assert_eq!(config.nominal_add_weight, 0.05);
        assert_eq!(config.sector_gap_threshold, 0.02);
        assert_eq!(config.score_weights.correlation, 0.40);
        assert!(config.validate().is_ok());
    }

    #[rstest]
    #[case(ScoreWeights { correlation: 0.5, ..Default::default() })]
    #[case(ScoreWeights { correlation: -0.1, marginal_vol: 0.8, ..Default::default() })]
    #[case(ScoreWeights { correlation: 1.2, marginal_vol: 0.0, sector_gap: 0.0, hhi: -0.2 })]
    fn test_invalid_weights(#[case] weights: ScoreWeights) {
        assert!(matches!(
            weights.validate(),
            Err(ScreeningError::InvalidConfig(_))
        ));
    }

    #[rstest]
    #[case(0.0, 0.02)]
    #[case(1.0, 0.02)]
    #[case(0.05, 0.0)]
    #[case(0.05, f64::NAN)]
    fn test_invalid_delta_and_threshold(#[case] delta: f64, #[case] threshold: f64) {
        let config = ScreeningConfig {
            nominal_add_weight: delta,
            sector_gap_threshold: threshold,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_sum_message_names_total() {
        let weights = ScoreWeights {
            hhi: 0.25,
            ..Default::default()
        };
        let Err(ScreeningError::InvalidConfig(message)) = weights.validate() else {
            panic!("expected invalid config");
        };
        assert!(message.contains("got 1.10000000"));
    }

    #[test]
    fn test_deserialize_partial() {
        let config: ScreeningConfig =
            serde_json::from_str(r#"{"nominal_add_weight": 0.1}"#).unwrap();
        assert_eq!(config.nominal_add_weight, 0.1);
        assert_eq!(config.score_weights, ScoreWeights::default());
    }
}

//! Observation frequency of a price series.

use crate::PrimitivesError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Sampling frequency of prices and returns.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    /// Trading-day observations
    #[display("daily")]
    Daily,
    /// Weekly observations
    #[display("weekly")]
    Weekly,
    /// Month-end observations
    #[display("monthly")]
    Monthly,
}

impl Frequency {
    /// Standard annualization factor (periods per year) for this frequency.
    pub const fn periods_per_year(&self) -> u32 {
        match self {
            Self::Daily => 252,
            Self::Weekly => 52,
            Self::Monthly => 12,
        }
    }
}

impl FromStr for Frequency {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            _ => Err(PrimitivesError::UnsupportedValue {
                kind: "frequency",
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Frequency::Daily, 252)]
    #[case(Frequency::Weekly, 52)]
    #[case(Frequency::Monthly, 12)]
    fn test_periods_per_year(#[case] frequency: Frequency, #[case] expected: u32) {
        assert_eq!(frequency.periods_per_year(), expected);
    }

    #[test]
    fn test_parse_round_trips_display() {
        for frequency in [Frequency::Daily, Frequency::Weekly, Frequency::Monthly] {
            let parsed: Frequency = frequency.to_string().parse().unwrap();
            assert_eq!(parsed, frequency);
        }
    }

    #[test]
    fn test_unknown_frequency_is_rejected() {
        let err = "hourly".parse::<Frequency>().unwrap_err();
        assert!(err.to_string().contains("hourly"));
    }
}

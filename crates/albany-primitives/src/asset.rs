//! Asset identity and classification metadata.
//!
//! Metadata is only consumed for explanation text and the screening
//! sector-gap signal; numeric routines work on positional arrays.

use crate::PrimitivesError;
use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identity of an investable asset.
pub type AssetId = Uuid;

/// Broad asset class of an instrument.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetClass {
    /// Listed equity
    #[display("equity")]
    Equity,
    /// Bonds and other fixed income
    #[display("fixed_income")]
    FixedIncome,
    /// Commodities
    #[display("commodity")]
    Commodity,
    /// Listed real estate
    #[display("real_estate")]
    RealEstate,
    /// Cash and equivalents
    #[display("cash")]
    Cash,
    /// Digital assets
    #[display("crypto")]
    Crypto,
    /// Anything else
    #[display("other")]
    Other,
}

impl FromStr for AssetClass {
    type Err = PrimitivesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "equity" => Ok(Self::Equity),
            "fixed_income" => Ok(Self::FixedIncome),
            "commodity" => Ok(Self::Commodity),
            "real_estate" => Ok(Self::RealEstate),
            "cash" => Ok(Self::Cash),
            "crypto" => Ok(Self::Crypto),
            "other" => Ok(Self::Other),
            _ => Err(PrimitivesError::UnsupportedValue {
                kind: "asset class",
                value: s.to_string(),
            }),
        }
    }
}

/// GICS Level 1 sectors. Only equities carry a sector.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GicsSector {
    /// Energy
    #[display("Energy")]
    Energy,
    /// Materials
    #[display("Materials")]
    Materials,
    /// Industrials
    #[display("Industrials")]
    Industrials,
    /// Consumer Discretionary
    #[display("Consumer Discretionary")]
    ConsumerDiscretionary,
    /// Consumer Staples
    #[display("Consumer Staples")]
    ConsumerStaples,
    /// Health Care
    #[display("Health Care")]
    HealthCare,
    /// Financials
    #[display("Financials")]
    Financials,
    /// Information Technology
    #[display("Information Technology")]
    InformationTechnology,
    /// Communication Services
    #[display("Communication Services")]
    CommunicationServices,
    /// Utilities
    #[display("Utilities")]
    Utilities,
    /// Real Estate
    #[display("Real Estate")]
    RealEstate,
}

impl GicsSector {
    const ALL: [Self; 11] = [
        Self::Energy,
        Self::Materials,
        Self::Industrials,
        Self::ConsumerDiscretionary,
        Self::ConsumerStaples,
        Self::HealthCare,
        Self::Financials,
        Self::InformationTechnology,
        Self::CommunicationServices,
        Self::Utilities,
        Self::RealEstate,
    ];

    /// Two-digit GICS sector code.
    pub const fn code(&self) -> u8 {
        match self {
            Self::Energy => 10,
            Self::Materials => 15,
            Self::Industrials => 20,
            Self::ConsumerDiscretionary => 25,
            Self::ConsumerStaples => 30,
            Self::HealthCare => 35,
            Self::Financials => 40,
            Self::InformationTechnology => 45,
            Self::CommunicationServices => 50,
            Self::Utilities => 55,
            Self::RealEstate => 60,
        }
    }

    /// Look up a sector by its two-digit code.
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|sector| sector.code() == code)
    }
}

impl FromStr for GicsSector {
    type Err = PrimitivesError;

    /// Accepts the display name ("Health Care"), the snake_case serde name
    /// ("health_care") or the two-digit code ("35").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if let Ok(code) = trimmed.parse::<u8>() {
            if let Some(sector) = Self::from_code(code) {
                return Ok(sector);
            }
        }
        let normalized = trimmed.to_ascii_lowercase().replace(['_', '-'], " ");
        Self::ALL
            .into_iter()
            .find(|sector| sector.to_string().to_ascii_lowercase() == normalized)
            .ok_or_else(|| PrimitivesError::UnsupportedValue {
                kind: "GICS sector",
                value: s.to_string(),
            })
    }
}

/// Descriptive metadata for one asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Identity used to key weights and covariance columns
    pub id: AssetId,
    /// Exchange ticker, used to label holdings in explanations
    pub ticker: String,
    /// Broad asset class
    pub asset_class: AssetClass,
    /// GICS sector; `None` for non-equity assets
    pub sector: Option<GicsSector>,
}

impl Asset {
    /// Create an asset with a freshly generated id and no sector.
    pub fn new(ticker: impl Into<String>, asset_class: AssetClass) -> Self {
        Self {
            id: Uuid::new_v4(),
            ticker: ticker.into(),
            asset_class,
            sector: None,
        }
    }

    /// Use an externally minted id.
    pub fn with_id(mut self, id: AssetId) -> Self {
        self.id = id;
        self
    }

    /// Attach a GICS sector.
    pub fn with_sector(mut self, sector: GicsSector) -> Self {
        self.sector = Some(sector);
        self
    }
}

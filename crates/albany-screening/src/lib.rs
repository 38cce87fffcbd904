#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod explain;
pub mod normalize;
pub mod score;
pub mod signals;

mod context;

pub use config::{ScoreWeights, ScreeningConfig};
pub use error::{Result, ScreeningError};
pub use explain::{ReferenceStats, explain_score, sector_gap_clause};
pub use normalize::{DEGENERATE_SPAN, normalize_scores};
pub use score::{ScreeningRequest, ScreeningScore, score_candidates};
pub use signals::{
    average_correlation, hhi_reduction, marginal_volatility_reduction, pro_forma_weights,
    sector_gap_score,
};

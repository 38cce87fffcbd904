#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod assumptions;
pub mod correlation;
pub mod covariance;
pub mod error;
pub mod mu;
pub mod psd;
pub mod returns;
pub mod table;

pub use assumptions::{AssetStats, AssumptionConfig, Assumptions, estimate_assumptions};
pub use correlation::{compute_correlation, volatilities};
pub use covariance::{
    CovMethod, CovarianceEstimator, LedoitWolfConfig, LedoitWolfEstimator,
    SampleCovarianceEstimator, compute_sigma,
};
pub use error::{EstimationError, Result};
pub use mu::{DEFAULT_EWMA_HALFLIFE, MuEstimator, compute_mu};
pub use psd::{CovRepair, PSD_TOLERANCE, PsdRepair, PsdStatus, repair_psd, validate_psd};
pub use returns::{ReturnType, compute_returns};
pub use table::TimeSeriesTable;

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

mod convert;
pub mod eigen;
pub mod error;
pub mod factor;
pub mod stats;

pub use eigen::{SymmetricEigen, reconstruct_from_eigen, symmetric_eigen, symmetrize};
pub use error::{MathError, Result};
pub use factor::{Cholesky, LuDecomposition};
pub use stats::{
    correlation_from_covariance, effective_n, herfindahl, portfolio_variance,
    portfolio_volatility, volatilities,
};

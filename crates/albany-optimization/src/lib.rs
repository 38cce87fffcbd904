#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![deny(unsafe_code)]

pub mod constraints;
pub mod error;
pub mod explain;
pub mod feasibility;
pub mod portfolio;
pub mod request;
pub mod result;
pub mod risk;
pub mod run;
pub mod settings;

mod objective;
mod problem;
mod solver;

pub use constraints::{AssetBound, OptimizationConstraints};
pub use error::{OptimizationError, Result};
pub use feasibility::{Feasibility, check_feasibility};
pub use portfolio::{
    DEFAULT_FRONTIER_POINTS, clean_weights, compute_efficient_frontier, optimize_frontier_point,
    optimize_mvp, optimize_tangency,
};
pub use request::OptimizationRequest;
pub use result::{OptimizationStatus, PortfolioSolution, SolverMeta, SolverResult};
pub use risk::{PortfolioWeight, RiskDecomposition, compute_risk_decomposition, portfolio_weights};
pub use run::{Objective, RunSpec, RunType, run};
pub use settings::{QpSettings, SolverSettings};

/// Weights with absolute value below this are treated as zero.
pub const WEIGHT_TOLERANCE: f64 = 1e-8;

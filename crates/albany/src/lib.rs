#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub use albany_estimation as estimation;
pub use albany_math as math;
pub use albany_optimization as optimization;
pub use albany_primitives as primitives;
pub use albany_screening as screening;

pub use albany_primitives::{Asset, AssetClass, AssetId, AssetIndex, GicsSector};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/factordynamics/albany/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod asset;
pub mod error;
pub mod frequency;
pub mod index;

pub use asset::{Asset, AssetClass, AssetId, GicsSector};
pub use error::{PrimitivesError, Result};
pub use frequency::Frequency;
pub use index::AssetIndex;

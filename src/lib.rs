#![doc = include_str!("../README.md")]
#![no_std]
#![deny(
    unsafe_code,
    unused_imports,
    unused_variables,
    unused_must_use,
    missing_docs,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::dbg_macro,
    clippy::todo,
    clippy::unimplemented
)]
#![allow(clippy::len_without_is_empty)]

#[macro_use]
extern crate alloc;

pub(crate) type Kbn<T> = compensated_summation::KahanBabuskaNeumaier<T>;

mod utils;
pub(crate) use utils::{Window, helper};

mod error;
pub use error::Error;

mod preprocess;
pub use preprocess::{
    DEFAULT_OUTLIER_THRESHOLD, default_outlier_threshold, pct_change, remove_outliers, standardize,
    zscores,
};

mod pearson;
pub use pearson::{compute_pearson, compute_r_squared};

mod rolling_beta;
pub use rolling_beta::{RollingBeta, rolling_beta};

mod metrics;
pub use metrics::{
    MetricsConfig, MetricsTriple, beta_correlation, compute_correlation_metrics, rolling_beta_pair,
};

mod pairwise;
pub use pairwise::{PairMetrics, pairwise_metrics};

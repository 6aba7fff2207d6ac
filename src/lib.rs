//! # tally
//!
//! Support primitives for dashboards that chart sparse numeric data.
//!
//! - [`cluster`]: groups a flat list of magnitudes into a bounded number of
//!   contiguous ranges (complete-linkage, one-dimensional), ready to be painted
//!   as histogram buckets.
//! - [`sparse`]: a virtual array over a remote paged source. Only the visible
//!   window (plus a read-ahead margin) is fetched, and each gap is requested once.
//!
//! The two halves are independent; neither depends on the other.
//!
//! **Default build** has no HTTP client. The `http` feature adds
//! [`sparse::JsonFetcher`].

pub mod cluster;
/// Error types used across `tally`.
pub mod error;
pub mod sparse;

#[cfg(test)]
mod sparse_tests;

pub use error::{BoxError, Error, Result};

pub use cluster::{bucket_index, ClusterRange, Clusterer, Histogram, MergeHistory, Smoothing};
pub use sparse::{fetch_fn, Fetch, SparseArray, SparseArrayConfig, UpperBound};

#[cfg(feature = "http")]
pub use sparse::JsonFetcher;

//! One-dimensional clustering for histogram ranges.
//!
//! Dashboards that chart "missing strings per locale" get a long tail of
//! counts: dozens of locales near zero, a few in the hundreds. Fixed-width
//! buckets waste most of the chart. Instead, cluster the counts and draw one
//! bucket per cluster.
//!
//! ## Algorithm
//!
//! Complete-linkage agglomerative clustering on a line. Every value starts
//! alone; the two closest clusters are merged until at most `clusters_max`
//! remain **and** every remaining pair is farther apart than `level`.
//!
//! Distances are measured after a [`Smoothing`] transform (natural log by
//! default) so that `1 → 3` and `1000 → 3000` read as comparable spreads.
//!
//! | Smoothing | Effect |
//! |-----------|--------|
//! | `Ln` | Strong compression; groups by order of magnitude |
//! | `Sqrt` | Milder; what the l10n histogram uses with `level = 4` |
//! | `Identity` | Raw absolute gaps |
//!
//! ## Usage
//!
//! ```rust
//! use tally::cluster::{Clusterer, Histogram, Smoothing};
//!
//! let missing = vec![1.0, 2.0, 3.0, 50.0, 51.0, 100.0];
//! let mut clusterer = Clusterer::new(missing).with_smoothing(Smoothing::Sqrt);
//! let ranges = clusterer.get_ranges(Some(4.0)).unwrap();
//! assert_eq!(ranges.len(), 2);
//! assert_eq!((ranges[0].min, ranges[0].max), (1.0, 3.0));
//!
//! let hist = Histogram::build(ranges, vec![("de", 2.0), ("fr", 51.0)]);
//! assert_eq!(hist.bucket(1)[0].labels, vec!["fr"]);
//! ```

mod clusterer;
mod history;
mod ranges;
mod smoothing;

pub use clusterer::{Clusterer, DEFAULT_CLUSTERS_MAX};
pub use history::{MergeHistory, MergeStep};
pub use ranges::{bucket_index, Bin, ClusterRange, Histogram};
pub use smoothing::Smoothing;

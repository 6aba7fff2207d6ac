//! Complete-linkage agglomerative clustering for one-dimensional data.
//!
//! Start with every value in its own cluster and repeatedly merge the closest
//! pair. Clusters are kept sorted, so the complete-linkage distance between two
//! clusters only depends on their extremes:
//!
//! ```text
//! d(A, B) = max( s(A.max, B.min), s(B.max, A.min) )
//! s(a, b) = | smooth(a + 1) - smooth(b + 1) |
//! ```
//!
//! Merging continues while there are more than `clusters_max` clusters **or**
//! the closest pair is within `level`. It stops once both constraints hold.
//!
//! # Short-circuit search
//!
//! Complete linkage over a monotonic smoothing never produces inversions: the
//! minimum pairwise distance is non-decreasing from one merge to the next. So
//! when the scan meets a pair at exactly the previous minimum, that pair is
//! the first minimum in scan order and the scan can stop early. The result is
//! the same with or without the shortcut; it is only taken for smoothings
//! known to be monotonic.
//!
//! # Cost
//!
//! O(n²) per merge, O(n³) overall. Meant for hundreds of values, not millions.
//!
//! # Ties
//!
//! Equal distances are resolved by scan order (lowest pair index first). Merged
//! clusters are appended at the end of the working set, so the order is
//! deterministic for a fixed input order but otherwise implementation-defined.

use super::history::MergeHistory;
use super::ranges::ClusterRange;
use super::smoothing::Smoothing;
use crate::error::{Error, Result};
use tracing::{debug, trace};

/// Default upper bound on the number of clusters.
pub const DEFAULT_CLUSTERS_MAX: usize = 10;

/// Closest pair found by one scan.
#[derive(Debug, Clone, Copy)]
struct Closest {
    i: usize,
    j: usize,
    distance: f64,
}

/// One-dimensional complete-linkage clusterer.
///
/// Keeps the last computed partition, so [`Clusterer::get_ranges`] can be
/// called without a level to summarise it again.
#[derive(Debug, Clone)]
pub struct Clusterer {
    /// Input values, in caller order.
    data: Vec<f64>,
    /// Distance compression.
    smoothing: Smoothing,
    /// Upper bound on cluster count.
    clusters_max: usize,
    /// Last computed partition, ascending by first element.
    clusters: Option<Vec<Vec<f64>>>,
    /// Merges of the last run.
    history: MergeHistory,
}

impl Clusterer {
    /// Create a clusterer over `data` with natural-log smoothing.
    pub fn new(data: impl Into<Vec<f64>>) -> Self {
        let data = data.into();
        let n = data.len();
        Self {
            data,
            smoothing: Smoothing::default(),
            clusters_max: DEFAULT_CLUSTERS_MAX,
            clusters: None,
            history: MergeHistory::new(n),
        }
    }

    /// Set the smoothing function.
    pub fn with_smoothing(mut self, smoothing: Smoothing) -> Self {
        self.smoothing = smoothing;
        self
    }

    /// Set the upper bound on cluster count used by [`Clusterer::get_clusters`].
    pub fn with_clusters_max(mut self, clusters_max: usize) -> Self {
        self.clusters_max = clusters_max;
        self
    }

    /// Input values.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Configured smoothing.
    pub fn smoothing(&self) -> Smoothing {
        self.smoothing
    }

    /// Configured upper bound on cluster count.
    pub fn clusters_max(&self) -> usize {
        self.clusters_max
    }

    /// Last computed partition, if any.
    pub fn clusters(&self) -> Option<&[Vec<f64>]> {
        self.clusters.as_deref()
    }

    /// Merges performed by the last run.
    pub fn history(&self) -> &MergeHistory {
        &self.history
    }

    /// Cluster with the configured `clusters_max`.
    pub fn get_clusters(&mut self, level: f64) -> Result<&[Vec<f64>]> {
        self.get_clusters_bounded(level, self.clusters_max)
    }

    /// Partition the data so that at most `clusters_max` clusters remain and
    /// no two clusters are within `level` of each other.
    ///
    /// Returns clusters ascending by first element, each sorted ascending.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `level` is negative or NaN, if
    /// `clusters_max` is zero, or if the data holds non-finite values.
    pub fn get_clusters_bounded(
        &mut self,
        level: f64,
        clusters_max: usize,
    ) -> Result<&[Vec<f64>]> {
        if level.is_nan() || level < 0.0 {
            return Err(Error::InvalidParameter {
                name: "level",
                message: "must be a non-negative number",
            });
        }
        if clusters_max == 0 {
            return Err(Error::InvalidParameter {
                name: "clusters_max",
                message: "must be at least 1",
            });
        }
        if self.data.iter().any(|x| !x.is_finite()) {
            return Err(Error::InvalidParameter {
                name: "data",
                message: "values must be finite",
            });
        }

        let mut clusters: Vec<Vec<f64>> = self.data.iter().map(|&x| vec![x]).collect();
        let mut history = MergeHistory::new(clusters.len());

        let mut closest = self.closest_pair(&clusters, 0.0);
        while let Some(pair) = closest {
            if !(clusters.len() > clusters_max || pair.distance <= level) {
                break;
            }
            let (min, max, size) = merge(&mut clusters, pair.i, pair.j);
            trace!(min, max, size, distance = pair.distance, "merged clusters");
            history.record(min, max, pair.distance, size);
            closest = self.closest_pair(&clusters, pair.distance);
        }

        clusters.sort_by(|a, b| a[0].total_cmp(&b[0]));
        debug!(
            n_items = self.data.len(),
            n_clusters = clusters.len(),
            n_merges = history.n_merges(),
            level,
            clusters_max,
            "clustering converged"
        );

        self.history = history;
        let stored = self.clusters.insert(clusters);
        Ok(stored.as_slice())
    }

    /// Summarise clusters as `{min, max, count}` ranges, ascending by `min`.
    ///
    /// With `Some(level)` the data is re-clustered first. With `None` the last
    /// computed partition is reused.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidState`] if `level` is `None` and nothing has been
    /// clustered yet; otherwise as [`Clusterer::get_clusters`].
    pub fn get_ranges(&mut self, level: Option<f64>) -> Result<Vec<ClusterRange>> {
        let clusters = match level {
            Some(level) => self.get_clusters(level)?,
            None => self
                .clusters
                .as_deref()
                .ok_or(Error::InvalidState("no prior clustering to derive ranges from"))?,
        };
        Ok(clusters
            .iter()
            .map(|c| ClusterRange::from_sorted(c))
            .collect())
    }

    /// Complete-linkage distance between two sorted clusters.
    #[inline]
    fn linkage_distance(&self, a: &[f64], b: &[f64]) -> f64 {
        let s = &self.smoothing;
        s.distance(a[a.len() - 1], b[0])
            .max(s.distance(b[b.len() - 1], a[0]))
    }

    /// Linear scan for the closest pair; `None` when fewer than two clusters.
    fn closest_pair(&self, clusters: &[Vec<f64>], prev_min: f64) -> Option<Closest> {
        let short_circuit = self.smoothing.is_monotonic();
        let mut best: Option<Closest> = None;
        for i in 0..clusters.len() {
            for j in (i + 1)..clusters.len() {
                let distance = self.linkage_distance(&clusters[i], &clusters[j]);
                if short_circuit && distance == prev_min {
                    return Some(Closest { i, j, distance });
                }
                if best.map_or(true, |b| distance < b.distance) {
                    best = Some(Closest { i, j, distance });
                }
            }
        }
        best
    }
}

/// Replace clusters `i < j` with their sorted union, appended at the end.
///
/// Returns the merged cluster's extremes and size.
fn merge(clusters: &mut Vec<Vec<f64>>, i: usize, j: usize) -> (f64, f64, usize) {
    let b = clusters.remove(j);
    let mut merged = clusters.remove(i);
    merged.extend(b);
    merged.sort_by(|x, y| x.total_cmp(y));
    let out = (merged[0], merged[merged.len() - 1], merged.len());
    clusters.push(merged);
    out
}

//! Cluster summaries and histogram bucketing.

use serde::{Deserialize, Serialize};

/// Summary of one cluster.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterRange {
    /// Smallest member.
    pub min: f64,
    /// Largest member.
    pub max: f64,
    /// Number of members.
    pub count: usize,
}

impl ClusterRange {
    /// Summarise a non-empty cluster sorted ascending.
    pub(crate) fn from_sorted(cluster: &[f64]) -> Self {
        Self {
            min: cluster[0],
            max: cluster[cluster.len() - 1],
            count: cluster.len(),
        }
    }

    /// Whether `value` lies within `[min, max]`.
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Index of the first range whose `max` is at least `value`.
///
/// `ranges` must be ascending. Values falling in a gap between two ranges land
/// in the upper one. `None` when `value` exceeds every range.
pub fn bucket_index(ranges: &[ClusterRange], value: f64) -> Option<usize> {
    let i = ranges.partition_point(|r| value > r.max);
    (i < ranges.len()).then_some(i)
}

/// Labels sharing one exact value inside a bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct Bin<L> {
    /// The shared value.
    pub value: f64,
    /// Labels carrying it, in insertion order.
    pub labels: Vec<L>,
}

/// Labelled values grouped by cluster range, then by exact value.
///
/// The dashboard histogram draws one block per bucket and one bar per distinct
/// value, with bar height proportional to the number of labels.
#[derive(Debug, Clone)]
pub struct Histogram<L> {
    ranges: Vec<ClusterRange>,
    buckets: Vec<Vec<Bin<L>>>,
    overflow: Vec<(L, f64)>,
}

impl<L> Histogram<L> {
    /// Group `(label, value)` pairs by the bucket each value falls in.
    ///
    /// Values past the last range are kept aside in [`Histogram::overflow`].
    pub fn build(ranges: Vec<ClusterRange>, items: impl IntoIterator<Item = (L, f64)>) -> Self {
        let mut buckets: Vec<Vec<Bin<L>>> = ranges.iter().map(|_| Vec::new()).collect();
        let mut overflow = Vec::new();

        for (label, value) in items {
            let Some(b) = bucket_index(&ranges, value) else {
                overflow.push((label, value));
                continue;
            };
            let bins = &mut buckets[b];
            match bins.binary_search_by(|bin| bin.value.total_cmp(&value)) {
                Ok(pos) => bins[pos].labels.push(label),
                Err(pos) => bins.insert(
                    pos,
                    Bin {
                        value,
                        labels: vec![label],
                    },
                ),
            }
        }

        Self {
            ranges,
            buckets,
            overflow,
        }
    }

    /// Ranges the buckets were built from.
    pub fn ranges(&self) -> &[ClusterRange] {
        &self.ranges
    }

    /// Bins of bucket `i`, ascending by value.
    pub fn bucket(&self, i: usize) -> &[Bin<L>] {
        self.buckets.get(i).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of buckets.
    pub fn n_buckets(&self) -> usize {
        self.buckets.len()
    }

    /// Items whose value exceeded every range.
    pub fn overflow(&self) -> &[(L, f64)] {
        &self.overflow
    }

    /// Largest number of labels in any one bin (at least 1, for scaling bars).
    pub fn max_count(&self) -> usize {
        self.buckets
            .iter()
            .flatten()
            .map(|bin| bin.labels.len())
            .max()
            .unwrap_or(0)
            .max(1)
    }
}

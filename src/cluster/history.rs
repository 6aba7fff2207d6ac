//! Merge history of one clustering run.
//!
//! One-dimensional clusters are contiguous, so a merge is fully described by
//! the extremes of the resulting cluster; no id bookkeeping is needed.

/// A single merge in a clustering run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeStep {
    /// Smallest value in the merged cluster.
    pub min: f64,
    /// Largest value in the merged cluster.
    pub max: f64,
    /// Complete-linkage distance at which the merge happened.
    pub distance: f64,
    /// Size of the resulting cluster.
    pub size: usize,
}

/// Ordered record of the merges performed by the last clustering run.
#[derive(Debug, Clone, Default)]
pub struct MergeHistory {
    steps: Vec<MergeStep>,
    n_items: usize,
}

impl MergeHistory {
    /// Create an empty history for n items.
    pub fn new(n_items: usize) -> Self {
        Self {
            steps: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge.
    pub fn record(&mut self, min: f64, max: f64, distance: f64, size: usize) {
        self.steps.push(MergeStep {
            min,
            max,
            distance,
            size,
        });
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.steps.len()
    }

    /// Number of clusters left after all recorded merges.
    pub fn n_clusters(&self) -> usize {
        self.n_items.saturating_sub(self.steps.len())
    }

    /// Iterate over merges in the order they happened.
    pub fn steps(&self) -> impl Iterator<Item = &MergeStep> {
        self.steps.iter()
    }

    /// Merge distances, in merge order.
    pub fn distances(&self) -> Vec<f64> {
        self.steps.iter().map(|m| m.distance).collect()
    }

    /// Whether merge distances never decrease.
    ///
    /// Holds for complete linkage over a monotonic smoothing.
    pub fn is_monotone(&self) -> bool {
        self.steps.windows(2).all(|w| w[0].distance <= w[1].distance)
    }
}

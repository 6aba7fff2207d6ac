//! Fetch capability injected into a sparse array.

use std::future::Future;
use std::ops::Range;

use async_trait::async_trait;

use crate::error::BoxError;

/// Source of elements for a [`SparseArray`](super::SparseArray).
///
/// `range` is half-open. A successful fetch returns exactly `range.len()`
/// elements, in index order.
#[async_trait]
pub trait Fetch<T>: Send + Sync {
    /// Fetch the elements at `range`.
    async fn fetch(&self, range: Range<usize>) -> Result<Vec<T>, BoxError>;

    /// Total length as reported by the source, if it reports one.
    async fn length(&self) -> Result<Option<usize>, BoxError> {
        Ok(None)
    }
}

/// [`Fetch`] backed by an async closure.
#[derive(Debug, Clone)]
pub struct FnFetch<F> {
    f: F,
}

/// Wrap an async closure `Fn(Range<usize>) -> Future<Output = Result<Vec<T>, BoxError>>`.
///
/// ```rust
/// use tally::{fetch_fn, SparseArray, SparseArrayConfig};
///
/// let rows = fetch_fn(|range: std::ops::Range<usize>| async move {
///     Ok::<_, tally::BoxError>(range.map(|i| i * 10).collect::<Vec<_>>())
/// });
/// let array = SparseArray::new(SparseArrayConfig::new().with_length(50), rows);
/// assert_eq!(array.get_blocking(3, 6).unwrap(), vec![30, 40, 50]);
/// ```
pub fn fetch_fn<F>(f: F) -> FnFetch<F> {
    FnFetch { f }
}

#[async_trait]
impl<T, F, Fut> Fetch<T> for FnFetch<F>
where
    T: Send + 'static,
    F: Fn(Range<usize>) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Vec<T>, BoxError>> + Send,
{
    async fn fetch(&self, range: Range<usize>) -> Result<Vec<T>, BoxError> {
        (self.f)(range).await
    }
}

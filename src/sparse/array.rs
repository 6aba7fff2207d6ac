//! Lazily loaded virtual array.

use std::collections::BTreeMap;
use std::ops::Range;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::{debug, trace, warn};

use super::config::SparseArrayConfig;
use super::fetch::Fetch;
use super::gap;
use crate::error::{Error, Result};

/// Virtual array of `len()` elements, fetched on demand in coalesced batches.
///
/// Elements that have not been fetched are absent, not placeholders. Once
/// installed an element is never replaced or evicted.
///
/// At most one fetch is in flight per array. Calls to [`SparseArray::get`]
/// that need data while a fetch is running wait for it, then re-check the
/// cache before fetching anything themselves.
///
/// Fetches run on a spawned tokio task, so a fetch completes and installs its
/// elements even if the caller that started it goes away.
pub struct SparseArray<T, F> {
    config: SparseArrayConfig,
    fetcher: Arc<F>,
    items: Arc<RwLock<BTreeMap<usize, T>>>,
    /// Held by the fetch task until its elements are installed.
    fetch_gate: Arc<Mutex<()>>,
    fetches: AtomicUsize,
}

impl<T, F> std::fmt::Debug for SparseArray<T, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SparseArray")
            .field("config", &self.config)
            .field("resident", &self.items.read().len())
            .field("fetches", &self.fetches.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl<T, F> SparseArray<T, F>
where
    T: Clone + Send + Sync + 'static,
    F: Fetch<T> + 'static,
{
    /// Create an empty array with the configured length and read-ahead.
    pub fn new(config: SparseArrayConfig, fetcher: F) -> Self {
        Self {
            config,
            fetcher: Arc::new(fetcher),
            items: Arc::new(RwLock::new(BTreeMap::new())),
            fetch_gate: Arc::new(Mutex::new(())),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Create an array whose length is whatever the fetcher reports.
    ///
    /// Falls back to `config.length` when the fetcher reports none.
    pub async fn with_reported_length(mut config: SparseArrayConfig, fetcher: F) -> Result<Self> {
        if let Some(length) = fetcher.length().await.map_err(Error::Length)? {
            debug!(length, configured = config.length, "using reported length");
            config.length = length;
        }
        Ok(Self::new(config, fetcher))
    }

    /// Total logical length. Never touches the network.
    pub fn len(&self) -> usize {
        self.config.length
    }

    /// Whether the logical length is zero.
    pub fn is_empty(&self) -> bool {
        self.config.length == 0
    }

    /// Read-ahead margin.
    pub fn buffer_size(&self) -> usize {
        self.config.buffer_size
    }

    /// Configuration the array was built with.
    pub fn config(&self) -> &SparseArrayConfig {
        &self.config
    }

    /// Number of fetches issued so far.
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Relaxed)
    }

    /// Whether a fetch is currently in flight.
    pub fn is_fetching(&self) -> bool {
        self.fetch_gate.try_lock().is_err()
    }

    /// Number of resident elements.
    pub fn resident_count(&self) -> usize {
        self.items.read().len()
    }

    /// Whether every index in `range` is resident.
    pub fn is_resident(&self, range: Range<usize>) -> bool {
        range.is_empty() || self.items.read().range(range.clone()).count() == range.len()
    }

    /// Install elements that are already known, starting at `offset`.
    ///
    /// Indices past `len()` and indices already resident are skipped.
    /// Returns the number of elements installed.
    pub fn preload(&self, offset: usize, items: impl IntoIterator<Item = T>) -> usize {
        let len = self.len();
        let mut resident = self.items.write();
        let mut installed = 0;
        for (i, item) in (offset..len).zip(items) {
            if let std::collections::btree_map::Entry::Vacant(slot) = resident.entry(i) {
                slot.insert(item);
                installed += 1;
            }
        }
        trace!(offset, installed, "preloaded elements");
        installed
    }

    /// Lowest resident index whose element satisfies `predicate`.
    pub fn position(&self, mut predicate: impl FnMut(&T) -> bool) -> Option<usize> {
        self.items
            .read()
            .iter()
            .find(|(_, item)| predicate(item))
            .map(|(&i, _)| i)
    }

    /// Elements at `[from, to)`.
    ///
    /// `to` is clamped to `len()`. Served from cache when the window is
    /// resident. Otherwise the window is widened by the read-ahead margin, the
    /// smallest span covering every missing index in it is fetched in one
    /// request, and the window is served once that request has been installed.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidRange`] if `from > to`.
    /// - [`Error::Fetch`] if the fetcher fails; nothing is installed.
    /// - [`Error::FetchLengthMismatch`] if the fetcher returns the wrong number
    ///   of elements; nothing is installed.
    ///
    /// Failed fetches are not retried. Must be polled inside a tokio runtime.
    pub async fn get(&self, from: usize, to: usize) -> Result<Vec<T>> {
        if from > to {
            return Err(Error::InvalidRange {
                from,
                to,
                len: self.len(),
            });
        }
        let to = to.min(self.len());
        let from = from.min(to);

        if let Some(window) = self.window(from, to) {
            trace!(from, to, "served from cache");
            return Ok(window);
        }

        let gate = Arc::clone(&self.fetch_gate).lock_owned().await;

        // An earlier fetch may have covered the window while we waited.
        if let Some(window) = self.window(from, to) {
            trace!(from, to, "served after in-flight fetch");
            return Ok(window);
        }

        let span = gap::padded(from, to, self.buffer_size(), self.len());
        let Some(range) = self.missing(span) else {
            return Err(Error::InvalidState("window not resident but no gap found"));
        };

        self.fetches.fetch_add(1, Ordering::Relaxed);
        debug!(
            start = range.start,
            end = range.end,
            from,
            to,
            "fetching missing range"
        );

        let task = tokio::spawn(fill(
            Arc::clone(&self.fetcher),
            Arc::clone(&self.items),
            range.clone(),
            gate,
        ));
        match task.await {
            Ok(filled) => filled?,
            Err(join) => return Err(Error::fetch(range, join)),
        }

        self.window(from, to)
            .ok_or(Error::InvalidState("window not resident after fetch"))
    }

    /// Blocking form of [`SparseArray::get`], driven on a private
    /// current-thread runtime.
    ///
    /// Returns [`Error::InvalidState`] when called from inside an async
    /// runtime; use [`SparseArray::get`] there.
    pub fn get_blocking(&self, from: usize, to: usize) -> Result<Vec<T>> {
        if tokio::runtime::Handle::try_current().is_ok() {
            return Err(Error::InvalidState(
                "get_blocking called from inside an async runtime",
            ));
        }
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        runtime.block_on(self.get(from, to))
    }

    /// Cloned window, if every index in it is resident.
    fn window(&self, from: usize, to: usize) -> Option<Vec<T>> {
        let items = self.items.read();
        let window: Vec<T> = items.range(from..to).map(|(_, item)| item.clone()).collect();
        (window.len() == to - from).then_some(window)
    }

    fn missing(&self, span: Range<usize>) -> Option<Range<usize>> {
        let items = self.items.read();
        gap::missing_span(span, |i| items.contains_key(&i))
    }
}

/// Fetch `range` and install it. Holds `_gate` until done.
async fn fill<T, F>(
    fetcher: Arc<F>,
    items: Arc<RwLock<BTreeMap<usize, T>>>,
    range: Range<usize>,
    _gate: OwnedMutexGuard<()>,
) -> Result<()>
where
    T: Send + Sync,
    F: Fetch<T>,
{
    let fetched = match fetcher.fetch(range.clone()).await {
        Ok(fetched) => fetched,
        Err(source) => {
            warn!(start = range.start, end = range.end, error = %source, "fetch failed");
            return Err(Error::fetch(range, source));
        }
    };
    if fetched.len() != range.len() {
        warn!(
            start = range.start,
            end = range.end,
            received = fetched.len(),
            "fetch returned wrong number of elements"
        );
        return Err(Error::FetchLengthMismatch {
            expected: range.len(),
            received: fetched.len(),
            range,
        });
    }

    install(&items, range.clone(), fetched);
    debug!(start = range.start, end = range.end, "installed fetched range");
    Ok(())
}

/// Existing entries win; installed elements are never replaced.
fn install<T>(items: &RwLock<BTreeMap<usize, T>>, range: Range<usize>, fetched: Vec<T>) {
    let mut items = items.write();
    for (i, item) in range.zip(fetched) {
        items.entry(i).or_insert(item);
    }
}

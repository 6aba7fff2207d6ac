#[cfg(test)]
mod tests {
    use std::ops::Range;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    use parking_lot::Mutex;
    use tokio::sync::Notify;

    use crate::sparse::{fetch_fn, Fetch, SparseArray, SparseArrayConfig};
    use crate::{BoxError, Error};

    type Calls = Arc<Mutex<Vec<Range<usize>>>>;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn config(length: usize, buffer: usize) -> SparseArrayConfig {
        SparseArrayConfig::new()
            .with_length(length)
            .with_buffer_size(buffer)
    }

    /// Fetcher that signals `started` and then blocks until `release` fires.
    fn held(calls: Calls, started: Arc<Notify>, release: Arc<Notify>) -> impl Fetch<usize> {
        fetch_fn(move |range: Range<usize>| {
            calls.lock().push(range.clone());
            let started = Arc::clone(&started);
            let release = Arc::clone(&release);
            async move {
                started.notify_one();
                release.notified().await;
                Ok::<_, BoxError>(range.collect())
            }
        })
    }

    async fn wait_idle<F: Fetch<usize> + 'static>(array: &SparseArray<usize, F>) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while array.is_fetching() {
                tokio::task::yield_now().await;
            }
        })
        .await
        .expect("fetch did not finish");
    }

    #[tokio::test]
    async fn test_overlapping_get_waits_for_in_flight_fetch() {
        init_tracing();
        let calls: Calls = Arc::default();
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let array = Arc::new(SparseArray::new(
            config(100, 5),
            held(calls.clone(), started.clone(), release.clone()),
        ));

        let first = tokio::spawn({
            let array = Arc::clone(&array);
            async move { array.get(20, 30).await }
        });
        started.notified().await;
        assert!(array.is_fetching());

        let second = tokio::spawn({
            let array = Arc::clone(&array);
            async move { array.get(22, 28).await }
        });
        tokio::task::yield_now().await;
        release.notify_one();

        let first = first.await.unwrap().unwrap();
        let second = second.await.unwrap().unwrap();
        assert_eq!(first, (20..30).collect::<Vec<_>>());
        assert_eq!(second, (22..28).collect::<Vec<_>>());
        assert_eq!(*calls.lock(), vec![15..35]);
        assert_eq!(array.fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_dropped_caller_does_not_cancel_fetch() {
        let calls: Calls = Arc::default();
        let started = Arc::new(Notify::new());
        let release = Arc::new(Notify::new());
        let array = Arc::new(SparseArray::new(
            config(100, 5),
            held(calls.clone(), started.clone(), release.clone()),
        ));

        let caller = tokio::spawn({
            let array = Arc::clone(&array);
            async move { array.get(40, 50).await }
        });
        started.notified().await;
        caller.abort();
        assert!(caller.await.unwrap_err().is_cancelled());

        release.notify_one();
        wait_idle(&array).await;

        assert!(array.is_resident(35..55));
        assert_eq!(array.get(40, 50).await.unwrap(), (40..50).collect::<Vec<_>>());
        assert_eq!(calls.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_fetch_installs_nothing_and_is_not_retried() {
        init_tracing();
        let attempts = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&attempts);
        let fetcher = fetch_fn(move |range: Range<usize>| {
            let attempt = counter.fetch_add(1, Ordering::SeqCst);
            async move {
                if attempt == 0 {
                    Err(BoxError::from("connection reset"))
                } else {
                    Ok(range.collect::<Vec<usize>>())
                }
            }
        });
        let array = SparseArray::new(config(50, 2), fetcher);

        let err = array.get(10, 20).await.unwrap_err();
        assert!(matches!(err, Error::Fetch { ref range, .. } if *range == (8..22)));
        assert_eq!(attempts.load(Ordering::SeqCst), 1);
        assert_eq!(array.resident_count(), 0);
        assert!(!array.is_fetching());

        // The caller decides to try again.
        assert_eq!(array.get(10, 12).await.unwrap(), vec![10, 11]);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_short_page_is_rejected() {
        let fetcher = fetch_fn(|range: Range<usize>| async move {
            Ok::<_, BoxError>(range.skip(1).collect::<Vec<usize>>())
        });
        let array = SparseArray::new(config(20, 0), fetcher);

        let err = array.get(0, 5).await.unwrap_err();
        assert!(matches!(
            err,
            Error::FetchLengthMismatch { expected: 5, received: 4, .. }
        ));
        assert!(err.is_fetch());
        assert_eq!(array.resident_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_views_only_fetch_missing_edges() {
        let calls: Calls = Arc::default();
        let log = Arc::clone(&calls);
        let fetcher = fetch_fn(move |range: Range<usize>| {
            log.lock().push(range.clone());
            async move {
                tokio::time::sleep(Duration::from_millis(2)).await;
                Ok::<_, BoxError>(range.map(|i| i * 3).collect())
            }
        });
        let array = Arc::new(SparseArray::new(config(500, 8), fetcher));

        let windows: Vec<(usize, usize)> = (0..24)
            .map(|k| {
                let from = (k * 37) % 460;
                (from, from + 30)
            })
            .collect();
        let handles: Vec<_> = windows
            .iter()
            .map(|&(from, to)| {
                let array = Arc::clone(&array);
                tokio::spawn(async move { (from, to, array.get(from, to).await) })
            })
            .collect();

        for handle in handles {
            let (from, to, got) = handle.await.unwrap();
            assert_eq!(got.unwrap(), (from..to).map(|i| i * 3).collect::<Vec<_>>());
        }

        // Coalesced spans may cover resident islands, but both edges of every
        // span must have been missing when it was requested.
        let calls = calls.lock();
        let mut seen = vec![false; 500];
        for range in calls.iter() {
            assert!(!seen[range.start], "{range:?} starts on a resident index");
            assert!(!seen[range.end - 1], "{range:?} ends on a resident index");
            for i in range.clone() {
                seen[i] = true;
            }
        }
        assert_eq!(calls.len(), array.fetch_count());
    }
}

//! Bounded tile dispatch.
//!
//! The scheduler spawns one task per coordinate, but only after acquiring a
//! permit from the [`ConcurrencyLimiter`]. Outcomes travel back over an mpsc
//! channel in completion order.
//!
//! ```text
//! coords ──► dispatcher ──acquire──► spawn(fetch) ──► mpsc ──► CompletionStream
//!                │                                            ▲
//!                └── reaps panicked tasks ── placeholder ─────┘
//! ```

use super::ConcurrencyLimiter;
use crate::coord::TileCoord;
use crate::provider::Transport;
use crate::tile::{AttemptError, FetchOutcome, TileDecoder, TileFetcher};
use futures::Stream;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::{Id, JoinError, JoinHandle, JoinSet};
use tracing::{debug, error, info, instrument};

/// Totals reported once every dispatched task has completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchSummary {
    /// Number of coordinates dispatched
    pub dispatched: usize,
    /// Highest number of fetches in flight at once
    pub peak_in_flight: usize,
}

/// Dispatches fetches with at most `workers` in flight.
pub struct TileScheduler<T, D> {
    fetcher: Arc<TileFetcher<T, D>>,
    limiter: Arc<ConcurrencyLimiter>,
}

impl<T, D> TileScheduler<T, D>
where
    T: Transport + 'static,
    D: TileDecoder + 'static,
{
    /// Creates a scheduler.
    ///
    /// # Panics
    ///
    /// Panics if `workers` is 0.
    pub fn new(fetcher: TileFetcher<T, D>, workers: usize) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            limiter: Arc::new(ConcurrencyLimiter::new(workers)),
        }
    }

    /// Returns the limiter shared by every dispatched task.
    pub fn limiter(&self) -> &Arc<ConcurrencyLimiter> {
        &self.limiter
    }

    /// Dispatches every coordinate and returns the stream of outcomes.
    ///
    /// Must be called from within a Tokio runtime. The stream yields exactly
    /// one outcome per coordinate and ends once all of them have been sent.
    pub fn dispatch<I>(&self, coords: I) -> CompletionStream
    where
        I: IntoIterator<Item = TileCoord>,
        I::IntoIter: Send + 'static,
    {
        let coords = coords.into_iter();
        let (tx, rx) = mpsc::channel(self.limiter.max_concurrent());

        let dispatcher = tokio::spawn(run_dispatcher(
            coords,
            Arc::clone(&self.fetcher),
            Arc::clone(&self.limiter),
            tx,
        ));

        CompletionStream {
            rx,
            dispatcher: Some(dispatcher),
        }
    }
}

#[instrument(
    name = "dispatch",
    skip_all,
    fields(workers = limiter.max_concurrent())
)]
async fn run_dispatcher<I, T, D>(
    coords: I,
    fetcher: Arc<TileFetcher<T, D>>,
    limiter: Arc<ConcurrencyLimiter>,
    tx: mpsc::Sender<FetchOutcome>,
) -> DispatchSummary
where
    I: Iterator<Item = TileCoord>,
    T: Transport + 'static,
    D: TileDecoder + 'static,
{
    let tile_size = fetcher.settings().tile_size;
    let mut tasks = JoinSet::new();
    let mut pending: HashMap<Id, TileCoord> = HashMap::new();
    let mut dispatched = 0usize;

    for coord in coords {
        // Waits here while `workers` fetches are in flight
        let permit = limiter.acquire().await;

        if tx.is_closed() {
            debug!(dispatched, "Completion stream closed, dispatching stopped");
            break;
        }

        let fetcher = Arc::clone(&fetcher);
        let task_tx = tx.clone();
        let handle = tasks.spawn(async move {
            let _permit = permit;
            let outcome = fetcher.fetch(coord).await;
            // Receiver gone means the caller stopped listening
            let _ = task_tx.send(outcome).await;
        });
        pending.insert(handle.id(), coord);
        dispatched += 1;

        while let Some(result) = tasks.try_join_next_with_id() {
            reap(result, &mut pending, &tx, tile_size).await;
        }
    }

    debug!(dispatched, "All tiles dispatched, draining workers");

    while let Some(result) = tasks.join_next_with_id().await {
        reap(result, &mut pending, &tx, tile_size).await;
    }

    let summary = DispatchSummary {
        dispatched,
        peak_in_flight: limiter.peak_in_flight(),
    };
    info!(
        dispatched = summary.dispatched,
        peak_in_flight = summary.peak_in_flight,
        "Dispatch complete"
    );
    summary
}

/// Handles one finished task; a task that died is re-emitted as a placeholder.
async fn reap(
    result: Result<(Id, ()), JoinError>,
    pending: &mut HashMap<Id, TileCoord>,
    tx: &mpsc::Sender<FetchOutcome>,
    tile_size: u32,
) {
    match result {
        Ok((id, ())) => {
            pending.remove(&id);
        }
        Err(e) => {
            let Some(coord) = pending.remove(&e.id()) else {
                error!(error = %e, "Unknown fetch task failed");
                return;
            };
            error!(
                x = coord.x,
                y = coord.y,
                error = %e,
                "Fetch task failed, using transparent placeholder"
            );
            let outcome = FetchOutcome::placeholder(
                coord,
                tile_size,
                0,
                AttemptError::Aborted(e.to_string()),
            );
            let _ = tx.send(outcome).await;
        }
    }
}

/// Outcomes of a dispatch, in completion order.
///
/// Implements [`Stream`]; [`CompletionStream::next`] is the inherent
/// shorthand. Dropping the stream aborts the dispatcher together with every
/// fetch still in flight.
pub struct CompletionStream {
    rx: mpsc::Receiver<FetchOutcome>,
    dispatcher: Option<JoinHandle<DispatchSummary>>,
}

impl CompletionStream {
    /// Waits for the next completed tile, or `None` once every tile is in.
    pub async fn next(&mut self) -> Option<FetchOutcome> {
        self.rx.recv().await
    }

    /// Closes the stream and waits for the dispatcher's summary.
    ///
    /// Call after draining; coordinates not yet dispatched are skipped.
    pub async fn finish(mut self) -> Result<DispatchSummary, JoinError> {
        self.rx.close();
        match self.dispatcher.take() {
            Some(dispatcher) => dispatcher.await,
            None => Ok(DispatchSummary {
                dispatched: 0,
                peak_in_flight: 0,
            }),
        }
    }
}

impl Drop for CompletionStream {
    fn drop(&mut self) {
        if let Some(dispatcher) = self.dispatcher.take() {
            // Dropping the aborted dispatcher's JoinSet aborts its fetch tasks
            dispatcher.abort();
        }
    }
}

impl Stream for CompletionStream {
    type Item = FetchOutcome;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.rx.poll_recv(cx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::GridSpec;
    use crate::progress::FetchStats;
    use crate::provider::{MockTransport, RequestHeaders, TransportError, UrlTemplate};
    use crate::tile::{FetchSettings, ImageDecoder, TileSource};
    use futures::StreamExt;
    use std::collections::HashSet;
    use std::time::Duration;

    fn settings(tile_size: u32) -> FetchSettings {
        FetchSettings {
            urls: UrlTemplate::parse("https://tiles.example.com/{x}/{y}.png", "").unwrap(),
            headers: RequestHeaders::default(),
            timeout: Duration::from_secs(1),
            max_attempts: 1,
            tile_size,
        }
    }

    fn scheduler<T: Transport + 'static>(
        transport: Arc<T>,
        workers: usize,
    ) -> TileScheduler<T, ImageDecoder> {
        let fetcher = TileFetcher::new(
            transport,
            Arc::new(ImageDecoder),
            settings(2),
            Arc::new(FetchStats::new()),
        );
        TileScheduler::new(fetcher, workers)
    }

    /// Transport that panics for one tile and 404s the rest.
    struct PanickyTransport;

    impl Transport for PanickyTransport {
        async fn get(
            &self,
            url: &str,
            _headers: &RequestHeaders,
            _timeout: Duration,
        ) -> Result<Vec<u8>, TransportError> {
            if url.ends_with("/1/0.png") {
                panic!("transport exploded");
            }
            Err(TransportError::Status(404))
        }
    }

    #[tokio::test]
    async fn test_every_coord_yields_once() {
        let transport = Arc::new(MockTransport::new(Err(TransportError::Status(500))));
        let scheduler = scheduler(Arc::clone(&transport), 4);
        let grid = GridSpec::new(5, 2);

        let mut stream = scheduler.dispatch(grid.coords());
        let mut seen = HashSet::new();
        while let Some(outcome) = stream.next().await {
            assert!(seen.insert(outcome.coord), "duplicate {}", outcome.coord);
        }
        let summary = stream.finish().await.unwrap();

        assert_eq!(seen.len(), 25);
        assert_eq!(summary.dispatched, 25);
        assert_eq!(transport.total_calls(), 25);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_in_flight_never_exceeds_workers() {
        let transport = Arc::new(
            MockTransport::new(Err(TransportError::Status(503)))
                .with_delay(Duration::from_millis(5)),
        );
        let scheduler = scheduler(Arc::clone(&transport), 3);

        let stream = scheduler.dispatch(GridSpec::new(6, 2).coords());
        let outcomes: Vec<_> = stream.collect().await;

        assert_eq!(outcomes.len(), 36);
        assert!(transport.peak_in_flight() <= 3);
        assert!(scheduler.limiter().peak_in_flight() <= 3);
        assert_eq!(scheduler.limiter().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_panicked_task_becomes_placeholder() {
        let scheduler = scheduler(Arc::new(PanickyTransport), 2);

        let mut stream = scheduler.dispatch(GridSpec::new(2, 2).coords());
        let mut outcomes = Vec::new();
        while let Some(outcome) = stream.next().await {
            outcomes.push(outcome);
        }
        stream.finish().await.unwrap();

        assert_eq!(outcomes.len(), 4);
        assert!(outcomes.iter().all(|o| o.is_placeholder()));

        let failed = outcomes
            .iter()
            .find(|o| o.coord == TileCoord::new(1, 0))
            .unwrap();
        assert!(failed.tile.is_transparent());
        assert_eq!(failed.tile.size(), 2);
        assert!(matches!(
            failed.source,
            TileSource::Placeholder {
                attempts: 0,
                last_error: AttemptError::Aborted(_),
            }
        ));
        assert_eq!(scheduler.limiter().in_flight(), 0);
    }

    #[tokio::test]
    async fn test_empty_dispatch_ends_immediately() {
        let transport = Arc::new(MockTransport::new(Ok(Vec::new())));
        let scheduler = scheduler(transport, 2);

        let mut stream = scheduler.dispatch(std::iter::empty());
        assert!(stream.next().await.is_none());
        assert_eq!(stream.finish().await.unwrap().dispatched, 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_dropping_stream_stops_fetching() {
        let transport = Arc::new(
            MockTransport::new(Err(TransportError::Status(404)))
                .with_delay(Duration::from_millis(2)),
        );
        let scheduler = scheduler(Arc::clone(&transport), 2);

        let mut stream = scheduler.dispatch(GridSpec::new(10, 2).coords());
        assert!(stream.next().await.is_some());
        drop(stream);
        let calls_at_drop = transport.total_calls();

        tokio::time::sleep(Duration::from_millis(200)).await;

        // At most the fetches already holding a permit may still land
        let calls_later = transport.total_calls();
        assert!(
            calls_later <= calls_at_drop + 2,
            "calls grew from {} to {} after drop",
            calls_at_drop,
            calls_later
        );
        assert!(calls_later < 100);
    }
}

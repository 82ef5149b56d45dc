//! Fetch concurrency limiter.
//!
//! A semaphore-based limiter that bounds how many tile fetches are in flight
//! at once. It is the only admission control of the pipeline: every worker
//! owns one connection for its duration, so W permits also bound the number
//! of open connections.
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use tilemosaic::pipeline::ConcurrencyLimiter;
//!
//! let limiter = Arc::new(ConcurrencyLimiter::new(64));
//!
//! // Acquire before spawning; the permit moves into the task
//! let permit = limiter.acquire().await;
//! tokio::spawn(async move {
//!     let _permit = permit;
//!     // fetch happens here...
//! });
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

/// Limiter for concurrent tile fetches.
///
/// Wraps a Tokio semaphore and tracks in-flight and peak counts so the
/// ceiling can be observed in logs and tests.
#[derive(Debug)]
pub struct ConcurrencyLimiter {
    /// Semaphore controlling concurrent fetches
    semaphore: Arc<Semaphore>,

    /// Maximum permits
    max_permits: usize,

    /// Counters shared with outstanding permits
    counters: Arc<Counters>,
}

#[derive(Debug, Default)]
struct Counters {
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl ConcurrencyLimiter {
    /// Creates a new limiter with the specified maximum concurrent fetches.
    ///
    /// # Panics
    ///
    /// Panics if `max_concurrent` is 0.
    pub fn new(max_concurrent: usize) -> Self {
        assert!(max_concurrent > 0, "max_concurrent must be > 0");

        Self {
            semaphore: Arc::new(Semaphore::new(max_concurrent)),
            max_permits: max_concurrent,
            counters: Arc::new(Counters::default()),
        }
    }

    /// Acquires a permit, waiting until one is available.
    ///
    /// The permit is owned so it can move into a spawned task; it is
    /// released when dropped.
    pub async fn acquire(&self) -> ConcurrencyPermit {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .expect("semaphore closed unexpectedly");

        self.track(permit)
    }

    fn track(&self, permit: OwnedSemaphorePermit) -> ConcurrencyPermit {
        let current = self.counters.in_flight.fetch_add(1, Ordering::Relaxed) + 1;

        // Update peak if this is a new high
        let mut peak = self.counters.peak_in_flight.load(Ordering::Relaxed);
        while current > peak {
            match self.counters.peak_in_flight.compare_exchange_weak(
                peak,
                current,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(p) => peak = p,
            }
        }

        ConcurrencyPermit {
            _permit: permit,
            counters: Arc::clone(&self.counters),
        }
    }

    /// Returns the maximum number of concurrent fetches allowed.
    pub fn max_concurrent(&self) -> usize {
        self.max_permits
    }

    /// Returns the current number of in-flight fetches.
    pub fn in_flight(&self) -> usize {
        self.counters.in_flight.load(Ordering::Relaxed)
    }

    /// Returns the peak number of concurrent fetches observed.
    pub fn peak_in_flight(&self) -> usize {
        self.counters.peak_in_flight.load(Ordering::Relaxed)
    }
}

/// A permit for one in-flight fetch.
///
/// While this permit is held, it counts against the worker limit.
#[derive(Debug)]
pub struct ConcurrencyPermit {
    _permit: OwnedSemaphorePermit,
    counters: Arc<Counters>,
}

impl Drop for ConcurrencyPermit {
    fn drop(&mut self) {
        self.counters.in_flight.fetch_sub(1, Ordering::Relaxed);
    }
}

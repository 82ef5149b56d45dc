//! Job-wide fetch statistics.
//!
//! Provides thread-safe accumulation of download metrics across all tile
//! fetches of a job.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Thread-safe fetch statistics.
///
/// Tracks cumulative metrics that can be safely updated from many worker
/// tasks and read at any time for logging.
///
/// # Example
///
/// ```
/// use tilemosaic::progress::FetchStats;
///
/// let stats = FetchStats::new();
///
/// stats.record_attempt();
/// stats.record_tile_fetched(1024);
///
/// let snapshot = stats.snapshot();
/// assert_eq!(snapshot.bytes_downloaded, 1024);
/// assert_eq!(snapshot.tiles_fetched, 1);
/// ```
#[derive(Debug)]
pub struct FetchStats {
    /// Total bytes downloaded by successful attempts
    bytes_downloaded: AtomicU64,
    /// Tiles decoded from the network
    tiles_fetched: AtomicU64,
    /// Tiles replaced by a placeholder
    tiles_placeholder: AtomicU64,
    /// Transport calls made
    attempts: AtomicU64,
    /// Attempts beyond the first for a tile
    retries: AtomicU64,
    started: Instant,
}

/// Snapshot of fetch statistics at a point in time.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchStatsSnapshot {
    pub bytes_downloaded: u64,
    pub tiles_fetched: u64,
    pub tiles_placeholder: u64,
    pub attempts: u64,
    pub retries: u64,
    /// Time since the stats were created
    pub elapsed: Duration,
    /// Average download speed over `elapsed`
    pub avg_bytes_per_sec: f64,
}

impl FetchStats {
    pub fn new() -> Self {
        Self {
            bytes_downloaded: AtomicU64::new(0),
            tiles_fetched: AtomicU64::new(0),
            tiles_placeholder: AtomicU64::new(0),
            attempts: AtomicU64::new(0),
            retries: AtomicU64::new(0),
            started: Instant::now(),
        }
    }

    /// Record one transport call.
    pub fn record_attempt(&self) {
        self.attempts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a retry (an attempt after the first for the same tile).
    pub fn record_retry(&self) {
        self.retries.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a tile decoded from `bytes` downloaded bytes.
    pub fn record_tile_fetched(&self, bytes: usize) {
        self.bytes_downloaded
            .fetch_add(bytes as u64, Ordering::Relaxed);
        self.tiles_fetched.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a tile that fell back to a placeholder.
    pub fn record_placeholder(&self) {
        self.tiles_placeholder.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of current statistics.
    pub fn snapshot(&self) -> FetchStatsSnapshot {
        let bytes_downloaded = self.bytes_downloaded.load(Ordering::Relaxed);
        let elapsed = self.started.elapsed();
        let secs = elapsed.as_secs_f64();

        FetchStatsSnapshot {
            bytes_downloaded,
            tiles_fetched: self.tiles_fetched.load(Ordering::Relaxed),
            tiles_placeholder: self.tiles_placeholder.load(Ordering::Relaxed),
            attempts: self.attempts.load(Ordering::Relaxed),
            retries: self.retries.load(Ordering::Relaxed),
            elapsed,
            avg_bytes_per_sec: if secs > 0.0 {
                bytes_downloaded as f64 / secs
            } else {
                0.0
            },
        }
    }
}

impl Default for FetchStats {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchStatsSnapshot {
    /// Total tiles completed, real or placeholder.
    pub fn tiles_completed(&self) -> u64 {
        self.tiles_fetched + self.tiles_placeholder
    }

    /// Human readable byte count (e.g. "12.3 MB").
    pub fn format_bytes(&self) -> String {
        format_bytes(self.bytes_downloaded)
    }
}

/// Format a byte count with a binary-ish unit suffix.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["B", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{} {}", bytes, UNITS[0])
    } else {
        format!("{:.1} {}", value, UNITS[unit])
    }
}

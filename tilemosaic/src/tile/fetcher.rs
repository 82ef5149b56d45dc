//! Single-tile fetch with retry and placeholder fallback.

use super::{DecodeError, TileDecoder, TileImage};
use crate::coord::TileCoord;
use crate::progress::FetchStats;
use crate::provider::{RequestHeaders, Transport, TransportError, UrlTemplate};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, trace, warn};

/// Why a single attempt failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttemptError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    /// The fetch task ended without producing a tile
    #[error("fetch task aborted: {0}")]
    Aborted(String),
}

/// Where a tile's pixels came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileSource {
    /// Decoded from the server's response on the given attempt
    Fetched { attempts: u32 },
    /// Every attempt failed; the tile is a transparent placeholder
    Placeholder {
        attempts: u32,
        last_error: AttemptError,
    },
}

/// Result of fetching one coordinate.
///
/// Always carries a usable tile; failures have already been converted into
/// a placeholder by the time an outcome exists.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    pub coord: TileCoord,
    pub tile: TileImage,
    pub source: TileSource,
}

impl FetchOutcome {
    /// Builds a placeholder outcome.
    pub fn placeholder(
        coord: TileCoord,
        tile_size: u32,
        attempts: u32,
        last_error: AttemptError,
    ) -> Self {
        Self {
            coord,
            tile: TileImage::placeholder(tile_size),
            source: TileSource::Placeholder {
                attempts,
                last_error,
            },
        }
    }

    /// Returns true if the tile is a placeholder.
    pub fn is_placeholder(&self) -> bool {
        matches!(self.source, TileSource::Placeholder { .. })
    }
}

/// Settings shared by every fetch of a job.
#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub urls: UrlTemplate,
    pub headers: RequestHeaders,
    pub timeout: Duration,
    pub max_attempts: u32,
    pub tile_size: u32,
}

/// Fetches tiles through a transport and a decoder.
///
/// [`TileFetcher::fetch`] is total: it retries immediately up to
/// `max_attempts` times and then returns a transparent placeholder.
pub struct TileFetcher<T, D> {
    transport: Arc<T>,
    decoder: Arc<D>,
    settings: FetchSettings,
    stats: Arc<FetchStats>,
}

impl<T, D> TileFetcher<T, D>
where
    T: Transport + 'static,
    D: TileDecoder + 'static,
{
    pub fn new(
        transport: Arc<T>,
        decoder: Arc<D>,
        settings: FetchSettings,
        stats: Arc<FetchStats>,
    ) -> Self {
        Self {
            transport,
            decoder,
            settings,
            stats,
        }
    }

    pub fn settings(&self) -> &FetchSettings {
        &self.settings
    }

    /// Fetches one tile, never failing.
    pub async fn fetch(&self, coord: TileCoord) -> FetchOutcome {
        let url = self.settings.urls.render(coord);
        let max_attempts = self.settings.max_attempts.max(1);
        let mut last_error = None;

        for attempt in 1..=max_attempts {
            self.stats.record_attempt();
            if attempt > 1 {
                self.stats.record_retry();
            }

            match self.attempt(&url).await {
                Ok((tile, bytes)) => {
                    self.stats.record_tile_fetched(bytes);
                    trace!(x = coord.x, y = coord.y, attempt, bytes, "Tile fetched");
                    return FetchOutcome {
                        coord,
                        tile,
                        source: TileSource::Fetched { attempts: attempt },
                    };
                }
                Err(e) => {
                    debug!(
                        x = coord.x,
                        y = coord.y,
                        attempt,
                        max_attempts,
                        error = %e,
                        "Tile attempt failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        let last_error = last_error.unwrap_or(AttemptError::Transport(TransportError::Request(
            "no attempt made".to_string(),
        )));

        warn!(
            x = coord.x,
            y = coord.y,
            url = %url,
            attempts = max_attempts,
            error = %last_error,
            "Tile unavailable, using transparent placeholder"
        );
        self.stats.record_placeholder();

        FetchOutcome::placeholder(coord, self.settings.tile_size, max_attempts, last_error)
    }

    /// One transport call plus decode.
    async fn attempt(&self, url: &str) -> Result<(TileImage, usize), AttemptError> {
        let timeout = self.settings.timeout;
        let bytes = match tokio::time::timeout(
            timeout,
            self.transport.get(url, &self.settings.headers, timeout),
        )
        .await
        {
            Ok(result) => result?,
            Err(_) => return Err(TransportError::Timeout(timeout).into()),
        };

        let size = bytes.len();
        let decoder = Arc::clone(&self.decoder);
        let tile_size = self.settings.tile_size;

        // Decoding is CPU-bound; keep it off the I/O workers
        let tile = tokio::task::spawn_blocking(move || decoder.decode(&bytes, tile_size))
            .await
            .map_err(|e| DecodeError::Format(format!("decode task failed: {}", e)))??;

        Ok((tile, size))
    }
}

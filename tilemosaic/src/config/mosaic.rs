//! Job configuration.

use super::defaults::*;
use crate::coord::GridSpec;
use crate::provider::{RequestHeaders, UrlTemplate, UrlTemplateError};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Configuration errors detected before any tile is dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Grid size of zero
    #[error("grid size must be at least 1")]
    ZeroGridSize,
    /// Tile size of zero
    #[error("tile size must be at least 1 pixel")]
    ZeroTileSize,
    /// No workers
    #[error("worker count must be at least 1")]
    ZeroWorkers,
    /// No attempts
    #[error("max attempts must be at least 1")]
    ZeroAttempts,
    /// Zero timeout
    #[error("request timeout must be greater than zero")]
    ZeroTimeout,
    /// Canvas edge does not fit in `u32`
    #[error("canvas of {grid_size}x{grid_size} tiles of {tile_size}px is too large")]
    CanvasTooLarge { grid_size: u32, tile_size: u32 },
    /// Invalid URL template
    #[error("invalid URL template: {0}")]
    UrlTemplate(#[from] UrlTemplateError),
}

/// Immutable configuration for one mosaic job.
///
/// Groups every parameter of the pipeline. Defaults target the OSRS world
/// map tile server.
///
/// # Example
///
/// ```
/// use tilemosaic::config::MosaicConfig;
/// use std::time::Duration;
///
/// let config = MosaicConfig::new()
///     .with_grid_size(4)
///     .with_tile_size(256)
///     .with_workers(8)
///     .with_max_attempts(3)
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.grid().canvas_edge(), Some(1024));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MosaicConfig {
    url_template: String,
    prefix: String,
    grid_size: u32,
    tile_size: u32,
    workers: usize,
    max_attempts: u32,
    timeout: Duration,
    headers: RequestHeaders,
    output: PathBuf,
}

impl MosaicConfig {
    /// Create a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the tile URL template (`{x}`, `{y}` and optional `{prefix}`).
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Set the value substituted for `{prefix}`.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the number of tiles along one grid edge.
    pub fn with_grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = grid_size;
        self
    }

    /// Set the tile edge length in pixels.
    pub fn with_tile_size(mut self, tile_size: u32) -> Self {
        self.tile_size = tile_size;
        self
    }

    /// Set the maximum number of fetches in flight.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers;
        self
    }

    /// Set the number of attempts per tile, including the first.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts;
        self
    }

    /// Set the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the static request headers.
    pub fn with_headers(mut self, headers: RequestHeaders) -> Self {
        self.headers = headers;
        self
    }

    /// Set the output file path.
    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn url_template(&self) -> &str {
        &self.url_template
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn grid(&self) -> GridSpec {
        GridSpec::new(self.grid_size, self.tile_size)
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn headers(&self) -> &RequestHeaders {
        &self.headers
    }

    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Checks every value and compiles the URL template.
    pub fn validate(&self) -> Result<UrlTemplate, ConfigError> {
        if self.grid_size == 0 {
            return Err(ConfigError::ZeroGridSize);
        }
        if self.tile_size == 0 {
            return Err(ConfigError::ZeroTileSize);
        }
        if self.workers == 0 {
            return Err(ConfigError::ZeroWorkers);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.grid().canvas_edge().is_none() {
            return Err(ConfigError::CanvasTooLarge {
                grid_size: self.grid_size,
                tile_size: self.tile_size,
            });
        }

        Ok(UrlTemplate::parse(&self.url_template, &self.prefix)?)
    }
}

impl Default for MosaicConfig {
    fn default() -> Self {
        Self {
            url_template: DEFAULT_URL_TEMPLATE.to_string(),
            prefix: DEFAULT_PREFIX.to_string(),
            grid_size: DEFAULT_GRID_SIZE,
            tile_size: DEFAULT_TILE_SIZE,
            workers: DEFAULT_WORKERS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            headers: RequestHeaders::default(),
            output: PathBuf::from(DEFAULT_OUTPUT),
        }
    }
}

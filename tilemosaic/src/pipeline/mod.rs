//! Bounded-concurrency download pipeline.
//!
//! A [`MosaicJob`] enumerates the grid, dispatches one fetch per coordinate
//! through the [`TileScheduler`], and composites outcomes as they complete.
//!
//! # Architecture
//!
//! ```text
//! GridSpec::coords ──► TileScheduler ──► TileFetcher (≤ W in flight)
//!                                              │
//!                     ProgressReporter ◄── CompletionStream ──► Compositor ──► Canvas
//! ```
//!
//! # Concurrency
//!
//! [`ConcurrencyLimiter`] holds W permits. The dispatcher acquires a permit
//! before spawning each fetch task and the task releases it on completion,
//! so at most W requests and W tasks exist at any moment.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use tilemosaic::config::MosaicConfig;
//! use tilemosaic::pipeline::MosaicJob;
//! use tilemosaic::provider::ReqwestTransport;
//! use tilemosaic::tile::ImageDecoder;
//!
//! let config = MosaicConfig::default().with_grid_size(4);
//! let transport = Arc::new(ReqwestTransport::new(config.workers())?);
//! let job = MosaicJob::new(config, transport, Arc::new(ImageDecoder))?;
//! let mosaic = job.run(std::io::stdout()).await?;
//! ```

mod error;
mod job;
mod limiter;
mod scheduler;

pub use error::MosaicError;
pub use job::{Mosaic, MosaicJob, MosaicReport};
pub use limiter::{ConcurrencyLimiter, ConcurrencyPermit};
pub use scheduler::{CompletionStream, DispatchSummary, TileScheduler};

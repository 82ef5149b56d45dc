//! tilemosaic - Assemble a large image from a grid of web map tiles
//!
//! Downloads every tile of a square grid with bounded concurrency, retries
//! failures a fixed number of times, substitutes transparent placeholders
//! for tiles that never arrive, and composites the result into one canvas.
//!
//! # High-Level API
//!
//! ```ignore
//! use std::sync::Arc;
//! use tilemosaic::canvas::ImageFileWriter;
//! use tilemosaic::config::MosaicConfig;
//! use tilemosaic::pipeline::MosaicJob;
//! use tilemosaic::provider::ReqwestTransport;
//! use tilemosaic::tile::ImageDecoder;
//!
//! let config = MosaicConfig::default();
//! let transport = Arc::new(ReqwestTransport::new(config.workers())?);
//! let job = MosaicJob::new(config, transport, Arc::new(ImageDecoder))?;
//!
//! let mosaic = job.run(std::io::stdout()).await?;
//! job.save(&mosaic, &ImageFileWriter)?;
//! ```

pub mod canvas;
pub mod config;
pub mod coord;
pub mod logging;
pub mod pipeline;
pub mod progress;
pub mod provider;
pub mod tile;

/// Version of the tilemosaic library and CLI.
///
/// This is synchronized across all components in the workspace.
/// The version is defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

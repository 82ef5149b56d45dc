//! Job-level errors.
//!
//! Per-tile failures never show up here: the fetcher absorbs them into
//! transparent placeholders. What remains is fatal for the whole job.

use crate::canvas::{CanvasError, CompositeError, WriteError};
use crate::config::ConfigError;
use thiserror::Error;

/// Errors that abort a mosaic job.
#[derive(Debug, Error)]
pub enum MosaicError {
    /// Configuration rejected before anything was dispatched
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Canvas could not be allocated
    #[error(transparent)]
    Canvas(#[from] CanvasError),

    /// A tile could not be placed on the canvas
    #[error("compositing failed: {0}")]
    Composite(#[from] CompositeError),

    /// The dispatcher task died
    #[error("tile dispatcher failed: {0}")]
    Dispatcher(#[from] tokio::task::JoinError),

    /// Some grid cells never received a tile
    #[error("{missing} tiles never completed")]
    Incomplete { missing: usize },

    /// The finished mosaic could not be saved
    #[error(transparent)]
    Write(#[from] WriteError),
}

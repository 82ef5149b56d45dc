//! Canvas assembly.
//!
//! The canvas is one row-major RGBA buffer. It is split into disjoint
//! [`TileRegion`]s, one per grid cell, so tiles can be written in any order
//! and from any thread without locking.
//!
//! ```text
//! FetchOutcome ──► Compositor::composite ──► TileRegion::write ──► Canvas
//!                                                                   │
//!                                              MosaicWriter::write ◄┘
//! ```

mod buffer;
mod compositor;
mod writer;

pub use buffer::{Canvas, CanvasError, TileRegion};
pub use compositor::{CompositeError, CompositeReport, Compositor};
pub use writer::{ImageFileWriter, MosaicWriter, WriteError};

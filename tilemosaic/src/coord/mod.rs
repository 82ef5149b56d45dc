//! Tile grid coordinates.
//!
//! A mosaic is a square grid of equally sized tiles. [`GridSpec`] describes
//! the grid and enumerates its cells; [`TileCoord`] identifies one cell.

mod types;

pub use types::{GridCoords, GridSpec, PixelRect, TileCoord};

#[cfg(test)]
mod tests;

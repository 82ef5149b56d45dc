//! The mosaic canvas and its per-tile regions.

use super::CompositeError;
use crate::coord::{GridSpec, PixelRect, TileCoord};
use crate::tile::TileImage;
use image::RgbaImage;
use std::collections::TryReserveError;
use thiserror::Error;
use tracing::debug;

/// Bytes per RGBA8 pixel.
const BYTES_PER_PIXEL: usize = 4;

/// Errors that can occur when allocating the canvas.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Canvas byte size is not representable on this platform
    #[error("canvas of {grid_size}x{grid_size} tiles at {tile_size}px is too large")]
    TooLarge { grid_size: u32, tile_size: u32 },

    /// The allocator refused the buffer
    #[error("failed to allocate {bytes} bytes for the canvas: {source}")]
    Allocation {
        bytes: usize,
        #[source]
        source: TryReserveError,
    },
}

/// A zero-initialized RGBA canvas covering a whole grid.
///
/// Pixels are stored row-major, so one tile's rectangle is `tile_size`
/// separate row segments spread through the buffer. [`Canvas::regions_mut`]
/// hands those segments out grouped by tile.
#[derive(Debug)]
pub struct Canvas {
    grid: GridSpec,
    image: RgbaImage,
}

impl Canvas {
    /// Allocates a transparent canvas for the grid.
    ///
    /// Fails instead of aborting when the size overflows or memory runs out.
    pub fn allocate(grid: GridSpec) -> Result<Self, CanvasError> {
        let too_large = || CanvasError::TooLarge {
            grid_size: grid.grid_size(),
            tile_size: grid.tile_size(),
        };

        let edge = grid.canvas_edge().ok_or_else(too_large)?;
        let bytes = (edge as usize)
            .checked_mul(edge as usize)
            .and_then(|pixels| pixels.checked_mul(BYTES_PER_PIXEL))
            .ok_or_else(too_large)?;

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(bytes)
            .map_err(|source| CanvasError::Allocation { bytes, source })?;
        buffer.resize(bytes, 0);

        let image = RgbaImage::from_raw(edge, edge, buffer).ok_or_else(too_large)?;
        debug!(edge, bytes, "Canvas allocated");

        Ok(Self { grid, image })
    }

    /// The grid this canvas covers.
    pub fn grid(&self) -> GridSpec {
        self.grid
    }

    /// Borrows the pixels.
    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// Consumes the canvas, returning the pixels.
    pub fn into_image(self) -> RgbaImage {
        self.image
    }

    /// Splits the canvas into one exclusive region per tile.
    ///
    /// The returned vector is indexed like [`GridSpec::index_of`]. Regions
    /// never overlap, so each can be written from a different thread.
    pub fn regions_mut(&mut self) -> Vec<TileRegion<'_>> {
        let grid = self.grid;
        let tile_size = grid.tile_size() as usize;
        let columns = grid.grid_size() as usize;

        let mut regions: Vec<TileRegion<'_>> = grid
            .coords()
            .map(|coord| TileRegion {
                coord,
                rect: grid.region_of(coord),
                rows: Vec::with_capacity(tile_size),
            })
            .collect();

        if tile_size == 0 {
            return regions;
        }

        // Segment i is pixel row i / columns, tile column i % columns
        let buffer: &mut [u8] = &mut self.image;
        for (i, segment) in buffer
            .chunks_exact_mut(tile_size * BYTES_PER_PIXEL)
            .enumerate()
        {
            let pixel_row = i / columns;
            let column = i % columns;
            let tile_row = pixel_row / tile_size;
            regions[tile_row * columns + column].rows.push(segment);
        }

        regions
    }
}

/// Exclusive mutable view of one tile's rectangle inside a [`Canvas`].
///
/// Writing consumes the region, so a tile can be written at most once.
#[derive(Debug)]
pub struct TileRegion<'a> {
    coord: TileCoord,
    rect: PixelRect,
    rows: Vec<&'a mut [u8]>,
}

impl<'a> TileRegion<'a> {
    /// Coordinate of the tile this region belongs to.
    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    /// Pixel rectangle covered by this region.
    pub fn rect(&self) -> PixelRect {
        self.rect
    }

    /// Copies a tile into the region.
    pub fn write(mut self, tile: &TileImage) -> Result<(), CompositeError> {
        if tile.size() != self.rect.width {
            return Err(CompositeError::SizeMismatch {
                coord: self.coord,
                expected: self.rect.width,
                actual: tile.size(),
            });
        }

        for (y, row) in self.rows.iter_mut().enumerate() {
            row.copy_from_slice(tile.row(y as u32));
        }
        Ok(())
    }

    /// Fills the region with one color.
    pub fn fill(mut self, color: [u8; 4]) {
        for row in self.rows.iter_mut() {
            for pixel in row.chunks_exact_mut(BYTES_PER_PIXEL) {
                pixel.copy_from_slice(&color);
            }
        }
    }
}

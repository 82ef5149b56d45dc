//! Tile pixel buffers.

use image::{Rgba, RgbaImage};

/// A square RGBA8 tile.
///
/// Produced either by decoding fetched bytes or as a fully transparent
/// placeholder; both have identical shape so compositing is uniform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    pixels: RgbaImage,
}

impl TileImage {
    /// Creates a fully transparent tile (every byte zero).
    pub fn placeholder(tile_size: u32) -> Self {
        Self {
            pixels: RgbaImage::new(tile_size, tile_size),
        }
    }

    /// Creates a tile filled with one color.
    pub fn solid(tile_size: u32, color: [u8; 4]) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(tile_size, tile_size, Rgba(color)),
        }
    }

    /// Wraps an RGBA buffer. The caller guarantees it is square.
    pub(crate) fn from_rgba(pixels: RgbaImage) -> Self {
        debug_assert_eq!(pixels.width(), pixels.height());
        Self { pixels }
    }

    /// Edge length in pixels.
    #[inline]
    pub fn size(&self) -> u32 {
        self.pixels.width()
    }

    /// Raw RGBA bytes in row-major order.
    #[inline]
    pub fn as_raw(&self) -> &[u8] {
        self.pixels.as_raw()
    }

    /// Bytes of one pixel row.
    #[inline]
    pub fn row(&self, y: u32) -> &[u8] {
        let stride = self.size() as usize * 4;
        let start = y as usize * stride;
        &self.pixels.as_raw()[start..start + stride]
    }

    /// Returns true if every byte is zero.
    pub fn is_transparent(&self) -> bool {
        self.pixels.as_raw().iter().all(|b| *b == 0)
    }

    /// Borrows the underlying image.
    pub fn as_image(&self) -> &RgbaImage {
        &self.pixels
    }
}

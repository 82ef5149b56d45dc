//! Grid coordinate type definitions

use std::fmt;

/// Position of a single tile in the mosaic grid.
///
/// `x` grows to the east (columns), `y` grows to the south (rows), both
/// starting at 0 in the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileCoord {
    /// Column index, 0 at the left edge
    pub x: u32,
    /// Row index, 0 at the top edge
    pub y: u32,
}

impl TileCoord {
    /// Creates a coordinate from a column and a row.
    #[inline]
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for TileCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Pixel rectangle inside the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl PixelRect {
    /// Returns true if the pixel lies inside this rectangle.
    pub fn contains(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.x + self.width && py >= self.y && py < self.y + self.height
    }
}

/// Shape of a square tile grid.
///
/// A grid of `grid_size × grid_size` tiles, each `tile_size × tile_size`
/// pixels. The canvas built from it is `grid_size · tile_size` pixels wide
/// and tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GridSpec {
    grid_size: u32,
    tile_size: u32,
}

impl GridSpec {
    /// Creates a grid description.
    ///
    /// Both values are taken as-is; [`GridSpec::canvas_edge`] reports
    /// whether the resulting canvas is representable.
    pub const fn new(grid_size: u32, tile_size: u32) -> Self {
        Self {
            grid_size,
            tile_size,
        }
    }

    /// Number of tiles along one edge.
    #[inline]
    pub fn grid_size(&self) -> u32 {
        self.grid_size
    }

    /// Edge length of one tile in pixels.
    #[inline]
    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    /// Total number of tiles in the grid.
    #[inline]
    pub fn tile_count(&self) -> usize {
        self.grid_size as usize * self.grid_size as usize
    }

    /// Canvas edge length in pixels, or `None` if it overflows `u32`.
    pub fn canvas_edge(&self) -> Option<u32> {
        self.grid_size.checked_mul(self.tile_size)
    }

    /// Returns true if the coordinate lies inside the grid.
    #[inline]
    pub fn contains(&self, coord: TileCoord) -> bool {
        coord.x < self.grid_size && coord.y < self.grid_size
    }

    /// Row-major index of a coordinate, or `None` if it is outside the grid.
    #[inline]
    pub fn index_of(&self, coord: TileCoord) -> Option<usize> {
        if !self.contains(coord) {
            return None;
        }
        Some(coord.y as usize * self.grid_size as usize + coord.x as usize)
    }

    /// Destination rectangle of a tile inside the canvas.
    pub fn region_of(&self, coord: TileCoord) -> PixelRect {
        PixelRect {
            x: coord.x * self.tile_size,
            y: coord.y * self.tile_size,
            width: self.tile_size,
            height: self.tile_size,
        }
    }

    /// Returns an iterator over every coordinate of the grid.
    ///
    /// Coordinates are yielded in row-major order (row 0 columns 0..n, row 1
    /// columns 0..n, etc.). The iterator is cheap to clone, so the sequence
    /// can be restarted at will.
    #[inline]
    pub fn coords(&self) -> GridCoords {
        GridCoords {
            grid_size: self.grid_size,
            current: 0,
            total: self.tile_count(),
        }
    }
}

/// Iterator over all coordinates of a grid in row-major order.
#[derive(Debug, Clone)]
pub struct GridCoords {
    grid_size: u32,
    current: usize,
    total: usize,
}

impl Iterator for GridCoords {
    type Item = TileCoord;

    fn next(&mut self) -> Option<Self::Item> {
        if self.current >= self.total {
            return None;
        }

        let n = self.grid_size as usize;
        let coord = TileCoord {
            x: (self.current % n) as u32,
            y: (self.current / n) as u32,
        };

        self.current += 1;
        Some(coord)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.total - self.current;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridCoords {
    fn len(&self) -> usize {
        self.total - self.current
    }
}

impl std::iter::FusedIterator for GridCoords {}

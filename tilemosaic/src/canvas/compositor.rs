//! Places fetched tiles onto the canvas.

use super::{Canvas, TileRegion};
use crate::coord::{GridSpec, TileCoord};
use crate::tile::FetchOutcome;
use thiserror::Error;
use tracing::trace;

/// Errors raised while compositing.
///
/// All of these indicate a pipeline bug rather than a network problem: the
/// scheduler yields each grid coordinate exactly once with a tile of the
/// configured size.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompositeError {
    /// Coordinate lies outside the grid
    #[error("tile {0} is outside the grid")]
    OutOfGrid(TileCoord),

    /// Region was already written or handed out
    #[error("tile {0} was already composited")]
    AlreadyWritten(TileCoord),

    /// Tile edge does not match the grid's tile size
    #[error("tile {coord} is {actual}px, expected {expected}px")]
    SizeMismatch {
        coord: TileCoord,
        expected: u32,
        actual: u32,
    },
}

/// Counts reported by [`Compositor::finish`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositeReport {
    /// Regions written or handed out
    pub written: usize,
    /// Regions never touched
    pub remaining: usize,
}

impl CompositeReport {
    /// Returns true if every region was written.
    pub fn is_complete(&self) -> bool {
        self.remaining == 0
    }
}

/// Owns the region table of a canvas for the duration of a job.
pub struct Compositor<'a> {
    grid: GridSpec,
    regions: Vec<Option<TileRegion<'a>>>,
    written: usize,
}

impl<'a> Compositor<'a> {
    /// Splits the canvas into regions ready for writing.
    pub fn new(canvas: &'a mut Canvas) -> Self {
        let grid = canvas.grid();
        let regions = canvas.regions_mut().into_iter().map(Some).collect();
        Self {
            grid,
            regions,
            written: 0,
        }
    }

    /// Writes an outcome's tile into its region.
    ///
    /// Each coordinate is accepted once; a second outcome for the same
    /// coordinate is rejected and leaves the canvas untouched.
    pub fn composite(&mut self, outcome: &FetchOutcome) -> Result<(), CompositeError> {
        let expected = self.grid.tile_size();
        if outcome.tile.size() != expected {
            return Err(CompositeError::SizeMismatch {
                coord: outcome.coord,
                expected,
                actual: outcome.tile.size(),
            });
        }

        let region = self.take_region(outcome.coord)?;
        region.write(&outcome.tile)?;
        trace!(
            x = outcome.coord.x,
            y = outcome.coord.y,
            placeholder = outcome.is_placeholder(),
            "Tile composited"
        );
        Ok(())
    }

    /// Hands out the exclusive region for a coordinate.
    ///
    /// The region can be moved to another thread and written there. It
    /// counts as written from this point on.
    pub fn take_region(&mut self, coord: TileCoord) -> Result<TileRegion<'a>, CompositeError> {
        let index = self
            .grid
            .index_of(coord)
            .ok_or(CompositeError::OutOfGrid(coord))?;
        let region = self.regions[index]
            .take()
            .ok_or(CompositeError::AlreadyWritten(coord))?;
        self.written += 1;
        Ok(region)
    }

    /// Number of regions written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Releases the canvas and reports coverage.
    pub fn finish(self) -> CompositeReport {
        CompositeReport {
            written: self.written,
            remaining: self.regions.len() - self.written,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::TransportError;
    use crate::tile::{AttemptError, TileImage, TileSource};

    fn fetched(x: u32, y: u32, size: u32, color: [u8; 4]) -> FetchOutcome {
        FetchOutcome {
            coord: TileCoord::new(x, y),
            tile: TileImage::solid(size, color),
            source: TileSource::Fetched { attempts: 1 },
        }
    }

    #[test]
    fn test_composite_places_tile() {
        let grid = GridSpec::new(2, 2);
        let mut canvas = Canvas::allocate(grid).unwrap();
        let mut compositor = Compositor::new(&mut canvas);

        compositor
            .composite(&fetched(1, 0, 2, [10, 20, 30, 255]))
            .unwrap();
        let report = compositor.finish();
        assert_eq!(report.written, 1);
        assert_eq!(report.remaining, 3);
        assert!(!report.is_complete());

        assert_eq!(canvas.image().get_pixel(2, 0).0, [10, 20, 30, 255]);
        assert_eq!(canvas.image().get_pixel(3, 1).0, [10, 20, 30, 255]);
        assert_eq!(canvas.image().get_pixel(1, 0).0, [0, 0, 0, 0]);
        assert_eq!(canvas.image().get_pixel(2, 2).0, [0, 0, 0, 0]);
    }

    #[test]
    fn test_duplicate_is_rejected_without_rewrite() {
        let grid = GridSpec::new(2, 2);
        let mut canvas = Canvas::allocate(grid).unwrap();
        let mut compositor = Compositor::new(&mut canvas);

        compositor.composite(&fetched(0, 0, 2, [1, 1, 1, 255])).unwrap();
        let err = compositor
            .composite(&fetched(0, 0, 2, [2, 2, 2, 255]))
            .unwrap_err();
        assert_eq!(err, CompositeError::AlreadyWritten(TileCoord::new(0, 0)));
        assert_eq!(compositor.written(), 1);
        drop(compositor);

        assert_eq!(canvas.image().get_pixel(0, 0).0, [1, 1, 1, 255]);
    }

    #[test]
    fn test_out_of_grid_is_rejected() {
        let mut canvas = Canvas::allocate(GridSpec::new(2, 2)).unwrap();
        let mut compositor = Compositor::new(&mut canvas);

        let err = compositor
            .composite(&fetched(2, 0, 2, [1, 1, 1, 255]))
            .unwrap_err();
        assert_eq!(err, CompositeError::OutOfGrid(TileCoord::new(2, 0)));
    }

    #[test]
    fn test_wrong_size_leaves_region_available() {
        let mut canvas = Canvas::allocate(GridSpec::new(2, 2)).unwrap();
        let mut compositor = Compositor::new(&mut canvas);

        let err = compositor
            .composite(&fetched(0, 1, 3, [1, 1, 1, 255]))
            .unwrap_err();
        assert!(matches!(err, CompositeError::SizeMismatch { .. }));
        assert!(compositor.composite(&fetched(0, 1, 2, [1, 1, 1, 255])).is_ok());
    }

    #[test]
    fn test_placeholder_writes_zero_bytes() {
        let grid = GridSpec::new(2, 2);
        let mut canvas = Canvas::allocate(grid).unwrap();
        let mut compositor = Compositor::new(&mut canvas);

        for coord in grid.coords() {
            let outcome = if coord == TileCoord::new(1, 1) {
                FetchOutcome::placeholder(
                    coord,
                    2,
                    1,
                    AttemptError::Transport(TransportError::Status(404)),
                )
            } else {
                fetched(coord.x, coord.y, 2, [255, 255, 255, 255])
            };
            compositor.composite(&outcome).unwrap();
        }
        assert!(compositor.finish().is_complete());

        for (px, py, pixel) in canvas.image().enumerate_pixels() {
            let expected = if px >= 2 && py >= 2 {
                [0, 0, 0, 0]
            } else {
                [255, 255, 255, 255]
            };
            assert_eq!(pixel.0, expected, "pixel ({px}, {py})");
        }
    }

    #[test]
    fn test_take_region_twice_fails() {
        let mut canvas = Canvas::allocate(GridSpec::new(1, 2)).unwrap();
        let mut compositor = Compositor::new(&mut canvas);

        let region = compositor.take_region(TileCoord::new(0, 0)).unwrap();
        assert_eq!(region.coord(), TileCoord::new(0, 0));
        assert!(matches!(
            compositor.take_region(TileCoord::new(0, 0)),
            Err(CompositeError::AlreadyWritten(_))
        ));
    }
}

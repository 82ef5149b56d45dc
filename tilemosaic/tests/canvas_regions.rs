//! Property tests for disjoint canvas regions.
//!
//! Regions are written from many threads at once; afterwards every tile
//! rectangle must hold exactly its own bytes.

use proptest::prelude::*;
use tilemosaic::canvas::{Canvas, Compositor};
use tilemosaic::coord::{GridSpec, TileCoord};

fn color_of(coord: TileCoord) -> [u8; 4] {
    [coord.x as u8, coord.y as u8, (coord.x ^ coord.y) as u8, 0xFF]
}

fn verify(canvas: &Canvas) {
    let grid = canvas.grid();
    for coord in grid.coords() {
        let rect = grid.region_of(coord);
        for py in rect.y..rect.y + rect.height {
            for px in rect.x..rect.x + rect.width {
                assert_eq!(
                    canvas.image().get_pixel(px, py).0,
                    color_of(coord),
                    "tile {} pixel ({}, {})",
                    coord,
                    px,
                    py
                );
            }
        }
    }
}

proptest! {
    #[test]
    fn regions_written_concurrently_never_overlap(
        grid_size in 1u32..7,
        tile_size in 1u32..9,
        seed in any::<u64>(),
    ) {
        let grid = GridSpec::new(grid_size, tile_size);
        let mut canvas = Canvas::allocate(grid).unwrap();

        // Hand regions out in a shuffled order
        let mut order: Vec<TileCoord> = grid.coords().collect();
        let mut state = seed | 1;
        for i in (1..order.len()).rev() {
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            order.swap(i, (state % (i as u64 + 1)) as usize);
        }

        let mut compositor = Compositor::new(&mut canvas);
        let regions: Vec<_> = order
            .iter()
            .map(|coord| compositor.take_region(*coord).unwrap())
            .collect();
        prop_assert!(compositor.finish().is_complete());

        std::thread::scope(|scope| {
            for region in regions {
                scope.spawn(move || {
                    let color = color_of(region.coord());
                    region.fill(color);
                });
            }
        });

        verify(&canvas);
    }

    #[test]
    fn region_table_matches_grid_geometry(grid_size in 1u32..10, tile_size in 1u32..10) {
        let grid = GridSpec::new(grid_size, tile_size);
        let mut canvas = Canvas::allocate(grid).unwrap();
        let regions = canvas.regions_mut();

        prop_assert_eq!(regions.len(), grid.tile_count());
        for (index, region) in regions.iter().enumerate() {
            prop_assert_eq!(grid.index_of(region.coord()), Some(index));
            prop_assert_eq!(region.rect(), grid.region_of(region.coord()));
        }
    }
}

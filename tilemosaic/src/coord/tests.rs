//! Tests for grid enumeration

use super::*;
use std::collections::HashSet;

#[test]
fn test_coords_row_major_order() {
    let grid = GridSpec::new(2, 16);
    let coords: Vec<_> = grid.coords().collect();

    assert_eq!(
        coords,
        vec![
            TileCoord::new(0, 0),
            TileCoord::new(1, 0),
            TileCoord::new(0, 1),
            TileCoord::new(1, 1),
        ]
    );
}

#[test]
fn test_coords_cover_grid_exactly_once() {
    for grid_size in 1..=12 {
        let grid = GridSpec::new(grid_size, 4);
        let coords: Vec<_> = grid.coords().collect();
        let unique: HashSet<_> = coords.iter().copied().collect();

        assert_eq!(coords.len(), grid.tile_count());
        assert_eq!(unique.len(), coords.len(), "no duplicates for {}", grid_size);
        assert!(coords.iter().all(|c| grid.contains(*c)));
    }
}

#[test]
fn test_coords_restartable() {
    let grid = GridSpec::new(3, 8);
    let iter = grid.coords();
    let first: Vec<_> = iter.clone().collect();
    let second: Vec<_> = iter.collect();
    assert_eq!(first, second);
}

#[test]
fn test_coords_exact_size() {
    let grid = GridSpec::new(5, 8);
    let mut iter = grid.coords();
    assert_eq!(iter.len(), 25);
    iter.next();
    iter.next();
    assert_eq!(iter.len(), 23);
    assert_eq!(iter.size_hint(), (23, Some(23)));
}

#[test]
fn test_empty_grid_yields_nothing() {
    let grid = GridSpec::new(0, 256);
    assert_eq!(grid.coords().count(), 0);
}

#[test]
fn test_index_of_matches_enumeration_order() {
    let grid = GridSpec::new(4, 2);
    for (i, coord) in grid.coords().enumerate() {
        assert_eq!(grid.index_of(coord), Some(i));
    }
    assert_eq!(grid.index_of(TileCoord::new(4, 0)), None);
    assert_eq!(grid.index_of(TileCoord::new(0, 4)), None);
}

#[test]
fn test_region_of() {
    let grid = GridSpec::new(4, 256);
    let rect = grid.region_of(TileCoord::new(2, 3));
    assert_eq!(
        rect,
        PixelRect {
            x: 512,
            y: 768,
            width: 256,
            height: 256
        }
    );
    assert!(rect.contains(512, 768));
    assert!(rect.contains(767, 1023));
    assert!(!rect.contains(768, 768));
}

#[test]
fn test_regions_disjoint_and_cover_canvas() {
    let grid = GridSpec::new(3, 2);
    let edge = grid.canvas_edge().unwrap();

    for py in 0..edge {
        for px in 0..edge {
            let owners = grid
                .coords()
                .filter(|c| grid.region_of(*c).contains(px, py))
                .count();
            assert_eq!(owners, 1, "pixel ({}, {}) covered {} times", px, py, owners);
        }
    }
}

#[test]
fn test_canvas_edge_overflow() {
    assert_eq!(GridSpec::new(256, 256).canvas_edge(), Some(65536));
    assert_eq!(GridSpec::new(u32::MAX, 2).canvas_edge(), None);
}

#[test]
fn test_coord_display() {
    assert_eq!(TileCoord::new(3, 7).to_string(), "(3, 7)");
}

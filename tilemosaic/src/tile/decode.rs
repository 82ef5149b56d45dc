//! Tile decoding.

use super::TileImage;
use thiserror::Error;

/// Errors raised while turning fetched bytes into a tile.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Bytes are not a supported image
    #[error("image decode error: {0}")]
    Format(String),
    /// Image decoded but has the wrong dimensions
    #[error("expected {expected}x{expected} tile, got {width}x{height}")]
    Dimensions {
        expected: u32,
        width: u32,
        height: u32,
    },
}

/// Decodes raw response bytes into a tile.
///
/// Implementations must normalize to RGBA8 and reject images that are not
/// exactly `tile_size × tile_size`.
pub trait TileDecoder: Send + Sync {
    fn decode(&self, bytes: &[u8], tile_size: u32) -> Result<TileImage, DecodeError>;
}

/// Decoder backed by the `image` crate.
///
/// The format is guessed from the bytes, so PNG, JPEG and WebP tiles are all
/// accepted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl TileDecoder for ImageDecoder {
    fn decode(&self, bytes: &[u8], tile_size: u32) -> Result<TileImage, DecodeError> {
        let img = image::load_from_memory(bytes).map_err(|e| DecodeError::Format(e.to_string()))?;

        if img.width() != tile_size || img.height() != tile_size {
            return Err(DecodeError::Dimensions {
                expected: tile_size,
                width: img.width(),
                height: img.height(),
            });
        }

        Ok(TileImage::from_rgba(img.to_rgba8()))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use image::{ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};
    use std::io::Cursor;

    /// Encodes a solid-color square as PNG.
    pub(crate) fn png_tile(size: u32, color: [u8; 4]) -> Vec<u8> {
        let img = RgbaImage::from_pixel(size, size, Rgba(color));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();
        buffer.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let bytes = png_tile(4, [10, 20, 30, 40]);
        let tile = ImageDecoder.decode(&bytes, 4).unwrap();
        assert_eq!(tile.size(), 4);
        assert_eq!(&tile.as_raw()[..4], &[10, 20, 30, 40]);
    }

    #[test]
    fn test_decode_normalizes_rgb_to_rgba() {
        let img = RgbImage::from_pixel(2, 2, Rgb([1, 2, 3]));
        let mut buffer = Cursor::new(Vec::new());
        img.write_to(&mut buffer, ImageFormat::Png).unwrap();

        let tile = ImageDecoder.decode(buffer.get_ref(), 2).unwrap();
        assert_eq!(&tile.as_raw()[..4], &[1, 2, 3, 255]);
    }

    #[test]
    fn test_decode_garbage() {
        let result = ImageDecoder.decode(b"definitely not an image", 4);
        assert!(matches!(result, Err(DecodeError::Format(_))));
    }

    #[test]
    fn test_decode_wrong_dimensions() {
        let bytes = png_tile(8, [0, 0, 0, 255]);
        assert_eq!(
            ImageDecoder.decode(&bytes, 4),
            Err(DecodeError::Dimensions {
                expected: 4,
                width: 8,
                height: 8
            })
        );
    }
}

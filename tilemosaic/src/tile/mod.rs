//! Tiles: pixel buffers, decoding, and fetching.
//!
//! ```text
//! TileCoord ──► UrlTemplate ──► Transport::get ──► TileDecoder::decode ──► TileImage
//!                                   │ (retry up to max_attempts)
//!                                   └──► TileImage::placeholder on exhaustion
//! ```

mod decode;
mod fetcher;
mod pixels;

pub use decode::{DecodeError, ImageDecoder, TileDecoder};
pub use fetcher::{AttemptError, FetchOutcome, FetchSettings, TileFetcher, TileSource};
pub use pixels::TileImage;

#[cfg(test)]
pub(crate) use decode::tests::png_tile;

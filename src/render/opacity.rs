use crate::Result;

use super::encode_png;

/// Applies a layer opacity to one encoded tile.
pub trait OpacityFilter: Send + Sync {
    /// `opacity` is in `(0, 1)`; fully opaque tiles never reach the filter.
    fn apply(&self, bytes: Vec<u8>, opacity: f64) -> Result<Vec<u8>>;
}

/// Scales the alpha channel and re-encodes the tile as PNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphaOpacity;

impl OpacityFilter for AlphaOpacity {
    fn apply(&self, bytes: Vec<u8>, opacity: f64) -> Result<Vec<u8>> {
        let mut tile = image::load_from_memory(&bytes)?.to_rgba8();
        for pixel in tile.pixels_mut() {
            pixel[3] = (pixel[3] as f64 * opacity).round().clamp(0.0, 255.0) as u8;
        }
        encode_png(&tile)
    }
}

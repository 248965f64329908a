use image::RgbaImage;

use crate::Result;

/// An encoded tile ready to be drawn at `(left, top)`.
#[derive(Debug, Clone)]
pub struct TileImage {
    pub bytes: Vec<u8>,
    pub left: i64,
    pub top: i64,
}

/// Draws tiles onto a canvas in order, later tiles on top.
pub trait Compositor: Send + Sync {
    /// Placements partly or fully outside `base` must be clipped, not
    /// rejected.
    fn composite(&self, base: RgbaImage, tiles: &[TileImage]) -> Result<RgbaImage>;
}

/// Decodes every tile and alpha-blends it with `image::imageops::overlay`.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayCompositor;

impl Compositor for OverlayCompositor {
    fn composite(&self, mut base: RgbaImage, tiles: &[TileImage]) -> Result<RgbaImage> {
        for tile in tiles {
            let decoded = image::load_from_memory(&tile.bytes)?.to_rgba8();
            image::imageops::overlay(&mut base, &decoded, tile.left, tile.top);
        }
        Ok(base)
    }
}

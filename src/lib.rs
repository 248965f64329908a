//! # mapshot
//!
//! Static map rendering on top of the slippy-map tile scheme.
//!
//! A render request names a canvas size, a geographic center, a zoom level
//! and a stack of tile layers. The library works out which 256×256 tiles
//! cover the canvas, where each one lands in pixel space, fetches (or
//! generates) them concurrently and composites the result into one RGBA
//! image.

pub mod core;
pub mod prelude;
pub mod render;
pub mod tiles;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{Dimensions, ImageOptions, MapOptions, RenderRequest},
    geo::{project, unproject, LatLng, TilePoint},
};

pub use tiles::{
    grid::{GridTile, TileGrid},
    plan::{build_plan, CompositePlan, Placement},
    source::{resolve, FnGenerator, GeneratorLayer, LayerSpec, SourceKey, TileGenerator, TileSource},
    loader::{HttpFetcher, TileFetcher},
};

pub use render::{
    compositor::{Compositor, OverlayCompositor, TileImage},
    opacity::{AlphaOpacity, OpacityFilter},
    StaticMap,
};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP {status} while fetching {url}")]
    Http { url: String, status: u16 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Tile generator error: {0}")]
    Generator(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error type alias for convenience
pub type Error = MapError;

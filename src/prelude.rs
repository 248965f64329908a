//! Prelude module for common mapshot types and traits
//!
//! `use mapshot::prelude::*;` brings in everything needed to build a request
//! and render it.

pub use crate::core::{
    config::{Dimensions, ImageOptions, MapOptions, RenderRequest},
    constants::TILE_SIZE,
    geo::{project, unproject, LatLng, TilePoint},
};

pub use crate::tiles::{
    grid::{GridTile, TileGrid},
    loader::{HttpFetcher, TileFetcher},
    plan::{build_plan, CompositePlan, Placement},
    source::{resolve, FnGenerator, GeneratorLayer, LayerSpec, SourceKey, TileGenerator, TileSource},
};

pub use crate::render::{
    compositor::{Compositor, OverlayCompositor, TileImage},
    encode_png,
    opacity::{AlphaOpacity, OpacityFilter},
    StaticMap,
};

pub use crate::{Error as MapError, Result};

pub use async_trait::async_trait;

//! Render request configuration
//!
//! A request mirrors the JSON document accepted by the CLI:
//!
//! ```json
//! {
//!   "image": { "dimensions": { "width": 1280, "height": 720 } },
//!   "map": {
//!     "center": { "lat": 48.15, "lng": 17.11 },
//!     "zoom": 12,
//!     "layers": [
//!       "https://tile.openstreetmap.org/{z}/{x}/{y}.png",
//!       { "url": "https://tiles.example.org/hillshade/{z}/{x}/{y}.png", "opacity": 0.5 }
//!     ]
//!   }
//! }
//! ```

use serde::Deserialize;

use crate::{core::geo::LatLng, tiles::source::LayerSpec, MapError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct ImageOptions {
    pub dimensions: Dimensions,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MapOptions {
    pub center: LatLng,
    pub zoom: u8,
    /// Bottom layer first.
    pub layers: Vec<LayerSpec>,
}

/// Everything needed to render one image.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderRequest {
    pub image: ImageOptions,
    pub map: MapOptions,
}

impl RenderRequest {
    pub fn new(width: u32, height: u32, center: LatLng, zoom: u8, layers: Vec<LayerSpec>) -> Self {
        Self {
            image: ImageOptions {
                dimensions: Dimensions { width, height },
            },
            map: MapOptions {
                center,
                zoom,
                layers,
            },
        }
    }

    /// Parse a request from its JSON form.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reject requests that cannot produce an image. Runs before any tile is
    /// fetched.
    pub fn validate(&self) -> Result<()> {
        let Dimensions { width, height } = self.image.dimensions;
        if width == 0 || height == 0 {
            return Err(MapError::InvalidInput(format!(
                "image dimensions must be positive, got {}x{}",
                width, height
            )));
        }

        if self.map.layers.is_empty() {
            return Err(MapError::InvalidInput("at least one layer is required".into()));
        }

        for (index, layer) in self.map.layers.iter().enumerate() {
            layer
                .validate()
                .map_err(|reason| MapError::InvalidInput(format!("layer {}: {}", index, reason)))?;
        }

        Ok(())
    }
}

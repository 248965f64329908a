//! Tile materialization and compositing
//!
//! [`StaticMap`] turns a [`RenderRequest`] into an image in three strictly
//! sequential phases: plan, materialize, composite. Only materialization is
//! concurrent. Every tile of the plan is fetched (or generated) at the same
//! time and the first failure aborts the whole render.

pub mod compositor;
pub mod opacity;

use std::sync::Arc;

use futures::future::try_join_all;
use image::{ColorType, ImageEncoder, RgbaImage};

use self::{
    compositor::{Compositor, OverlayCompositor, TileImage},
    opacity::{AlphaOpacity, OpacityFilter},
};
use crate::{
    core::config::RenderRequest,
    tiles::{
        loader::{HttpFetcher, TileFetcher},
        plan::{build_plan, CompositePlan, Placement},
        source::TileSource,
    },
    Result,
};

/// Encode an RGBA buffer as PNG.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    image::codecs::png::PngEncoder::new(&mut out).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ColorType::Rgba8,
    )?;
    Ok(out)
}

/// Static map renderer with pluggable fetch, opacity and compositing
/// capabilities.
#[derive(Clone)]
pub struct StaticMap {
    fetcher: Arc<dyn TileFetcher>,
    opacity: Arc<dyn OpacityFilter>,
    compositor: Arc<dyn Compositor>,
}

impl StaticMap {
    /// Renderer using HTTP fetching and `image`-based pixel operations.
    pub fn new() -> Self {
        Self {
            fetcher: Arc::new(HttpFetcher::new()),
            opacity: Arc::new(AlphaOpacity),
            compositor: Arc::new(OverlayCompositor),
        }
    }

    pub fn with_fetcher(mut self, fetcher: impl TileFetcher + 'static) -> Self {
        self.fetcher = Arc::new(fetcher);
        self
    }

    pub fn with_opacity_filter(mut self, filter: impl OpacityFilter + 'static) -> Self {
        self.opacity = Arc::new(filter);
        self
    }

    pub fn with_compositor(mut self, compositor: impl Compositor + 'static) -> Self {
        self.compositor = Arc::new(compositor);
        self
    }

    /// Validate the request and plan its tile draws without fetching anything.
    pub fn plan(&self, request: &RenderRequest) -> Result<CompositePlan> {
        request.validate()?;
        let dims = request.image.dimensions;
        Ok(build_plan(
            request.map.center,
            request.map.zoom,
            dims.width as i64,
            dims.height as i64,
            &request.map.layers,
        ))
    }

    /// Resolve every placement of `plan` to encoded bytes, concurrently.
    /// Output order matches plan order.
    pub async fn materialize(&self, plan: &CompositePlan) -> Result<Vec<TileImage>> {
        try_join_all(plan.iter().map(|placement| self.materialize_one(placement))).await
    }

    async fn materialize_one(&self, placement: &Placement) -> Result<TileImage> {
        let fetched = match &placement.source {
            TileSource::Url(url) => self.fetcher.fetch(url).await,
            TileSource::Generated(tile) => tile.invoke().await,
        };

        let bytes = match fetched {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("tile {} failed: {}", placement.source, e);
                return Err(e);
            }
        };

        let bytes = if placement.opacity != 1.0 {
            self.opacity.apply(bytes, placement.opacity)?
        } else {
            bytes
        };

        Ok(TileImage {
            bytes,
            left: placement.left,
            top: placement.top,
        })
    }

    /// Render `request` into a new RGBA canvas of the requested size.
    pub async fn render(&self, request: &RenderRequest) -> Result<RgbaImage> {
        let plan = self.plan(request)?;
        let tiles = self.materialize(&plan).await?;

        let dims = request.image.dimensions;
        let canvas = self
            .compositor
            .composite(RgbaImage::new(dims.width, dims.height), &tiles)?;

        log::info!(
            "rendered {}x{} map at z{} from {} tiles",
            dims.width,
            dims.height,
            request.map.zoom,
            tiles.len()
        );
        Ok(canvas)
    }

    /// Render `request` and encode the result as PNG.
    pub async fn render_png(&self, request: &RenderRequest) -> Result<Vec<u8>> {
        let canvas = self.render(request).await?;
        encode_png(&canvas)
    }
}

impl Default for StaticMap {
    fn default() -> Self {
        Self::new()
    }
}

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer};

use crate::Result;

/// Anything that can produce encoded tile bytes locally instead of fetching
/// them from a server.
#[async_trait]
pub trait TileGenerator: Send + Sync {
    /// Produce the encoded image for tile `z/x/y`.
    async fn generate(&self, z: u8, x: i64, y: i64) -> Result<Vec<u8>>;
}

/// Adapts a synchronous closure into a [`TileGenerator`].
pub struct FnGenerator<F> {
    func: F,
}

impl<F> FnGenerator<F>
where
    F: Fn(u8, i64, i64) -> Result<Vec<u8>> + Send + Sync,
{
    pub fn new(func: F) -> Self {
        Self { func }
    }
}

#[async_trait]
impl<F> TileGenerator for FnGenerator<F>
where
    F: Fn(u8, i64, i64) -> Result<Vec<u8>> + Send + Sync,
{
    async fn generate(&self, z: u8, x: i64, y: i64) -> Result<Vec<u8>> {
        (self.func)(z, x, y)
    }
}

static NEXT_GENERATOR_ID: AtomicU64 = AtomicU64::new(1);

/// Stable identity of one generator instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeneratorId(u64);

/// A tile generator together with the identity used to deduplicate its
/// tiles. Clones share the identity.
#[derive(Clone)]
pub struct GeneratorLayer {
    id: GeneratorId,
    generator: Arc<dyn TileGenerator>,
}

impl GeneratorLayer {
    pub fn new(generator: impl TileGenerator + 'static) -> Self {
        Self::from_arc(Arc::new(generator))
    }

    pub fn from_arc(generator: Arc<dyn TileGenerator>) -> Self {
        Self {
            id: GeneratorId(NEXT_GENERATOR_ID.fetch_add(1, Ordering::Relaxed)),
            generator,
        }
    }

    /// Wrap a synchronous closure.
    pub fn from_fn<F>(func: F) -> Self
    where
        F: Fn(u8, i64, i64) -> Result<Vec<u8>> + Send + Sync + 'static,
    {
        Self::new(FnGenerator::new(func))
    }

    pub fn id(&self) -> GeneratorId {
        self.id
    }
}

impl fmt::Debug for GeneratorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeneratorLayer").field("id", &self.id).finish()
    }
}

/// One entry of a map's layer stack.
#[derive(Debug, Clone)]
pub enum LayerSpec {
    /// URL template with `{z}`, `{x}` and `{y}` placeholders.
    Template(String),
    /// URL template drawn with a fixed opacity; `None` means fully opaque.
    Styled { url: String, opacity: Option<f64> },
    /// Tiles produced in-process. Always opaque.
    Generator(GeneratorLayer),
}

impl LayerSpec {
    pub fn template(url: impl Into<String>) -> Self {
        Self::Template(url.into())
    }

    pub fn styled(url: impl Into<String>, opacity: f64) -> Self {
        Self::Styled {
            url: url.into(),
            opacity: Some(opacity),
        }
    }

    pub fn generator(layer: GeneratorLayer) -> Self {
        Self::Generator(layer)
    }

    /// Opacity every tile of this layer is drawn with.
    pub fn opacity(&self) -> f64 {
        match self {
            Self::Styled { opacity, .. } => opacity.unwrap_or(1.0),
            Self::Template(_) | Self::Generator(_) => 1.0,
        }
    }

    pub(crate) fn validate(&self) -> std::result::Result<(), String> {
        let url = match self {
            Self::Template(url) | Self::Styled { url, .. } => url,
            Self::Generator(_) => return Ok(()),
        };

        if url.trim().is_empty() {
            return Err("URL template is empty".into());
        }

        let opacity = self.opacity();
        // NaN fails both comparisons
        if !(opacity > 0.0 && opacity <= 1.0) {
            return Err(format!("opacity must be in (0, 1], got {}", opacity));
        }

        Ok(())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LayerConfig {
    Template(String),
    Styled {
        url: String,
        #[serde(default)]
        opacity: Option<f64>,
    },
}

impl<'de> Deserialize<'de> for LayerSpec {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match LayerConfig::deserialize(deserializer)? {
            LayerConfig::Template(url) => LayerSpec::Template(url),
            LayerConfig::Styled { url, opacity } => LayerSpec::Styled { url, opacity },
        })
    }
}

/// A generator call bound to one tile, run by the materializer.
#[derive(Clone)]
pub struct GeneratedTile {
    layer: GeneratorLayer,
    pub z: u8,
    pub x: i64,
    pub y: i64,
}

impl GeneratedTile {
    pub async fn invoke(&self) -> Result<Vec<u8>> {
        self.layer.generator.generate(self.z, self.x, self.y).await
    }
}

/// Where the bytes of one tile come from.
#[derive(Clone)]
pub enum TileSource {
    Url(String),
    Generated(GeneratedTile),
}

/// Deduplication identity of a [`TileSource`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKey {
    Url(String),
    Generator { id: GeneratorId, z: u8, x: i64, y: i64 },
}

impl TileSource {
    pub fn key(&self) -> SourceKey {
        match self {
            Self::Url(url) => SourceKey::Url(url.clone()),
            Self::Generated(tile) => SourceKey::Generator {
                id: tile.layer.id,
                z: tile.z,
                x: tile.x,
                y: tile.y,
            },
        }
    }

    pub fn url(&self) -> Option<&str> {
        match self {
            Self::Url(url) => Some(url),
            Self::Generated(_) => None,
        }
    }
}

impl fmt::Display for TileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url(url) => f.write_str(url),
            Self::Generated(tile) => {
                write!(f, "generator#{}:{}/{}/{}", tile.layer.id.0, tile.z, tile.x, tile.y)
            }
        }
    }
}

impl fmt::Debug for TileSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TileSource({})", self)
    }
}

/// A layer resolved against one tile.
#[derive(Debug, Clone)]
pub struct ResolvedTile {
    pub source: TileSource,
    pub opacity: f64,
}

/// Substitute `{z}`, `{x}` and `{y}` in a URL template.
pub fn fill_template(template: &str, z: u8, x: i64, y: i64) -> String {
    template
        .replace("{z}", &z.to_string())
        .replace("{x}", &x.to_string())
        .replace("{y}", &y.to_string())
}

/// Turn a layer and a grid position into a concrete tile source.
///
/// `x` and `y` are floored before use, so fractional grid positions name
/// the tile that contains them.
pub fn resolve(layer: &LayerSpec, zoom: u8, x: f64, y: f64) -> ResolvedTile {
    let (x, y) = (x.floor() as i64, y.floor() as i64);

    let source = match layer {
        LayerSpec::Template(url) | LayerSpec::Styled { url, .. } => {
            TileSource::Url(fill_template(url, zoom, x, y))
        }
        LayerSpec::Generator(generator) => TileSource::Generated(GeneratedTile {
            layer: generator.clone(),
            z: zoom,
            x,
            y,
        }),
    };

    ResolvedTile {
        source,
        opacity: layer.opacity(),
    }
}

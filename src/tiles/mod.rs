pub mod grid;
pub mod loader;
pub mod plan;
pub mod source;

// Re-exports for convenience
pub use grid::{GridTile, TileGrid};
pub use loader::{HttpFetcher, TileFetcher};
pub use plan::{build_plan, CompositePlan, Placement};
pub use source::{GeneratorLayer, LayerSpec, TileGenerator, TileSource};

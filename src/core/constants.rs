//! Tile-scheme constants shared by the planner, resolver and compositor.

/// Square tile size in pixels.
pub const TILE_SIZE: i64 = 256;

/// Half a tile, the distance from a tile's corner to its center.
pub const HALF_TILE: f64 = 128.0;

/// Latitude beyond which Web Mercator tiles are no longer square.
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// User-Agent sent to tile servers. Public servers such as OpenStreetMap
/// reject requests without one.
pub const USER_AGENT: &str = concat!("mapshot/", env!("CARGO_PKG_VERSION"));

/// Per-request timeout for the default HTTP fetcher, in seconds.
pub const FETCH_TIMEOUT_SECS: u64 = 30;

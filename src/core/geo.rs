use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Fractional position inside the `2^zoom × 2^zoom` tile grid.
///
/// The integer part names the tile, the fractional part is the offset of
/// the point inside that tile in units of one tile width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePoint {
    pub x: f64,
    pub y: f64,
}

impl TilePoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Integer tile containing this point.
    pub fn tile(&self) -> (i64, i64) {
        (self.x.floor() as i64, self.y.floor() as i64)
    }

    /// Offset inside the containing tile, each component in `[0, 1)`.
    pub fn fract(&self) -> (f64, f64) {
        (self.x - self.x.floor(), self.y - self.y.floor())
    }
}

/// Projects a coordinate onto the Web Mercator tile grid at `zoom`.
///
/// Latitudes close to ±90° are not clamped: `tan` and `cos` blow up there
/// and the resulting `y` is huge or non-finite. Tiles planned from such a
/// point land far outside the canvas and are clipped away.
pub fn project(lat: f64, lng: f64, zoom: u8) -> TilePoint {
    let n = 2_f64.powi(zoom as i32);
    let x = n * (lng + 180.0) / 360.0;
    let lat_rad = lat * PI / 180.0;
    let y = n * (1.0 - (lat_rad.tan() + 1.0 / lat_rad.cos()).ln() / PI) / 2.0;
    TilePoint::new(x, y)
}

/// Inverse of [`project`].
pub fn unproject(point: TilePoint, zoom: u8) -> LatLng {
    let n = 2_f64.powi(zoom as i32);
    let lng = point.x / n * 360.0 - 180.0;
    let lat_rad = (PI * (1.0 - 2.0 * point.y / n)).sinh().atan();
    LatLng::new(lat_rad.to_degrees(), lng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::MAX_LATITUDE;

    #[test]
    fn test_origin_projection() {
        let p = project(0.0, 0.0, 1);
        assert!((p.x - 1.0).abs() < 1e-12);
        assert!((p.y - 1.0).abs() < 1e-12);

        let p = project(0.0, 0.0, 0);
        assert!((p.x - 0.5).abs() < 1e-12);
        assert!((p.y - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_projection_stays_inside_grid() {
        for zoom in 0..=18u8 {
            let n = 2_f64.powi(zoom as i32);
            let mut lat = -84.9;
            while lat < 85.0 {
                let mut lng = -179.9;
                while lng < 180.0 {
                    let p = project(lat, lng, zoom);
                    assert!(p.x >= 0.0 && p.x <= n, "x {} out of grid at z{}", p.x, zoom);
                    assert!(p.y >= 0.0 && p.y <= n, "y {} out of grid at z{}", p.y, zoom);
                    lng += 17.3;
                }
                lat += 9.7;
            }
        }
    }

    #[test]
    fn test_northern_latitudes_have_smaller_y() {
        let north = project(60.0, 10.0, 4);
        let south = project(-60.0, 10.0, 4);
        assert!(north.y < south.y);
        assert!((north.x - south.x).abs() < 1e-12);
    }

    #[test]
    fn test_mercator_limit_maps_to_grid_edge() {
        let top = project(MAX_LATITUDE, 0.0, 3);
        assert!(top.y.abs() < 1e-6);
    }

    #[test]
    fn test_unproject_round_trip() {
        let nyc = LatLng::new(40.7128, -74.0060);
        let p = project(nyc.lat, nyc.lng, 12);
        let back = unproject(p, 12);
        assert!((back.lat - nyc.lat).abs() < 1e-9);
        assert!((back.lng - nyc.lng).abs() < 1e-9);
    }

    #[test]
    fn test_tile_and_fract() {
        let p = TilePoint::new(16.25, 9.75);
        assert_eq!(p.tile(), (16, 9));
        assert_eq!(p.fract(), (0.25, 0.75));
    }

    #[test]
    fn test_lat_lng_validity() {
        assert!(LatLng::new(40.7128, -74.0060).is_valid());
        assert!(!LatLng::new(91.0, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -181.0).is_valid());
    }
}

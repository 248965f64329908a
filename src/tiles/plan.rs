//! Composite plan building
//!
//! The plan is the ordered list of tile draws for one render. Layers are
//! walked bottom first and each layer's tiles are appended in grid order, so
//! list order is drawing order. A final pass keeps only the first placement
//! of every [`SourceKey`].
//!
//! Deduplication is global: a URL that appears in two layers is fetched and
//! drawn once, at the first layer's position in the stack.

use fxhash::FxHashSet;

use super::{
    grid::TileGrid,
    source::{resolve, LayerSpec, SourceKey, TileSource},
};
use crate::core::geo::{project, LatLng};

/// One tile draw: where the bytes come from, where they go and how opaque
/// they are.
#[derive(Debug, Clone)]
pub struct Placement {
    pub source: TileSource,
    pub left: i64,
    pub top: i64,
    pub opacity: f64,
}

/// Ordered, deduplicated tile draws. Later entries are drawn on top.
#[derive(Debug, Clone, Default)]
pub struct CompositePlan {
    entries: Vec<Placement>,
}

impl CompositePlan {
    /// Build a plan from raw placements, dropping every placement whose
    /// source was already seen.
    pub fn from_placements(placements: Vec<Placement>) -> Self {
        let mut seen: FxHashSet<SourceKey> = FxHashSet::default();
        let entries = placements
            .into_iter()
            .filter(|placement| seen.insert(placement.source.key()))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[Placement] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Placement> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl IntoIterator for CompositePlan {
    type Item = Placement;
    type IntoIter = std::vec::IntoIter<Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl<'a> IntoIterator for &'a CompositePlan {
    type Item = &'a Placement;
    type IntoIter = std::slice::Iter<'a, Placement>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Plan every tile draw for a `width × height` canvas.
pub fn build_plan(
    center: LatLng,
    zoom: u8,
    width: i64,
    height: i64,
    layers: &[LayerSpec],
) -> CompositePlan {
    let mut placements = Vec::new();

    for (index, layer) in layers.iter().enumerate() {
        // Projected per layer so layers stay independent of each other.
        let anchor = project(center.lat, center.lng, zoom);
        let before = placements.len();

        for tile in TileGrid::new(anchor, width, height) {
            let resolved = resolve(layer, zoom, tile.x as f64, tile.y as f64);
            placements.push(Placement {
                source: resolved.source,
                left: tile.left,
                top: tile.top,
                opacity: resolved.opacity,
            });
        }

        log::debug!(
            "layer {} visited {} grid positions around {:?}",
            index,
            placements.len() - before,
            anchor
        );
    }

    let visited = placements.len();
    let plan = CompositePlan::from_placements(placements);
    log::debug!("composite plan: {} placements ({} visited)", plan.len(), visited);
    plan
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{unproject, TilePoint};
    use crate::tiles::source::GeneratorLayer;

    const BASE: &str = "https://base.example.org/{z}/{x}/{y}.png";
    const OVERLAY: &str = "https://overlay.example.org/{z}/{x}/{y}.png";

    fn urls(plan: &CompositePlan) -> Vec<String> {
        plan.iter()
            .map(|p| p.source.url().unwrap_or_default().to_string())
            .collect()
    }

    #[test]
    fn test_single_centered_tile() {
        let center = unproject(TilePoint::new(16.5, 16.5), 5);
        let plan = build_plan(center, 5, 256, 256, &[LayerSpec::template(BASE)]);

        assert_eq!(plan.len(), 1);
        let placement = &plan.entries()[0];
        assert_eq!(placement.source.url(), Some("https://base.example.org/5/16/16.png"));
        assert_eq!((placement.left, placement.top), (0, 0));
        assert_eq!(placement.opacity, 1.0);
    }

    #[test]
    fn test_no_source_appears_twice() {
        let center = LatLng::new(48.1486, 17.1077);
        let plan = build_plan(
            center,
            5,
            1280,
            720,
            &[LayerSpec::template(BASE), LayerSpec::styled(OVERLAY, 0.5)],
        );

        let keys: FxHashSet<SourceKey> = plan.iter().map(|p| p.source.key()).collect();
        assert_eq!(keys.len(), plan.len());
    }

    #[test]
    fn test_layers_keep_stacking_order() {
        let center = LatLng::new(48.1486, 17.1077);
        let plan = build_plan(
            center,
            5,
            1280,
            720,
            &[LayerSpec::template(BASE), LayerSpec::styled(OVERLAY, 0.5)],
        );

        let urls = urls(&plan);
        let last_base = urls.iter().rposition(|u| u.starts_with("https://base")).unwrap();
        let first_overlay = urls.iter().position(|u| u.starts_with("https://overlay")).unwrap();
        assert!(last_base < first_overlay);

        for placement in plan.iter() {
            let expected = if placement.source.url().unwrap().starts_with("https://overlay") {
                0.5
            } else {
                1.0
            };
            assert_eq!(placement.opacity, expected);
        }
    }

    #[test]
    fn test_first_placement_of_a_tile_wins() {
        let center = LatLng::new(48.1486, 17.1077);
        let grid_order: Vec<_> = TileGrid::new(project(center.lat, center.lng, 5), 1280, 720)
            .map(|t| fill(BASE, 5, t.x, t.y))
            .collect();

        let plan = build_plan(center, 5, 1280, 720, &[LayerSpec::template(BASE)]);

        let mut expected = Vec::new();
        for url in grid_order {
            if !expected.contains(&url) {
                expected.push(url);
            }
        }
        assert_eq!(urls(&plan), expected);
    }

    fn fill(template: &str, z: u8, x: i64, y: i64) -> String {
        crate::tiles::source::fill_template(template, z, x, y)
    }

    #[test]
    fn test_repeated_layer_collapses_to_one_placement() {
        let center = unproject(TilePoint::new(16.5, 16.5), 5);
        let single = build_plan(center, 5, 256, 256, &[LayerSpec::template(BASE)]);
        let doubled = build_plan(
            center,
            5,
            256,
            256,
            &[LayerSpec::template(BASE), LayerSpec::template(BASE)],
        );

        assert_eq!(doubled.len(), 1);
        assert_eq!(urls(&doubled), urls(&single));
    }

    /// A URL shared by two layers is drawn once, in the lower layer's slot.
    /// An overlay in between therefore ends up above it.
    #[test]
    fn test_shared_url_across_layers_keeps_lowest_slot() {
        let center = unproject(TilePoint::new(16.5, 16.5), 5);
        let plan = build_plan(
            center,
            5,
            256,
            256,
            &[
                LayerSpec::template(BASE),
                LayerSpec::template(OVERLAY),
                LayerSpec::styled(BASE, 0.3),
            ],
        );

        assert_eq!(
            urls(&plan),
            vec![
                "https://base.example.org/5/16/16.png".to_string(),
                "https://overlay.example.org/5/16/16.png".to_string(),
            ]
        );
        assert_eq!(plan.entries()[0].opacity, 1.0);
    }

    #[test]
    fn test_generator_tiles_are_deduplicated_by_identity() {
        let center = unproject(TilePoint::new(16.5, 16.5), 5);
        let generator = GeneratorLayer::from_fn(|_, _, _| Ok(Vec::new()));
        let other = GeneratorLayer::from_fn(|_, _, _| Ok(Vec::new()));

        let plan = build_plan(
            center,
            5,
            256,
            256,
            &[
                LayerSpec::generator(generator.clone()),
                LayerSpec::generator(generator),
                LayerSpec::generator(other),
            ],
        );

        assert_eq!(plan.len(), 2);
        assert!(plan.iter().all(|p| p.source.url().is_none()));
    }
}

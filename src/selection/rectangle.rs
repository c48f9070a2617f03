// src/selection/rectangle.rs
use bevy::prelude::*;

use crate::scene::SceneQuery;
use crate::selection::geometry::{rect_contains, screen_rect};
use crate::selection::strategy::{apply_matches, collect_matches, GestureOverlay, SelectionStrategy};
use crate::unit::UnitRegistry;

/// Drag-box selection. Tests each unit's projected centre against the box.
#[derive(Clone, Debug, Default)]
pub struct RectangleSelection {
    corners: Option<(Vec2, Vec2)>,
}

impl RectangleSelection {
    pub fn bounds(&self) -> Option<Rect> {
        self.corners.map(|(a, b)| screen_rect(a, b))
    }
}

impl SelectionStrategy for RectangleSelection {
    fn start(&mut self, point: Vec2) {
        self.corners = Some((point, point));
    }

    fn update(&mut self, point: Vec2) {
        if let Some((_, end)) = self.corners.as_mut() {
            *end = point;
        }
    }

    fn end(&mut self, units: &mut UnitRegistry, scene: &dyn SceneQuery) -> usize {
        let Some(bounds) = self.bounds() else { return 0 };
        self.corners = None;

        let matches = collect_matches(units, scene, |p| rect_contains(&bounds, p));
        debug!(
            "Rectangle selection [{:.0},{:.0}]-[{:.0},{:.0}] matched {}",
            bounds.min.x,
            bounds.min.y,
            bounds.max.x,
            bounds.max.y,
            matches.len()
        );
        apply_matches(units, matches)
    }

    fn cancel(&mut self) {
        self.corners = None;
    }

    fn is_active(&self) -> bool {
        self.corners.is_some()
    }

    fn overlay(&self) -> Option<GestureOverlay> {
        self.bounds().map(GestureOverlay::Rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UnitConfig;
    use crate::scene::testing::FlatProjection;
    use crate::unit::{Team, UnitKind};

    fn at(units: &mut UnitRegistry, x: f32, z: f32) -> crate::unit::UnitId {
        units.spawn(UnitKind::Infantry, Vec3::new(x, 0.0, z), Team::Blue)
    }

    #[test]
    fn box_edges_are_inclusive() {
        let mut units = UnitRegistry::new(&UnitConfig::default(), 1);
        let a = at(&mut units, 0.0, 0.0);
        let b = at(&mut units, 20.0, 10.0);
        at(&mut units, 20.1, 10.0);

        let mut rect = RectangleSelection::default();
        rect.start(Vec2::new(20.0, 10.0));
        rect.update(Vec2::new(0.0, 0.0));
        assert_eq!(rect.end(&mut units, &FlatProjection), 2);
        assert_eq!(units.selected().collect::<Vec<_>>(), vec![a, b]);
        assert!(!rect.is_active());
        assert!(rect.overlay().is_none());
    }

    #[test]
    fn unprojectable_units_are_skipped() {
        let mut units = UnitRegistry::new(&UnitConfig::default(), 1);
        let visible = at(&mut units, 5.0, 5.0);
        units.spawn(UnitKind::Tank, Vec3::new(5.0, -1.0, 5.0), Team::Blue);

        let mut rect = RectangleSelection::default();
        rect.start(Vec2::ZERO);
        rect.update(Vec2::splat(10.0));
        assert_eq!(rect.end(&mut units, &FlatProjection), 1);
        assert_eq!(units.selected().collect::<Vec<_>>(), vec![visible]);
    }

    #[test]
    fn update_before_start_is_ignored() {
        let mut rect = RectangleSelection::default();
        rect.update(Vec2::ONE);
        assert!(!rect.is_active());
        let mut units = UnitRegistry::new(&UnitConfig::default(), 1);
        assert_eq!(rect.end(&mut units, &FlatProjection), 0);
    }
}
